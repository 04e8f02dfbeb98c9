use crate::datetime_tool::DateTimeTool;
use crate::destination_tool::ConfirmDestinationTool;
use crate::error::PlanError;
use crate::metrics::{inc_plan_error, inc_plan_success};
use crate::trip::{TravelPlanResult, TripRequest};
use crate::weather_tool::WeatherTool;
use async_trait::async_trait;
use chrono::Utc;
use rig::agent::Agent;
use rig::completion::Prompt;
use rig::providers::openai;
use rig::providers::openai::completion::CompletionModel;
use std::env;
use std::sync::Arc;
use tracing::{error, info, instrument};

const DEFAULT_MODEL_ID: &str = "gpt-4o-mini";

const PREAMBLE: &str = "You are a helpful AI travel planning agent. Help users plan \
vacations with detailed itineraries, activities, and travel tips. Use your tools to \
confirm the destination, check the current weather there, and anchor the plan to the \
current date and time.";

/// The seam between the orchestrator and the hosted model. Production code
/// wraps a rig agent; tests substitute a scripted generator.
#[async_trait]
pub trait PlanGenerator: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String, PlanError>;
}

/// Hosted chat agent with the three travel tools registered.
pub struct RigPlanner {
    agent: Agent<CompletionModel>,
}

impl RigPlanner {
    /// Builds the agent from `OPENAI_API_KEY` (plus optional
    /// `OPENAI_API_BASE` for OpenAI-compatible endpoints) and
    /// `OPENAI_MODEL_ID`.
    pub fn from_env() -> Result<Self, anyhow::Error> {
        let client = match env::var("OPENAI_API_BASE") {
            Ok(base_url) => {
                let api_key = env::var("OPENAI_API_KEY")?;
                openai::Client::from_url(&api_key, &base_url)
            }
            Err(_) => openai::Client::from_env(),
        };
        let model_id = env::var("OPENAI_MODEL_ID").unwrap_or_else(|_| DEFAULT_MODEL_ID.to_owned());
        let agent = client
            .agent(&model_id)
            .preamble(PREAMBLE)
            .tool(ConfirmDestinationTool)
            .tool(WeatherTool::from_env())
            .tool(DateTimeTool)
            .build();
        info!(model_id, "travel agent ready");
        Ok(Self { agent })
    }
}

#[async_trait]
impl PlanGenerator for RigPlanner {
    async fn generate(&self, prompt: &str) -> Result<String, PlanError> {
        self.agent
            .prompt(prompt)
            .await
            .map_err(|e| PlanError::Orchestration(e.to_string()))
    }
}

/// Owns the agent handle and turns a built prompt into a finished plan.
/// One awaited model call per request; no retry, no cross-request state.
#[derive(Clone)]
pub struct AgentOrchestrator {
    planner: Arc<dyn PlanGenerator>,
}

impl AgentOrchestrator {
    pub fn new(planner: Arc<dyn PlanGenerator>) -> Self {
        Self { planner }
    }

    #[instrument(
        skip(self, prompt),
        fields(destination = %request.destination, duration = request.duration_days)
    )]
    pub async fn generate_plan(
        &self,
        request: &TripRequest,
        prompt: &str,
    ) -> Result<TravelPlanResult, PlanError> {
        info!("submitting prompt to travel agent");
        let plan_text = match self.planner.generate(prompt).await {
            Ok(text) => text,
            Err(e) => {
                error!(error = %e, "travel agent call failed");
                inc_plan_error(&e);
                return Err(e);
            }
        };
        if plan_text.trim().is_empty() {
            let e = PlanError::EmptyResponse;
            error!("travel agent returned an empty response");
            inc_plan_error(&e);
            return Err(e);
        }
        info!("received travel plan response");
        inc_plan_success();
        Ok(TravelPlanResult {
            plan_text,
            destination: request.destination.clone(),
            duration_days: request.duration_days,
            generated_at: Utc::now(),
        })
    }
}
