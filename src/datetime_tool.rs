use chrono::Local;
use rig::completion::ToolDefinition;
use rig::tool::Tool;
use serde::Deserialize;
use serde_json::json;
use std::convert::Infallible;
use tracing::instrument;

const FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Debug, Deserialize)]
pub struct DateTimeArgs {}

/// Reports the current wall-clock time so the agent can anchor the plan to
/// a concrete date.
#[derive(Debug)]
pub struct DateTimeTool;

pub fn current_datetime() -> String {
    Local::now().format(FORMAT).to_string()
}

impl Tool for DateTimeTool {
    const NAME: &'static str = "get_current_datetime";
    type Error = Infallible;
    type Args = DateTimeArgs;
    type Output = String;

    async fn definition(&self, _param: String) -> ToolDefinition {
        ToolDefinition {
            name: Self::NAME.to_string(),
            description: "Get the current date and time".to_string(),
            parameters: json!({
                "type": "object",
                "properties": {},
                "required": []
            }),
        }
    }

    #[instrument(name = "call_datetime_tool", skip_all)]
    async fn call(&self, _args: DateTimeArgs) -> Result<String, Infallible> {
        Ok(current_datetime())
    }
}
