use crate::destinations;
use crate::error::PlanError;
use crate::metrics::inc_plan_error;
use crate::orchestrator::AgentOrchestrator;
use crate::trip::{RawTripRequest, TravelPlanResult, TripRequest, build_prompt};
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{Html, Json};
use axum::routing::{get, post};
use axum::Router;
use serde::Serialize;
use tower_http::cors::{Any, CorsLayer};
use tracing::warn;

/// Generic message shown when the model call fails. Provider internals go
/// to the logs, never to the caller.
const GENERIC_FAILURE_MESSAGE: &str =
    "We couldn't generate your travel plan right now. Please try again in a moment.";

#[derive(Clone)]
struct AppState {
    orchestrator: AgentOrchestrator,
}

pub fn router(orchestrator: AgentOrchestrator) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(index))
        .route("/api/destinations", get(list_destinations))
        .route("/api/destinations/random", get(random_destination))
        .route("/api/plan", post(create_plan))
        .layer(cors)
        .with_state(AppState { orchestrator })
}

#[derive(Debug, Serialize)]
struct PlanResponse {
    success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    plan: Option<TravelPlanResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<ErrorBody>,
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    #[serde(skip_serializing_if = "Option::is_none")]
    field: Option<&'static str>,
    message: String,
}

impl PlanResponse {
    fn success(plan: TravelPlanResult) -> Self {
        Self {
            success: true,
            plan: Some(plan),
            error: None,
        }
    }

    fn validation(field: &'static str, message: String) -> Self {
        Self {
            success: false,
            plan: None,
            error: Some(ErrorBody {
                field: Some(field),
                message,
            }),
        }
    }

    fn failure() -> Self {
        Self {
            success: false,
            plan: None,
            error: Some(ErrorBody {
                field: None,
                message: GENERIC_FAILURE_MESSAGE.to_string(),
            }),
        }
    }
}

async fn index() -> Html<&'static str> {
    Html(include_str!("../static/index.html"))
}

async fn list_destinations() -> Json<Vec<destinations::Destination>> {
    Json(destinations::all().to_vec())
}

async fn random_destination() -> Json<destinations::Destination> {
    Json(destinations::random().clone())
}

async fn create_plan(
    State(state): State<AppState>,
    Json(raw): Json<RawTripRequest>,
) -> (StatusCode, Json<PlanResponse>) {
    let request = match TripRequest::try_from(raw) {
        Ok(request) => request,
        Err(e) => {
            warn!(error = %e, "rejected trip request");
            inc_plan_error(&e);
            let response = match e {
                PlanError::Validation { field, message } => {
                    PlanResponse::validation(field, message)
                }
                _ => PlanResponse::failure(),
            };
            return (StatusCode::UNPROCESSABLE_ENTITY, Json(response));
        }
    };

    let prompt = build_prompt(&request);
    match state.orchestrator.generate_plan(&request, &prompt).await {
        Ok(plan) => (StatusCode::OK, Json(PlanResponse::success(plan))),
        // Handled error shape: the JSON caller gets success=false with a
        // generic message, not the provider error.
        Err(_) => (StatusCode::OK, Json(PlanResponse::failure())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::orchestrator::PlanGenerator;
    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::{Request, header};
    use http_body_util::BodyExt;
    use serde_json::{Value, json};
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tower::ServiceExt;

    /// Echoes the prompt back as the plan and counts invocations.
    struct EchoPlanner {
        calls: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl PlanGenerator for EchoPlanner {
        async fn generate(&self, prompt: &str) -> Result<String, PlanError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(prompt.to_string())
        }
    }

    struct FailingPlanner {
        calls: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl PlanGenerator for FailingPlanner {
        async fn generate(&self, _prompt: &str) -> Result<String, PlanError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Err(PlanError::Orchestration(
                "connection reset by peer".to_string(),
            ))
        }
    }

    fn test_router(planner: Arc<dyn PlanGenerator>) -> Router {
        router(AgentOrchestrator::new(planner))
    }

    fn plan_request(body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/api/plan")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn response_json(response: axum::response::Response) -> Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_valid_request_returns_plan_with_request_fields() {
        let calls = Arc::new(AtomicUsize::new(0));
        let app = test_router(Arc::new(EchoPlanner {
            calls: calls.clone(),
        }));

        let response = app
            .oneshot(plan_request(json!({
                "destination": "Paris, France",
                "duration_days": 5,
                "interests": ["Culture", "Food"],
                "special_requests": ""
            })))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = response_json(response).await;
        assert_eq!(body["success"], json!(true));
        let plan_text = body["plan"]["plan_text"].as_str().unwrap();
        assert!(plan_text.contains("Paris, France"));
        assert!(plan_text.contains('5'));
        assert!(plan_text.contains("Culture"));
        assert!(plan_text.contains("Food"));
        assert_eq!(body["plan"]["destination"], json!("Paris, France"));
        assert_eq!(body["plan"]["duration_days"], json!(5));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_out_of_range_duration_never_reaches_agent() {
        let calls = Arc::new(AtomicUsize::new(0));
        let app = test_router(Arc::new(EchoPlanner {
            calls: calls.clone(),
        }));

        let response = app
            .oneshot(plan_request(json!({
                "destination": "Paris, France",
                "duration_days": 20,
                "interests": []
            })))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let body = response_json(response).await;
        assert_eq!(body["success"], json!(false));
        assert_eq!(body["error"]["field"], json!("duration_days"));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_empty_destination_rejected() {
        let calls = Arc::new(AtomicUsize::new(0));
        let app = test_router(Arc::new(EchoPlanner {
            calls: calls.clone(),
        }));

        let response = app
            .oneshot(plan_request(json!({
                "destination": "",
                "duration_days": 3,
                "interests": []
            })))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let body = response_json(response).await;
        assert_eq!(body["error"]["field"], json!("destination"));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_unknown_interest_rejected() {
        let calls = Arc::new(AtomicUsize::new(0));
        let app = test_router(Arc::new(EchoPlanner {
            calls: calls.clone(),
        }));

        let response = app
            .oneshot(plan_request(json!({
                "destination": "Tokyo, Japan",
                "duration_days": 3,
                "interests": ["Spelunking"]
            })))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let body = response_json(response).await;
        assert_eq!(body["error"]["field"], json!("interests"));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_agent_failure_returns_generic_handled_error() {
        let calls = Arc::new(AtomicUsize::new(0));
        let app = test_router(Arc::new(FailingPlanner {
            calls: calls.clone(),
        }));

        let response = app
            .oneshot(plan_request(json!({
                "destination": "Berlin, Germany",
                "duration_days": 4,
                "interests": ["History"]
            })))
            .await
            .unwrap();

        // handled failures stay in the 200 range with success=false
        assert_eq!(response.status(), StatusCode::OK);
        let body = response_json(response).await;
        assert_eq!(body["success"], json!(false));
        let message = body["error"]["message"].as_str().unwrap();
        assert_eq!(message, GENERIC_FAILURE_MESSAGE);
        assert!(!message.contains("connection reset"));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_destination_listing() {
        let app = test_router(Arc::new(EchoPlanner {
            calls: Arc::new(AtomicUsize::new(0)),
        }));

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/destinations")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = response_json(response).await;
        let entries = body.as_array().unwrap();
        assert_eq!(entries.len(), 12);
        assert_eq!(entries[3]["name"], json!("Paris, France"));
    }

    #[tokio::test]
    async fn test_random_destination_comes_from_catalog() {
        let app = test_router(Arc::new(EchoPlanner {
            calls: Arc::new(AtomicUsize::new(0)),
        }));

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/destinations/random")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = response_json(response).await;
        let name = body["name"].as_str().unwrap();
        assert!(destinations::all().iter().any(|d| d.name == name));
    }

    #[tokio::test]
    async fn test_index_serves_form_page() {
        let app = test_router(Arc::new(EchoPlanner {
            calls: Arc::new(AtomicUsize::new(0)),
        }));

        let response = app
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let page = String::from_utf8(bytes.to_vec()).unwrap();
        assert!(page.contains("<form"));
    }
}
