mod datetime_tool;
mod destination_tool;
mod destinations;
mod error;
mod metrics;
mod orchestrator;
mod otel;
mod server;
mod trip;
mod weather_tool;

use dotenv::dotenv;
use orchestrator::{AgentOrchestrator, RigPlanner};
use std::env;
use std::sync::Arc;
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    dotenv().ok();

    // Telemetry flushes on success or error exit
    let _telemetry_guard = otel::init_telemetry()?;

    info!("Starting travel planner");

    let planner = RigPlanner::from_env()?;
    let orchestrator = AgentOrchestrator::new(Arc::new(planner));
    let app = server::router(orchestrator);

    let port: u16 = env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(8080);
    let listener = tokio::net::TcpListener::bind(("0.0.0.0", port)).await?;
    info!("Web server running at http://localhost:{}", port);
    axum::serve(listener, app).await?;
    Ok(())
}
