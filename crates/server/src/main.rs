//! Capacity planner server
//!
//! Serves the capacity model over HTTP to the browser calculator.

use anyhow::Result;
use planner_lib::{CapacityModel, PlannerMetrics, StructuredLogger};
use planner_server::{api, config};
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

const PLANNER_VERSION: &str = env!("CARGO_PKG_VERSION");

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing with JSON output and env filter
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(fmt::layer().json())
        .init();

    let config = config::ServerConfig::load()?;
    info!(instance = %config.instance_name, port = config.api_port, "Planner configured");

    let baseline = config.baseline_plan()?;

    let logger = StructuredLogger::new(&config.instance_name);
    logger.log_startup(PLANNER_VERSION);

    let app_state = Arc::new(api::AppState::new(
        CapacityModel::new(),
        PlannerMetrics::new(),
        logger.clone(),
        baseline,
    ));

    let api_handle = tokio::spawn(api::serve(config.api_port, app_state));

    tokio::select! {
        result = api_handle => {
            match result {
                Ok(Err(e)) => error!(error = %e, "API server failed"),
                Err(e) => error!(error = %e, "API server task panicked"),
                Ok(Ok(())) => {}
            }
            logger.log_shutdown("API server stopped");
        }
        _ = tokio::signal::ctrl_c() => {
            logger.log_shutdown("SIGINT received");
        }
    }

    info!("Shutting down");
    Ok(())
}
