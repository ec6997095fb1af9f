//! HTTP API for capacity analysis, health checks and Prometheus metrics

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use planner_lib::{
    CapacityError, CapacityModel, CapacitySnapshot, Configuration, LoadReport, PlannerMetrics,
    StructuredLogger,
};
use prometheus::{Encoder, TextEncoder};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;
use tracing::{error, info};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub model: CapacityModel,
    pub metrics: PlannerMetrics,
    pub logger: StructuredLogger,
    /// Served to clients that start from a blank form
    pub baseline: Configuration,
}

impl AppState {
    pub fn new(
        model: CapacityModel,
        metrics: PlannerMetrics,
        logger: StructuredLogger,
        baseline: Configuration,
    ) -> Self {
        Self {
            model,
            metrics,
            logger,
            baseline,
        }
    }
}

/// Error body returned for rejected configurations
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
    pub kind: String,
}

pub struct ApiError(CapacityError);

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: self.0.to_string(),
            kind: self.0.kind().to_string(),
        };
        (StatusCode::UNPROCESSABLE_ENTITY, Json(body)).into_response()
    }
}

#[derive(Debug, Deserialize)]
pub struct LoadCurveQuery {
    pub max_sessions: Option<u64>,
}

async fn healthz() -> impl IntoResponse {
    (StatusCode::OK, Json(serde_json::json!({ "status": "healthy" })))
}

/// Prometheus metrics endpoint
async fn metrics() -> Response {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();

    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        error!(error = %e, "Failed to encode metrics");
        return StatusCode::INTERNAL_SERVER_ERROR.into_response();
    }

    (
        StatusCode::OK,
        [("content-type", "text/plain; charset=utf-8")],
        buffer,
    )
        .into_response()
}

async fn defaults(State(state): State<Arc<AppState>>) -> Json<Configuration> {
    Json(state.baseline.clone())
}

/// Evaluate a full configuration snapshot
async fn analysis(
    State(state): State<Arc<AppState>>,
    Json(config): Json<Configuration>,
) -> Result<Json<CapacitySnapshot>, ApiError> {
    let started = Instant::now();
    let result = state.model.evaluate(&config);
    state
        .metrics
        .observe_evaluation_latency(started.elapsed().as_secs_f64());

    match result {
        Ok(snapshot) => {
            state.metrics.record_snapshot(&snapshot);
            state.logger.log_analysis(&snapshot);
            Ok(Json(snapshot))
        }
        Err(e) => {
            state.metrics.inc_evaluation_errors();
            state.logger.log_rejected(config.revision, &e.to_string());
            Err(ApiError(e))
        }
    }
}

/// 24-hour load curve; defaults to the baseline session ceiling
async fn load_curve(
    State(state): State<Arc<AppState>>,
    Query(query): Query<LoadCurveQuery>,
) -> Json<LoadReport> {
    let max_sessions = query
        .max_sessions
        .unwrap_or(state.baseline.target.max_concurrent_sessions);
    Json(state.model.load_report(max_sessions))
}

/// Create the API router
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .route("/metrics", get(metrics))
        .route("/api/v1/defaults", get(defaults))
        .route("/api/v1/analysis", post(analysis))
        .route("/api/v1/load-curve", get(load_curve))
        .with_state(state)
}

/// Start the API server
pub async fn serve(port: u16, state: Arc<AppState>) -> anyhow::Result<()> {
    let app = create_router(state);

    let addr = format!("0.0.0.0:{}", port);
    info!(addr = %addr, "Starting API server");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
