//! HTTP API for planning, health checks and Prometheus metrics

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use prometheus::{Encoder, TextEncoder};
use serde::Serialize;
use sizer_lib::{
    health::ComponentStatus, HealthRegistry, PlanError, PlanRequest, Planner, PlannerMetrics,
    ProvisioningPlan,
};
use std::sync::Arc;
use std::time::Instant;
use tracing::info;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub planner: Planner,
    pub health_registry: HealthRegistry,
    pub metrics: PlannerMetrics,
}

impl AppState {
    pub fn new(planner: Planner, health_registry: HealthRegistry, metrics: PlannerMetrics) -> Self {
        Self {
            planner,
            health_registry,
            metrics,
        }
    }
}

/// JSON body returned when a planning run is rejected
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: &'static str,
    pub message: String,
}

/// Planning error mapped onto an HTTP response
pub struct ApiError(PlanError);

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match self.0 {
            PlanError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            PlanError::Configuration(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        let body = ErrorBody {
            error: self.0.kind(),
            message: self.0.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

/// Compute a provisioning plan for the posted request
async fn create_plan(
    State(state): State<Arc<AppState>>,
    Json(request): Json<PlanRequest>,
) -> Result<Json<ProvisioningPlan>, ApiError> {
    let started = Instant::now();
    let result = state.planner.plan(&request);
    state
        .metrics
        .observe_planning_latency(started.elapsed().as_secs_f64());

    match result {
        Ok(plan) => {
            state.metrics.record_plan(&plan);
            Ok(Json(plan))
        }
        Err(e) => {
            state.metrics.record_rejection(&e);
            Err(ApiError(e))
        }
    }
}

/// Return the performance profile plans are computed with
async fn profile(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(state.planner.profile().clone())
}

/// Health check response - returns 200 if healthy, 503 if unhealthy
async fn healthz(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let health = state.health_registry.health().await;

    let status_code = match health.status {
        ComponentStatus::Healthy | ComponentStatus::Degraded => StatusCode::OK,
        ComponentStatus::Unhealthy => StatusCode::SERVICE_UNAVAILABLE,
    };

    (status_code, Json(health))
}

/// Readiness check response - returns 200 if ready, 503 if not ready
async fn readyz(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let readiness = state.health_registry.readiness().await;

    let status_code = if readiness.ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (status_code, Json(readiness))
}

/// Prometheus metrics endpoint
async fn metrics() -> Response {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();

    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        return (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response();
    }

    (
        StatusCode::OK,
        [("content-type", "text/plain; charset=utf-8")],
        buffer,
    )
        .into_response()
}

/// Create the API router
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/v1/plans", post(create_plan))
        .route("/api/v1/profile", get(profile))
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        .route("/metrics", get(metrics))
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
