//! Integration tests for the sizing service API endpoints

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use sizer_lib::{
    health::components, HealthRegistry, PerformanceProfile, Planner, PlannerMetrics,
};
use sizer_service::api::{create_router, AppState};
use std::sync::Arc;
use tower::ServiceExt;

async fn setup_test_app() -> (Router, Arc<AppState>) {
    let health_registry = HealthRegistry::new();
    health_registry.set_healthy(components::PROFILE).await;
    health_registry.set_healthy(components::PLANNER).await;

    let planner = Planner::new(PerformanceProfile::bare_metal()).unwrap();
    let state = Arc::new(AppState::new(planner, health_registry, PlannerMetrics::new()));
    let router = create_router(state.clone());

    (router, state)
}

fn post_plan(body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/api/v1/plans")
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

async fn json_body(response: axum::response::Response) -> serde_json::Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}

#[tokio::test]
async fn test_plan_for_availability() {
    let (app, _state) = setup_test_app().await;

    let response = app
        .oneshot(post_plan(
            r#"{ "vm_flavor": { "cpu_cores": 8, "ram_gb": 32 }, "failures_to_tolerate": 1 }"#,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let plan = json_body(response).await;
    assert_eq!(plan["counts"]["coordination"], 3);
    assert_eq!(plan["counts"]["log"], 4);
    assert_eq!(plan["vm_count"], 4);
    assert_eq!(plan["profile"], "bare-metal");
    assert!(plan.get("scaling_trigger").is_none());
}

#[tokio::test]
async fn test_plan_with_full_workload() {
    let (app, _state) = setup_test_app().await;

    let body = r#"{
        "vm_flavor": { "cpu_cores": 8, "ram_gb": 32 },
        "failures_to_tolerate": 1,
        "workload": {
            "data_plane": { "events_per_second": 100000, "event_size": 100, "target_p95_latency_ms": 10 },
            "control_plane": { "streams": 10, "writers": 10, "readers": 10, "transactions_per_hour": 360 }
        }
    }"#;
    let response = app.oneshot(post_plan(body)).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let plan = json_body(response).await;
    assert_eq!(plan["counts"]["storage"], 3);
    assert_eq!(plan["container_count"], 24);
    assert_eq!(plan["bucket_count"], 8);
    assert_eq!(plan["scaling_trigger"]["events_per_second"], 1000.0);
    assert_eq!(plan["control_plane_load"]["keepalive_ops_per_second"], 120.0);
}

#[tokio::test]
async fn test_invalid_input_returns_400() {
    let (app, _state) = setup_test_app().await;

    let body = r#"{
        "vm_flavor": { "cpu_cores": 8, "ram_gb": 32 },
        "workload": {
            "data_plane": { "events_per_second": 1000, "event_size": 512, "target_p95_latency_ms": 10 }
        }
    }"#;
    let response = app.oneshot(post_plan(body)).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let error = json_body(response).await;
    assert_eq!(error["error"], "invalid_input");
    assert!(error["message"].as_str().unwrap().contains("512"));
}

#[tokio::test]
async fn test_zero_streams_with_suggestion_returns_400() {
    let (app, _state) = setup_test_app().await;

    let body = r#"{
        "vm_flavor": { "cpu_cores": 8, "ram_gb": 32 },
        "workload": {
            "data_plane": { "events_per_second": 1000, "event_size": 100, "target_p95_latency_ms": 10 },
            "control_plane": { "streams": 0 }
        }
    }"#;
    let response = app.oneshot(post_plan(body)).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_negative_failures_rejected_by_extractor() {
    let (app, _state) = setup_test_app().await;

    let response = app
        .oneshot(post_plan(
            r#"{ "vm_flavor": { "cpu_cores": 8, "ram_gb": 32 }, "failures_to_tolerate": -1 }"#,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_profile_endpoint() {
    let (app, _state) = setup_test_app().await;

    let response = app.oneshot(get("/api/v1/profile")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let profile = json_body(response).await;
    assert_eq!(profile["name"], "bare-metal");
    assert_eq!(profile["event_sizes"].as_array().unwrap().len(), 6);
}

#[tokio::test]
async fn test_healthz_returns_ok_when_healthy() {
    let (app, _state) = setup_test_app().await;

    let response = app.oneshot(get("/healthz")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let health = json_body(response).await;
    assert_eq!(health["status"], "healthy");
}

#[tokio::test]
async fn test_healthz_returns_503_when_unhealthy() {
    let (app, state) = setup_test_app().await;

    state
        .health_registry
        .set_unhealthy(components::PROFILE, "Profile rejected")
        .await;

    let response = app.oneshot(get("/healthz")).await.unwrap();

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    let health = json_body(response).await;
    assert_eq!(health["status"], "unhealthy");
}

#[tokio::test]
async fn test_readyz_transitions() {
    let (app, state) = setup_test_app().await;

    let response = app.clone().oneshot(get("/readyz")).await.unwrap();
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(json_body(response).await["ready"], false);

    state.health_registry.set_ready(true).await;

    let response = app.oneshot(get("/readyz")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await["ready"], true);
}

#[tokio::test]
async fn test_metrics_endpoint_reports_plans() {
    let (app, _state) = setup_test_app().await;

    let response = app
        .clone()
        .oneshot(post_plan(r#"{ "vm_flavor": { "cpu_cores": 8, "ram_gb": 32 } }"#))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app.oneshot(get("/metrics")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let text = String::from_utf8(body.to_vec()).unwrap();
    assert!(text.contains("sizer_plans_completed_total"));
    assert!(text.contains("sizer_planning_latency_seconds"));
}
