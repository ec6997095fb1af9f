//! Integration tests for the planner API endpoints

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use planner_lib::{CapacityModel, Configuration, PlannerMetrics, StructuredLogger};
use planner_server::api::{create_router, AppState};
use std::sync::Arc;
use tower::ServiceExt;

fn setup_test_app() -> Router {
    let state = Arc::new(AppState::new(
        CapacityModel::new(),
        PlannerMetrics::new(),
        StructuredLogger::new("test-instance"),
        Configuration::default(),
    ));
    create_router(state)
}

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}

fn post_json(uri: &str, body: String) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body))
        .unwrap()
}

#[tokio::test]
async fn test_healthz_returns_ok() {
    let app = setup_test_app();

    let response = app
        .oneshot(Request::builder().uri("/healthz").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let health = body_json(response).await;
    assert_eq!(health["status"], "healthy");
}

#[tokio::test]
async fn test_defaults_returns_reference_plan() {
    let app = setup_test_app();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/v1/defaults")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let plan = body_json(response).await;
    assert_eq!(plan["sites"].as_array().unwrap().len(), 2);
    assert_eq!(plan["sites"][0]["name"], "SLC");
    assert_eq!(plan["sites"][0]["region"], "north_america");
    assert_eq!(plan["target"]["max_concurrent_sessions"], 2000);
}

#[tokio::test]
async fn test_analysis_of_reference_plan() {
    let app = setup_test_app();
    let body = serde_json::to_string(&Configuration::default()).unwrap();

    let response = app.oneshot(post_json("/api/v1/analysis", body)).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let snapshot = body_json(response).await;

    assert_eq!(snapshot["analysis"]["normal_ops_margin"], 3680.0);
    assert_eq!(snapshot["analysis"]["normal_ops_status"], "sufficient");
    assert_eq!(snapshot["analysis"]["n1_deficit"], 320.0);
    assert_eq!(snapshot["analysis"]["eu_gap"], 1360.0);

    let scenarios = snapshot["analysis"]["failover_scenarios"].as_array().unwrap();
    assert_eq!(scenarios.len(), 2);
    assert_eq!(scenarios[0]["gap"], 160.0);
    assert_eq!(scenarios[0]["status"], "at_risk");

    assert_eq!(snapshot["load_curve"].as_array().unwrap().len(), 24);
    assert_eq!(snapshot["load_curve"][0]["hour_label"], "00:00");
}

#[tokio::test]
async fn test_analysis_accepts_legacy_site_names() {
    let app = setup_test_app();
    let body = r#"{
        "server_spec": {"physical_cpu_per_server": 64, "vms_per_server": 16, "vcpu_per_vm": 8, "max_sessions_per_vm": 2},
        "sites": [
            {"name": "eBay SLC", "physical_server_count": 60},
            {"name": "eBay LVS", "physical_server_count": 60},
            {"name": "eBay AMS", "physical_server_count": 0}
        ],
        "target": {"max_concurrent_sessions": 2000, "coverage_percent": 100}
    }"#;

    let response = app
        .oneshot(post_json("/api/v1/analysis", body.to_string()))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let snapshot = body_json(response).await;
    assert_eq!(snapshot["analysis"]["eu_gap"], 1360.0);
    assert_eq!(
        snapshot["regional"]["europe"]["status"],
        "additional_capacity_needed"
    );
}

#[tokio::test]
async fn test_analysis_rejects_single_site() {
    let app = setup_test_app();
    let body = r#"{"sites": [{"name": "SLC", "physical_server_count": 60}]}"#;

    let response = app
        .oneshot(post_json("/api/v1/analysis", body.to_string()))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let error = body_json(response).await;
    assert_eq!(error["kind"], "site_count");
}

#[tokio::test]
async fn test_analysis_rejects_empty_site_name() {
    let app = setup_test_app();
    let body = r#"{"sites": [
        {"name": "SLC", "physical_server_count": 60},
        {"name": "", "physical_server_count": 60}
    ]}"#;

    let response = app
        .oneshot(post_json("/api/v1/analysis", body.to_string()))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let error = body_json(response).await;
    assert_eq!(error["kind"], "empty_site_name");
}

#[tokio::test]
async fn test_analysis_rejects_zero_sessions_per_vm() {
    let app = setup_test_app();
    let config = Configuration::default().with_server_spec(planner_lib::ServerSpec {
        max_sessions_per_vm: 0,
        ..Default::default()
    });
    let body = serde_json::to_string(&config).unwrap();

    let response = app.oneshot(post_json("/api/v1/analysis", body)).await.unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let error = body_json(response).await;
    assert_eq!(error["kind"], "invalid_server_spec");
}

#[tokio::test]
async fn test_analysis_rejects_malformed_json() {
    let app = setup_test_app();

    let response = app
        .oneshot(post_json("/api/v1/analysis", "{not json".to_string()))
        .await
        .unwrap();

    assert!(response.status().is_client_error());
}

#[tokio::test]
async fn test_load_curve_with_zero_sessions() {
    let app = setup_test_app();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/v1/load-curve?max_sessions=0")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let report = body_json(response).await;
    let points = report["points"].as_array().unwrap();
    assert_eq!(points.len(), 24);
    assert!(points.iter().all(|p| p["session_count"] == 0));
    assert_eq!(report["distribution"]["peak_load_percent"], 100);
}

#[tokio::test]
async fn test_load_curve_defaults_to_baseline_sessions() {
    let app = setup_test_app();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/v1/load-curve")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    let report = body_json(response).await;
    assert_eq!(report["points"][14]["session_count"], 2000);
}

#[tokio::test]
async fn test_metrics_endpoint_returns_prometheus_format() {
    let app = setup_test_app();
    let body = serde_json::to_string(&Configuration::default()).unwrap();

    let response = app
        .clone()
        .oneshot(post_json("/api/v1/analysis", body))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .oneshot(Request::builder().uri("/metrics").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let content_type = response.headers().get("content-type").unwrap();
    assert!(content_type.to_str().unwrap().contains("text/plain"));

    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let metrics_text = String::from_utf8(body.to_vec()).unwrap();

    assert!(metrics_text.contains("capacity_planner_evaluation_latency_seconds_bucket"));
    assert!(metrics_text.contains("capacity_planner_evaluations_total"));
    assert!(metrics_text.contains("capacity_planner_n1_deficit_cpu"));
}
