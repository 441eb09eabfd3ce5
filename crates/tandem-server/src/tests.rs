//! Server API tests

use super::*;
use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use chrono::NaiveDate;
use http_body_util::BodyExt;
use tandem_core::models::Goal;
use tandem_core::{InMemoryGoalSource, JsonFileGoalSource, PortfolioEngine};
use tower::ServiceExt;

fn wedding_goals() -> Vec<Goal> {
    let deadline = NaiveDate::from_ymd_opt(2026, 7, 15).unwrap();
    vec![
        Goal::new("venue", "Venue", 12000.0).with_target_date(deadline),
        Goal::new("rings", "Rings", 6000.0).with_target_date(deadline),
    ]
}

fn setup_test_app() -> Router {
    setup_test_app_with(ServerConfig::default())
}

fn setup_test_app_with(config: ServerConfig) -> Router {
    let source = Arc::new(InMemoryGoalSource::new(wedding_goals()));
    let service = PortfolioService::new(source, PortfolioEngine::new());
    create_router(service, config)
}

async fn get_body_json(response: axum::response::Response) -> serde_json::Value {
    let body = response.into_body();
    let bytes = body.collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn post_json(uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

// ========== Health & Config Tests ==========

#[tokio::test]
async fn test_health() {
    let app = setup_test_app();

    let response = app.oneshot(get("/api/health")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = get_body_json(response).await;
    assert_eq!(json["status"], "ok");
    assert_eq!(json["source"], "memory");
}

#[tokio::test]
async fn test_security_headers() {
    let app = setup_test_app();

    let response = app.oneshot(get("/api/health")).await.unwrap();

    let headers = response.headers();
    assert_eq!(headers["x-content-type-options"], "nosniff");
    assert_eq!(headers["x-frame-options"], "DENY");
    assert!(headers.contains_key("content-security-policy"));
}

#[tokio::test]
async fn test_get_config() {
    let app = setup_test_app();

    let response = app.oneshot(get("/api/config")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = get_body_json(response).await;
    assert_eq!(json["conflicts"]["funding_model"], "shared_pool");
    assert_eq!(json["recommendations"]["max"], 3);
}

#[tokio::test]
async fn test_unknown_route_is_json_404() {
    let app = setup_test_app();

    let response = app.oneshot(get("/api/nothing-here")).await.unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let json = get_body_json(response).await;
    assert_eq!(json["error"], "Not found");
}

// ========== Portfolio API Tests ==========

#[tokio::test]
async fn test_get_portfolio() {
    let app = setup_test_app();

    let response = app
        .oneshot(get("/api/portfolio?capacity=2500&now=2026-01-20"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = get_body_json(response).await;
    assert_eq!(json["is_empty"], false);
    assert_eq!(json["totals"]["monthly_required"], 3000.0);
    assert_eq!(json["totals"]["is_realistic"], false);
    assert_eq!(json["conflicts"][0]["severity"], "HIGH");
    assert_eq!(json["recommendations"][0]["type"], "increase-capacity");
}

#[tokio::test]
async fn test_get_portfolio_with_refresh() {
    let app = setup_test_app();

    let response = app
        .oneshot(get("/api/portfolio?capacity=4000&now=2026-01-20&refresh=true"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = get_body_json(response).await;
    assert_eq!(json["totals"]["is_realistic"], true);
}

#[tokio::test]
async fn test_get_portfolio_requires_capacity() {
    let app = setup_test_app();

    let response = app.oneshot(get("/api/portfolio")).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = get_body_json(response).await;
    assert!(json["error"].as_str().unwrap().contains("capacity"));
}

#[tokio::test]
async fn test_get_portfolio_rejects_bad_date() {
    let app = setup_test_app();

    let response = app
        .oneshot(get("/api/portfolio?capacity=1000&now=tomorrow"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_get_portfolio_rejects_non_finite_capacity() {
    let app = setup_test_app();

    let response = app
        .oneshot(get("/api/portfolio?capacity=inf&now=2026-01-20"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_get_conflicts() {
    let app = setup_test_app();

    let response = app
        .oneshot(get("/api/portfolio/conflicts?capacity=2500&now=2026-01-20"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = get_body_json(response).await;
    let conflicts = json.as_array().unwrap();
    assert_eq!(conflicts.len(), 1);
    assert_eq!(conflicts[0]["key"], "2026-07");
    assert_eq!(conflicts[0]["shortage"], 3000.0);
}

#[tokio::test]
async fn test_post_analyze() {
    let app = setup_test_app();

    let body = serde_json::json!({
        "goals": [
            {"id": "car", "title": "Car", "target_amount": "9000", "target_date": "2026-10-01",
             "contributions": [{"amount": 3000, "date": "2025-12-01"}]},
            {"id": "hobby", "title": "Learn guitar", "target_amount": 0}
        ],
        "capacity": 1000,
        "now": "2026-01-01"
    });

    let response = app
        .oneshot(post_json("/api/portfolio/analyze", body))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = get_body_json(response).await;
    let goals = json["goals"].as_array().unwrap();
    assert_eq!(goals.len(), 1);
    assert_eq!(goals[0]["goal_id"], "car");
    assert_eq!(goals[0]["total_saved"], 3000.0);
    assert_eq!(json["analyzed_on"], "2026-01-01");
}

#[tokio::test]
async fn test_post_analyze_empty_portfolio() {
    let app = setup_test_app();

    let body = serde_json::json!({"goals": [], "capacity": 500, "now": "2026-01-01"});

    let response = app
        .oneshot(post_json("/api/portfolio/analyze", body))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = get_body_json(response).await;
    assert_eq!(json["is_empty"], true);
    assert_eq!(json["health_score"], 0);
}

#[tokio::test]
async fn test_post_analyze_rejects_malformed_body() {
    let app = setup_test_app();

    let body = serde_json::json!({"goals": "not a list", "capacity": 500});

    let response = app
        .oneshot(post_json("/api/portfolio/analyze", body))
        .await
        .unwrap();

    assert!(response.status().is_client_error());
}

#[tokio::test]
async fn test_source_failure_is_sanitized_500() {
    let source = Arc::new(JsonFileGoalSource::new("/nonexistent/goals.json"));
    let service = PortfolioService::new(source, PortfolioEngine::new());
    let app = create_router(service, ServerConfig::default());

    let response = app
        .oneshot(get("/api/portfolio?capacity=1000&now=2026-01-20"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let json = get_body_json(response).await;
    assert_eq!(json["error"], "An internal error occurred");
    assert!(!json.to_string().contains("nonexistent"));
}

// ========== CORS Tests ==========

#[tokio::test]
async fn test_cors_allows_configured_origin() {
    let app = setup_test_app_with(ServerConfig {
        allowed_origins: vec!["http://localhost:5173".to_string()],
    });

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/health")
                .header("origin", "http://localhost:5173")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(
        response.headers()["access-control-allow-origin"],
        "http://localhost:5173"
    );
}

#[tokio::test]
async fn test_cors_same_origin_by_default() {
    let app = setup_test_app();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/health")
                .header("origin", "https://evil.example.com")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert!(!response
        .headers()
        .contains_key("access-control-allow-origin"));
}
