//! Health check endpoint tests.
//!
//! Verifies the `/health` endpoint returns the fixed service payload
//! regardless of prior traffic or output-directory state.

use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use serde_json::Value;
use srl_api::{create_router, AppState};
use srl_core::SubmissionStore;
use tower::ServiceExt;

fn test_app() -> (tempfile::TempDir, axum::Router) {
    let dir = tempfile::tempdir().expect("create temp dir");
    let store = SubmissionStore::open(dir.path()).expect("open store");
    (dir, create_router(AppState::new(store)))
}

fn health_request() -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri("/health")
        .body(Body::empty())
        .expect("build request")
}

#[tokio::test]
async fn health_check_returns_fixed_payload() {
    let (_dir, app) = test_app();

    let response = app.oneshot(health_request()).await.expect("execute request");

    assert_eq!(response.status(), StatusCode::OK);

    let content_type = response
        .headers()
        .get("content-type")
        .expect("health check should have content-type header");
    assert!(content_type.to_str().expect("header is ascii").contains("application/json"));

    let body =
        axum::body::to_bytes(response.into_body(), usize::MAX).await.expect("read response body");
    let parsed: Value = serde_json::from_slice(&body).expect("health payload is valid JSON");

    assert_eq!(parsed["status"], "healthy");
    assert_eq!(parsed["service"], "social-rl-data-server");
    assert_eq!(parsed.as_object().map(serde_json::Map::len), Some(2));
}

#[tokio::test]
async fn health_check_unaffected_by_prior_requests() {
    let (_dir, app) = test_app();

    // A rejected submission leaves the health endpoint untouched.
    let bad_request = Request::builder()
        .method("POST")
        .uri("/")
        .header("content-type", "application/json")
        .body(Body::from("{broken"))
        .expect("build request");
    let rejected = app.clone().oneshot(bad_request).await.expect("execute bad request");
    assert_eq!(rejected.status(), StatusCode::BAD_REQUEST);

    let response = app.oneshot(health_request()).await.expect("execute request");
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn health_check_rejects_post() {
    let (_dir, app) = test_app();

    let request = Request::builder()
        .method("POST")
        .uri("/health")
        .body(Body::empty())
        .expect("build request");

    let response = app.oneshot(request).await.expect("execute request");

    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
}
