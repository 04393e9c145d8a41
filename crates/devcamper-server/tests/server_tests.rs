//! Integration tests for the unversioned routes and middleware stack

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
};

mod common;
use common::TestApp;

#[tokio::test]
async fn test_root_reports_service() {
    let app = TestApp::new();

    let res = app.get("/", None).await;

    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body["name"], "DevCamper API");
    assert_eq!(res.body["status"], "running");
}

#[tokio::test]
async fn test_health_pings_store() {
    let app = TestApp::new();

    let res = app.get("/health", None).await;

    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body["success"], true);
    assert_eq!(res.body["data"]["database"], "connected");
}

#[tokio::test]
async fn test_unknown_route_uses_error_envelope() {
    let app = TestApp::new();

    let res = app.get("/api/v1/nothing-here", None).await;

    assert_eq!(res.status, StatusCode::NOT_FOUND);
    assert_eq!(res.body["success"], false);
    assert_eq!(res.error(), "Cannot GET /api/v1/nothing-here");
}

#[tokio::test]
async fn test_cors_preflight() {
    let app = TestApp::new();

    let request = Request::builder()
        .method(Method::OPTIONS)
        .uri("/api/v1/bootcamps")
        .header(header::ORIGIN, "http://localhost:3000")
        .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
        .body(Body::empty())
        .unwrap();
    let res = app.send(request).await;

    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(
        res.headers
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .and_then(|v| v.to_str().ok()),
        Some("http://localhost:3000")
    );
}
