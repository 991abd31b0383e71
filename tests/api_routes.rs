//! HTTP surface tests driven through the router with `oneshot`.

mod common;

use axum::{
    body::{to_bytes, Body},
    http::{header::CONTENT_TYPE, Request, StatusCode},
};
use common::{app_state, config, entry, mount_forecast};
use rain_assistant::api;
use serde_json::{json, Value};
use tower::ServiceExt;
use wiremock::MockServer;

async fn post_chat(server: &MockServer, body: String) -> (StatusCode, Value) {
    let app = api::router(app_state(server, 7.0_f64.ln()), &config(&server.uri()));
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/chat")
                .header(CONTENT_TYPE, "application/json")
                .body(Body::from(body))
                .unwrap(),
        )
        .await
        .unwrap();

    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn test_chat_returns_reply() {
    let server = MockServer::start().await;
    mount_forecast(&server, "Hanoi", vec![entry("2024-06-11 12:00:00", 92.0, 95.0, None)]).await;

    let (status, body) = post_chat(
        &server,
        json!({ "message": "will it rain in Hanoi tomorrow" }).to_string(),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let reply = body["reply"].as_str().unwrap();
    assert!(reply.contains("Hanoi"));
    assert!(reply.contains("ngày mai"));
}

#[tokio::test]
async fn test_chat_rejects_overlong_message() {
    let server = MockServer::start().await;

    let (status, body) =
        post_chat(&server, json!({ "message": "a".repeat(1001) }).to_string()).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"], "ValidationError");
}

#[tokio::test]
async fn test_chat_rejects_malformed_body() {
    let server = MockServer::start().await;

    let (status, body) = post_chat(&server, "{\"text\": 1}".to_string()).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "BadRequest");
}

#[tokio::test]
async fn test_healthz_reports_model() {
    let server = MockServer::start().await;
    let app = api::router(app_state(&server, 1.0), &config(&server.uri()));

    let response = app
        .oneshot(Request::builder().uri("/healthz").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["checks"]["model"]["detail"], "linear");
    assert_eq!(body["checks"]["gazetteer"]["detail"], "40 cities");
}
