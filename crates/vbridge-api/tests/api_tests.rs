//! API Integration Tests
//!
//! Exercises the listener end to end against the in-memory mock backend:
//! routing, CORS framing, the 400/500 taxonomy, id resolution, and the
//! per-request connection scoping.
//!
//! Author: hephaex@gmail.com

use std::sync::Arc;

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;
use vbridge_api::{create_router, state::AppState};
use vbridge_core::BridgeConfig;
use vbridge_store::testing::MockBackend;

/// Build a listener over a fresh mock backend (dimension 3, the listener
/// deployment's default)
fn test_app(backend: &MockBackend) -> Router {
    let state = Arc::new(AppState::new(
        BridgeConfig::default(),
        Arc::new(backend.connector()),
    ));
    create_router(state)
}

/// Helper to create a test request
fn create_json_request(method: &str, uri: &str, body: Option<Value>) -> Request<Body> {
    let builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("Content-Type", "application/json");

    match body {
        Some(json_body) => builder
            .body(Body::from(serde_json::to_string(&json_body).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

async fn response_json(response: axum::response::Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}

// =============================================================================
// Routing and Framing Tests
// =============================================================================

#[tokio::test]
async fn test_options_returns_204_on_any_path() {
    let backend = MockBackend::default();
    let app = test_app(&backend);

    let request = Request::builder()
        .method("OPTIONS")
        .uri("/whatever")
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    assert_eq!(
        response
            .headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .unwrap(),
        "*"
    );
    assert_eq!(backend.connections(), 0);
}

#[tokio::test]
async fn test_unknown_path_returns_404() {
    let backend = MockBackend::default();
    let app = test_app(&backend);

    let request = create_json_request("POST", "/search", Some(json!({})));
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let json = response_json(response).await;
    assert_eq!(json["error"], "not found");
}

#[tokio::test]
async fn test_wrong_method_returns_404() {
    let backend = MockBackend::default();
    let app = test_app(&backend);

    let request = Request::builder()
        .method("GET")
        .uri("/upsert")
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let json = response_json(response).await;
    assert_eq!(json["error"], "not found");
}

#[tokio::test]
async fn test_cors_headers_on_every_response() {
    let backend = MockBackend::default();
    let app = test_app(&backend);

    // 404 response
    let response = app
        .clone()
        .oneshot(create_json_request("POST", "/nope", None))
        .await
        .unwrap();
    assert_eq!(
        response
            .headers()
            .get(header::ACCESS_CONTROL_ALLOW_METHODS)
            .unwrap(),
        "POST, OPTIONS"
    );

    // 400 response
    let response = app
        .clone()
        .oneshot(create_json_request("POST", "/upsert", Some(json!({}))))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        response
            .headers()
            .get(header::ACCESS_CONTROL_ALLOW_HEADERS)
            .unwrap(),
        "Content-Type"
    );

    // 200 response
    let response = app
        .oneshot(create_json_request("POST", "/init", None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response
            .headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .unwrap(),
        "*"
    );
}

#[tokio::test]
async fn test_responses_are_json() {
    let backend = MockBackend::default();
    let app = test_app(&backend);

    let response = app
        .oneshot(create_json_request("POST", "/init", None))
        .await
        .unwrap();

    let content_type = response.headers().get(header::CONTENT_TYPE).unwrap();
    assert!(content_type.to_str().unwrap().starts_with("application/json"));
}

// =============================================================================
// /init Tests
// =============================================================================

#[tokio::test]
async fn test_init_provisions_all_collections() {
    let backend = MockBackend::default();
    let app = test_app(&backend);

    let response = app
        .oneshot(create_json_request("POST", "/init", None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = response_json(response).await;
    assert_eq!(json["ok"], true);

    for name in ["sessions", "messages", "events", "errors"] {
        assert!(backend.has(name), "missing collection {name}");
    }
}

#[tokio::test]
async fn test_init_is_idempotent() {
    let backend = MockBackend::default();
    let app = test_app(&backend);

    app.clone()
        .oneshot(create_json_request("POST", "/init", None))
        .await
        .unwrap();
    let response = app
        .oneshot(create_json_request("POST", "/init", None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    // Second pass found everything present and created nothing new.
    assert_eq!(backend.create_calls(), 4);
}

// =============================================================================
// /upsert Tests
// =============================================================================

#[tokio::test]
async fn test_upsert_invalid_json_returns_400() {
    let backend = MockBackend::default();
    let app = test_app(&backend);

    let request = Request::builder()
        .method("POST")
        .uri("/upsert")
        .header("Content-Type", "application/json")
        .body(Body::from("{not json"))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = response_json(response).await;
    assert_eq!(json["ok"], false);
    assert_eq!(json["error"], "bad request");
    assert!(json["detail"].is_string());
    assert_eq!(backend.connections(), 0);
}

#[tokio::test]
async fn test_upsert_missing_collection_never_calls_backend() {
    let backend = MockBackend::default();
    let app = test_app(&backend);

    let request = create_json_request("POST", "/upsert", Some(json!({ "payload": {"x": 1} })));
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = response_json(response).await;
    assert_eq!(json["error"], "bad request");
    assert_eq!(backend.connections(), 0);
    assert!(backend.upserts().is_empty());
}

#[tokio::test]
async fn test_upsert_missing_payload_returns_400() {
    let backend = MockBackend::default();
    let app = test_app(&backend);

    let request = create_json_request("POST", "/upsert", Some(json!({ "collection": "events" })));
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(backend.connections(), 0);
}

#[tokio::test]
async fn test_upsert_unknown_collection_returns_400() {
    let backend = MockBackend::default();
    let app = test_app(&backend);

    let request = create_json_request(
        "POST",
        "/upsert",
        Some(json!({ "collection": "bogus", "payload": {"x": 1} })),
    );
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = response_json(response).await;
    assert!(json["detail"]
        .as_str()
        .unwrap()
        .contains("unknown collection"));
    assert!(backend.upserts().is_empty());
}

#[tokio::test]
async fn test_upsert_explicit_id_passes_through() {
    let backend = MockBackend::default();
    let app = test_app(&backend);

    let request = create_json_request(
        "POST",
        "/upsert",
        Some(json!({ "collection": "events", "payload": {"_id": 42, "x": 1} })),
    );
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = response_json(response).await;
    assert_eq!(json["ok"], true);

    let upserts = backend.upserts();
    assert_eq!(upserts.len(), 1);
    assert_eq!(upserts[0].id, 42);
    assert_eq!(upserts[0].collection, "events");
    assert_eq!(upserts[0].payload["x"], json!(1));
}

#[tokio::test]
async fn test_upsert_without_id_uses_sentinel_zero() {
    let backend = MockBackend::default();
    let app = test_app(&backend);

    let request = create_json_request(
        "POST",
        "/upsert",
        Some(json!({ "collection": "events", "payload": {"x": 1} })),
    );
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let upserts = backend.upserts();
    assert_eq!(upserts.len(), 1);
    assert_eq!(upserts[0].id, 0);
    // The sentinel is injected into the stored payload as well.
    assert_eq!(upserts[0].payload["_id"], json!(0));
}

#[tokio::test]
async fn test_upsert_non_integer_id_returns_400() {
    let backend = MockBackend::default();
    let app = test_app(&backend);

    let request = create_json_request(
        "POST",
        "/upsert",
        Some(json!({ "collection": "events", "payload": {"_id": "abc"} })),
    );
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(backend.upserts().is_empty());
}

#[tokio::test]
async fn test_upsert_writes_zero_vector_of_configured_dimension() {
    let backend = MockBackend::default();
    let app = test_app(&backend);

    let request = create_json_request(
        "POST",
        "/upsert",
        Some(json!({ "collection": "sessions", "payload": {"user": "a"} })),
    );
    app.oneshot(request).await.unwrap();

    assert_eq!(backend.upserts()[0].vector, vec![0.0, 0.0, 0.0]);
}

// =============================================================================
// Connection Scoping Tests
// =============================================================================

#[tokio::test]
async fn test_each_request_opens_its_own_connection() {
    let backend = MockBackend::default();
    let app = test_app(&backend);

    app.clone()
        .oneshot(create_json_request("POST", "/init", None))
        .await
        .unwrap();
    assert_eq!(backend.connections(), 1);

    for _ in 0..2 {
        let request = create_json_request(
            "POST",
            "/upsert",
            Some(json!({ "collection": "events", "payload": {"x": 1} })),
        );
        let response = app.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    // One connection for /init plus one per upsert, none shared.
    assert_eq!(backend.connections(), 3);
}

// =============================================================================
// Failure Handling Tests
// =============================================================================

#[tokio::test]
async fn test_backend_failure_returns_500_and_listener_survives() {
    let backend = MockBackend::default();
    let app = test_app(&backend);

    backend.fail_upserts(true);
    let request = create_json_request(
        "POST",
        "/upsert",
        Some(json!({ "collection": "events", "payload": {"x": 1} })),
    );
    let response = app.clone().oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let json = response_json(response).await;
    assert_eq!(json["ok"], false);
    assert!(json["error"].as_str().unwrap().contains("upsert"));
    assert!(json["trace"].is_string());

    // The next request is served normally.
    backend.clear_failures();
    let request = create_json_request(
        "POST",
        "/upsert",
        Some(json!({ "collection": "events", "payload": {"x": 2} })),
    );
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}
