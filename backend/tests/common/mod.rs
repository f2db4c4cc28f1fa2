use std::sync::Arc;

use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use axum::Router;
use serde_json::Value;
use todo_backend::routes::create_router;
use todo_backend::service::TodoService;
use todo_backend::store::{MemoryStore, RedisStore};
use tower::ServiceExt;

/// Router backed by a fresh in-memory store.
pub fn setup_router() -> Router {
    // Allow multiple calls to init for tests.
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
    create_router(TodoService::new(Arc::new(MemoryStore::new())))
}

/// Router whose store has no connection URI, so every storage call fails.
pub fn setup_unconfigured_router() -> Router {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
    create_router(TodoService::new(Arc::new(RedisStore::new(None, "test"))))
}

/// Sends a request and returns the status with the decoded JSON body.
pub async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, json)
}
