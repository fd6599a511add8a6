#![allow(dead_code)]

use axum::body::Body;
use axum::http::{Method, Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use tourdesk_api::app::{build_router, build_state};
use tourdesk_api::config::{FormsConfig, ServerConfig};

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
    }
}

/// Build the full application router with the default form settings.
///
/// Must be called inside a Tokio runtime (the notifier binds to it).
pub fn build_test_app() -> Router {
    build_test_app_with(FormsConfig::default())
}

pub fn build_test_app_with(forms: FormsConfig) -> Router {
    let state = build_state(test_config(), &forms).expect("state should build");
    build_router(state).expect("router should build")
}

pub async fn send(app: Router, method: Method, uri: &str, body: Option<Value>) -> Response<Body> {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string())),
        None => builder.body(Body::empty()),
    }
    .expect("request should build");

    app.oneshot(request).await.expect("router is infallible")
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    send(app, Method::GET, uri, None).await
}

pub async fn post_json(app: Router, uri: &str, body: Value) -> Response<Body> {
    send(app, Method::POST, uri, Some(body)).await
}

pub async fn post_empty(app: Router, uri: &str) -> Response<Body> {
    send(app, Method::POST, uri, None).await
}

pub async fn delete(app: Router, uri: &str) -> Response<Body> {
    send(app, Method::DELETE, uri, None).await
}

/// Collect a response body and parse it as JSON.
pub async fn body_json(response: Response<Body>) -> Value {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body should be readable")
        .to_bytes();
    serde_json::from_slice(&bytes).expect("body should be JSON")
}
