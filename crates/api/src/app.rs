//! Application assembly shared by the binary and the integration tests.

use std::any::Any;
use std::sync::Arc;
use std::time::Duration;

use axum::http::header::CONTENT_TYPE;
use axum::http::{HeaderName, HeaderValue, Method, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Router;
use tourdesk_core::error::CoreError;
use tourdesk_events::{FormControllers, Notifier, NotifierError};
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::CorsLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

use crate::config::{FormsConfig, ServerConfig};
use crate::error::AppError;
use crate::routes;
use crate::state::AppState;

#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    #[error(transparent)]
    Notifier(#[from] NotifierError),

    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("Invalid CORS origin '{0}'")]
    CorsOrigin(String),
}

/// Create the notifier and the form controllers.
///
/// Must run inside the Tokio runtime the server will use; the notifier's
/// timers are spawned there.
pub fn build_state(config: ServerConfig, forms: &FormsConfig) -> Result<AppState, StartupError> {
    let notifier = Notifier::new(forms.notifier.clone())?;
    let controllers = FormControllers::new(&forms.validation, &notifier, forms.submit_delay)?;

    Ok(AppState {
        config: Arc::new(config),
        notifier,
        forms: controllers,
    })
}

/// Build the full application router with all middleware layers.
pub fn build_router(state: AppState) -> Result<Router, StartupError> {
    let cors = build_cors_layer(&state.config)?;
    let request_timeout = Duration::from_secs(state.config.request_timeout_secs);
    let request_id_header = HeaderName::from_static("x-request-id");

    let app = Router::new()
        // Health check at root level (not under /api/v1).
        .merge(routes::health::router())
        // API v1 routes.
        .nest("/api/v1", routes::api_routes())
        // -- Middleware stack (applied bottom-up) --
        // Panic recovery: catch panics and return 500 JSON.
        .layer(CatchPanicLayer::custom(panic_response))
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            request_timeout,
        ))
        // Propagate request ID to response.
        .layer(PropagateRequestIdLayer::new(request_id_header.clone()))
        // Structured request/response tracing.
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        // Set request ID on incoming requests.
        .layer(SetRequestIdLayer::new(request_id_header, MakeRequestUuid))
        .layer(cors)
        .with_state(state);

    Ok(app)
}

/// Render a caught handler panic as the standard 500 error body.
fn panic_response(panic: Box<dyn Any + Send + 'static>) -> Response {
    let detail = panic
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| panic.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic payload");
    AppError::InternalError(format!("handler panicked: {detail}")).into_response()
}

/// Build the CORS middleware layer from server configuration.
///
/// Misconfigured origins fail startup.
fn build_cors_layer(config: &ServerConfig) -> Result<CorsLayer, StartupError> {
    let origins = config
        .cors_origins
        .iter()
        .map(|o| {
            o.parse::<HeaderValue>()
                .map_err(|_| StartupError::CorsOrigin(o.clone()))
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::DELETE])
        .allow_headers([CONTENT_TYPE])
        .max_age(Duration::from_secs(3600)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn server_config(origins: &[&str]) -> ServerConfig {
        ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
            cors_origins: origins.iter().map(|o| o.to_string()).collect(),
            request_timeout_secs: 30,
        }
    }

    #[test]
    fn state_needs_runtime() {
        let err = build_state(server_config(&[]), &FormsConfig::default()).err();
        assert!(matches!(err, Some(StartupError::Notifier(NotifierError::NoRuntime))));
    }

    #[tokio::test]
    async fn bad_cors_origin_fails_startup() {
        let state = build_state(server_config(&["bad\norigin"]), &FormsConfig::default()).unwrap();
        assert!(matches!(build_router(state), Err(StartupError::CorsOrigin(_))));
    }

    #[tokio::test]
    async fn panic_renders_json_error() {
        use http_body_util::BodyExt;

        let response = panic_response(Box::new("boom"));
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(json["code"], "INTERNAL_ERROR");
        assert_eq!(json["error"], "An internal error occurred");
    }

    #[tokio::test]
    async fn bad_phone_pattern_fails_startup() {
        let mut forms = FormsConfig::default();
        forms.validation.phone_pattern = "(".into();
        let err = build_state(server_config(&[]), &forms).err();
        assert!(matches!(err, Some(StartupError::Core(CoreError::InvalidPattern { .. }))));
    }
}
