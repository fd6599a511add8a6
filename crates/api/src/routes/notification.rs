//! Route definitions for the `/notification` resource.

use axum::routing::{delete, get};
use axum::Router;

use crate::handlers::notification;
use crate::state::AppState;

/// Routes mounted at `/notification`.
///
/// ```text
/// GET    /        -> current
/// DELETE /{id}    -> dismiss
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(notification::current))
        .route("/{id}", delete(notification::dismiss))
}
