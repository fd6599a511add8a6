//! Route definitions for the `/forms` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::forms;
use crate::state::AppState;

/// Routes mounted at `/forms`.
///
/// ```text
/// POST   /{form}/submit                 -> submit
/// POST   /{form}/fields/{field}/blur    -> blur
/// POST   /{form}/fields/{field}/input   -> input
/// GET    /{form}/field-errors           -> field_errors
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/{form}/submit", post(forms::submit))
        .route("/{form}/fields/{field}/blur", post(forms::blur))
        .route("/{form}/fields/{field}/input", post(forms::input))
        .route("/{form}/field-errors", get(forms::field_errors))
}
