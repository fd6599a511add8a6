pub mod forms;
pub mod health;
pub mod notification;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /forms/{form}/submit                     submit (POST)
/// /forms/{form}/fields/{field}/blur        blur validation (POST)
/// /forms/{form}/fields/{field}/input       clear annotation (POST)
/// /forms/{form}/field-errors               inline annotations (GET)
///
/// /notification                            live notification (GET)
/// /notification/{id}                       dismiss (DELETE)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/forms", forms::router())
        .nest("/notification", notification::router())
}
