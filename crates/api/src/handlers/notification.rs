//! Handlers for the `/notification` resource.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use tourdesk_events::{NotificationHandle, NotificationId, NotificationSnapshot};

use crate::extract::ApiPath;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/notification
///
/// The live notification with its phase, or `null` when nothing is shown.
pub async fn current(State(state): State<AppState>) -> Json<DataResponse<Option<NotificationSnapshot>>> {
    Json(DataResponse {
        data: state.notifier.current(),
    })
}

/// DELETE /api/v1/notification/{id}
///
/// Close button. Stale or already-dismissed ids are a no-op; always 204
/// for a numeric id.
pub async fn dismiss(State(state): State<AppState>, ApiPath(id): ApiPath<u64>) -> StatusCode {
    let handle = NotificationHandle::from(NotificationId(id));
    if state.notifier.dismiss(&handle) {
        tracing::info!(notification_id = id, "Notification dismissed");
    }
    StatusCode::NO_CONTENT
}
