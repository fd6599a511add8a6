//! Handlers for the `/forms` resource.
//!
//! Each request stands in for one DOM event on the booking page: a form
//! submission, a control losing focus, or a control's value changing.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use tourdesk_core::types::FormRecord;
use tourdesk_events::{BlurOutcome, FieldErrorAnnotation, SubmitOutcome};

use crate::error::{AppError, AppResult};
use crate::extract::{ApiJson, ApiPath};
use crate::response::DataResponse;
use crate::state::AppState;

/// Longest accepted field name in a path.
const MAX_FIELD_NAME_LEN: usize = 64;

/// Form control names are plain identifiers.
fn is_valid_field_name(name: &str) -> bool {
    !name.is_empty()
        && name.len() <= MAX_FIELD_NAME_LEN
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}

fn check_field_name(name: &str) -> AppResult<()> {
    if is_valid_field_name(name) {
        Ok(())
    } else {
        Err(AppError::BadRequest(format!("Invalid field name: {name:?}")))
    }
}

/// Request body for a form submission.
#[derive(Debug, Deserialize)]
pub struct SubmitRequest {
    #[serde(default)]
    pub fields: FormRecord,
}

/// Request body for a blur event.
#[derive(Debug, Deserialize)]
pub struct BlurRequest {
    #[serde(default)]
    pub value: String,
}

/// POST /api/v1/forms/{form}/submit
///
/// Validates synchronously. Returns 202 with a receipt when accepted (the
/// success notification follows after the submit delay), 422 with the
/// violation when rejected, 409 while a previous submission is sending.
pub async fn submit(
    State(state): State<AppState>,
    ApiPath(form): ApiPath<String>,
    ApiJson(input): ApiJson<SubmitRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<SubmitOutcome>>)> {
    let controller = state.form(&form)?;

    let outcome = controller.on_submit(&input.fields);
    let status = match &outcome {
        SubmitOutcome::Accepted { .. } => StatusCode::ACCEPTED,
        SubmitOutcome::Rejected { .. } => StatusCode::UNPROCESSABLE_ENTITY,
        SubmitOutcome::Busy => {
            return Err(AppError::Conflict(format!(
                "A {form} submission is already being sent"
            )))
        }
    };

    Ok((status, Json(DataResponse { data: outcome })))
}

/// POST /api/v1/forms/{form}/fields/{field}/blur
///
/// Validate one field and update its inline annotation.
pub async fn blur(
    State(state): State<AppState>,
    ApiPath((form, field)): ApiPath<(String, String)>,
    ApiJson(input): ApiJson<BlurRequest>,
) -> AppResult<Json<DataResponse<BlurOutcome>>> {
    check_field_name(&field)?;
    let controller = state.form(&form)?;
    let outcome = controller.on_blur(&field, &input.value);
    Ok(Json(DataResponse { data: outcome }))
}

/// POST /api/v1/forms/{form}/fields/{field}/input
///
/// The field's value changed: drop its annotation. Always 204.
pub async fn input(
    State(state): State<AppState>,
    ApiPath((form, field)): ApiPath<(String, String)>,
) -> AppResult<StatusCode> {
    check_field_name(&field)?;
    let controller = state.form(&form)?;
    controller.on_input(&field);
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/forms/{form}/field-errors
///
/// Current inline annotations, ordered by field name.
pub async fn field_errors(
    State(state): State<AppState>,
    ApiPath(form): ApiPath<String>,
) -> AppResult<Json<DataResponse<Vec<FieldErrorAnnotation>>>> {
    let controller = state.form(&form)?;
    Ok(Json(DataResponse {
        data: controller.field_errors(),
    }))
}
