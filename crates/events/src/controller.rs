//! Event handlers for the booking-page forms.
//!
//! One [`FormController`] per form. Handler ordering:
//!
//! - `on_submit`: validation runs synchronously and fully before any
//!   asynchronous work is scheduled. A rejected submission is reported
//!   through the shared [`Notifier`]; an accepted one schedules the
//!   simulated submit, which reports success after the submit delay.
//! - `on_blur`: clears the field's annotation, validates the field alone,
//!   and re-annotates on failure. Never touches the notifier.
//! - `on_input`: clears the field's annotation.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use chrono::Utc;
use serde::Serialize;
use tourdesk_core::config::ValidationConfig;
use tourdesk_core::error::CoreError;
use tourdesk_core::types::{FormRecord, Timestamp};
use tourdesk_core::validation::{validate, FieldViolation, FormKind, RuleSet, ValidationMode};
use uuid::Uuid;

use crate::field_errors::{FieldErrorAnnotation, FieldErrors};
use crate::notifier::{NotificationId, NotificationKind, Notifier};

/// Stand-in for the network round trip of a real submission.
pub const DEFAULT_SUBMIT_DELAY: Duration = Duration::from_millis(2000);

/// Reference for an accepted submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubmissionReceipt {
    pub id: Uuid,
    pub form: FormKind,
    pub accepted_at: Timestamp,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SubmitOutcome {
    /// Validation passed; the simulated submit is in flight.
    Accepted { receipt: SubmissionReceipt },
    /// Validation failed; the violation was shown as an error notification.
    Rejected {
        violation: FieldViolation,
        notification_id: NotificationId,
    },
    /// A previous submission of this form is still sending.
    Busy,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BlurOutcome {
    pub field: String,
    pub valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

pub struct FormController {
    kind: FormKind,
    rules: RuleSet,
    notifier: Notifier,
    field_errors: Mutex<FieldErrors>,
    sending: AtomicBool,
    submit_delay: Duration,
}

impl FormController {
    pub fn new(
        kind: FormKind,
        config: &ValidationConfig,
        notifier: Notifier,
        submit_delay: Duration,
    ) -> Result<Arc<Self>, CoreError> {
        Ok(Arc::new(Self {
            kind,
            rules: kind.rule_set(config)?,
            notifier,
            field_errors: Mutex::new(FieldErrors::new()),
            sending: AtomicBool::new(false),
            submit_delay,
        }))
    }

    pub fn kind(&self) -> FormKind {
        self.kind
    }

    pub fn is_sending(&self) -> bool {
        self.sending.load(Ordering::SeqCst)
    }

    /// Handle a form submission.
    pub fn on_submit(self: &Arc<Self>, record: &FormRecord) -> SubmitOutcome {
        if self.is_sending() {
            tracing::debug!(form = %self.kind, "Submit ignored while sending");
            return SubmitOutcome::Busy;
        }

        let result = validate(record, &self.rules, ValidationMode::Submit);
        if let Some(violation) = result.first() {
            let handle = self
                .notifier
                .notify(violation.message.clone(), NotificationKind::Error);
            tracing::info!(
                form = %self.kind,
                field = %violation.field,
                error = %violation.error,
                "Submission rejected",
            );
            return SubmitOutcome::Rejected {
                violation: violation.clone(),
                notification_id: handle.id(),
            };
        }

        if self
            .sending
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return SubmitOutcome::Busy;
        }

        let receipt = SubmissionReceipt {
            id: Uuid::now_v7(),
            form: self.kind,
            accepted_at: Utc::now(),
        };
        tracing::info!(form = %self.kind, submission_id = %receipt.id, "Submission accepted");

        self.notifier
            .runtime()
            .spawn(simulate_submit(Arc::clone(self), receipt.id));

        SubmitOutcome::Accepted { receipt }
    }

    /// Handle a control losing focus with `value`.
    pub fn on_blur(&self, field: &str, value: &str) -> BlurOutcome {
        let record = FormRecord::new().with(field, value);
        let mut errors = self.lock_errors();
        errors.clear_field_error(field);

        let result = validate(&record, &self.rules, ValidationMode::FieldBlur(field));
        match result.first() {
            Some(violation) => {
                errors.show_field_error(field, violation.message.clone());
                tracing::debug!(form = %self.kind, field, "Field annotated");
                BlurOutcome {
                    field: field.to_string(),
                    valid: false,
                    message: Some(violation.message.clone()),
                }
            }
            None => BlurOutcome {
                field: field.to_string(),
                valid: true,
                message: None,
            },
        }
    }

    /// Handle the value of a control changing. Returns whether an
    /// annotation was removed.
    pub fn on_input(&self, field: &str) -> bool {
        self.lock_errors().clear_field_error(field)
    }

    /// Snapshot of the current annotations, ordered by field name.
    pub fn field_errors(&self) -> Vec<FieldErrorAnnotation> {
        self.lock_errors().iter().cloned().collect()
    }

    fn lock_errors(&self) -> MutexGuard<'_, FieldErrors> {
        self.field_errors
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

/// Completes an accepted submission: success notification, form reset,
/// submit button re-enabled.
async fn simulate_submit(controller: Arc<FormController>, submission_id: Uuid) {
    tokio::time::sleep(controller.submit_delay).await;

    controller.notifier.notify(
        controller.kind.success_message(),
        NotificationKind::Success,
    );
    controller.lock_errors().clear_all();
    controller.sending.store(false, Ordering::SeqCst);

    tracing::info!(form = %controller.kind, %submission_id, "Submission completed");
}

/// Controllers for every form on the page, sharing one notifier.
#[derive(Clone)]
pub struct FormControllers {
    controllers: HashMap<FormKind, Arc<FormController>>,
}

impl FormControllers {
    pub fn new(
        config: &ValidationConfig,
        notifier: &Notifier,
        submit_delay: Duration,
    ) -> Result<Self, CoreError> {
        let controllers = FormKind::ALL
            .into_iter()
            .map(|kind| {
                FormController::new(kind, config, notifier.clone(), submit_delay)
                    .map(|c| (kind, c))
            })
            .collect::<Result<_, _>>()?;
        Ok(Self { controllers })
    }

    pub fn get(&self, kind: FormKind) -> Option<&Arc<FormController>> {
        self.controllers.get(&kind)
    }
}
