//! Notification and form-interaction layer for the tourdesk booking page.
//!
//! - [`Notifier`]: single-slot transient notification with a timed
//!   `Created -> Visible -> Dismissing -> Gone` lifecycle.
//! - [`FieldErrors`]: inline per-field error annotations.
//! - [`FormController`]: submit/blur/input handlers wiring validation to
//!   the notifier and the annotations, plus the simulated submission.

pub mod controller;
pub mod field_errors;
pub mod notifier;

pub use controller::{BlurOutcome, FormController, FormControllers, SubmissionReceipt, SubmitOutcome};
pub use field_errors::{FieldErrorAnnotation, FieldErrors};
pub use notifier::{
    DismissCause, Notification, NotificationHandle, NotificationId, NotificationKind,
    NotificationPhase, NotificationSnapshot, Notifier, NotifierConfig, NotifierError,
    NotifierEvent,
};
