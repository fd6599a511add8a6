use std::sync::Arc;

use tourdesk_core::validation::FormKind;
use tourdesk_events::{FormController, FormControllers, Notifier};

use crate::config::ServerConfig;
use crate::error::AppError;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// The page's single notification slot.
    pub notifier: Notifier,
    /// Submit/blur/input handlers for each form.
    pub forms: FormControllers,
}

impl AppState {
    /// Resolve a form slug from the URL to its controller.
    pub fn form(&self, slug: &str) -> Result<&Arc<FormController>, AppError> {
        let kind: FormKind = slug.parse()?;
        self.forms
            .get(kind)
            .ok_or_else(|| AppError::InternalError(format!("no controller for form {kind}")))
    }
}
