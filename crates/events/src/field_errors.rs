//! Inline per-field error annotations.
//!
//! Each form control carries at most one annotation. Showing a new one on
//! the same field replaces the old message; clearing an absent one is fine.

use std::collections::BTreeMap;

use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldErrorAnnotation {
    pub field: String,
    pub message: String,
}

/// Annotations currently attached to one form's controls.
#[derive(Debug, Clone, Default)]
pub struct FieldErrors {
    annotations: BTreeMap<String, FieldErrorAnnotation>,
}

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach `message` to `field`, replacing any existing annotation.
    pub fn show_field_error(&mut self, field: &str, message: impl Into<String>) {
        let annotation = FieldErrorAnnotation {
            field: field.to_string(),
            message: message.into(),
        };
        self.annotations.insert(field.to_string(), annotation);
    }

    /// Remove the annotation on `field`. Returns whether one was present.
    pub fn clear_field_error(&mut self, field: &str) -> bool {
        self.annotations.remove(field).is_some()
    }

    pub fn get(&self, field: &str) -> Option<&FieldErrorAnnotation> {
        self.annotations.get(field)
    }

    /// Annotations ordered by field name.
    pub fn iter(&self) -> impl Iterator<Item = &FieldErrorAnnotation> {
        self.annotations.values()
    }

    pub fn len(&self) -> usize {
        self.annotations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.annotations.is_empty()
    }

    /// Drop every annotation (form reset).
    pub fn clear_all(&mut self) {
        self.annotations.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn show_replaces_instead_of_stacking() {
        let mut errors = FieldErrors::new();
        errors.show_field_error("email", "Format email tidak valid");
        errors.show_field_error("email", "Field ini wajib diisi");

        assert_eq!(errors.len(), 1);
        assert_eq!(errors.get("email").unwrap().message, "Field ini wajib diisi");
    }

    #[test]
    fn annotations_on_different_fields_coexist() {
        let mut errors = FieldErrors::new();
        errors.show_field_error("phone", "a");
        errors.show_field_error("email", "b");

        let fields: Vec<_> = errors.iter().map(|a| a.field.as_str()).collect();
        assert_eq!(fields, ["email", "phone"]);
    }

    #[test]
    fn clear_is_noop_when_absent() {
        let mut errors = FieldErrors::new();
        assert!(!errors.clear_field_error("name"));

        errors.show_field_error("name", "x");
        errors.show_field_error("guests", "y");
        assert!(errors.clear_field_error("name"));
        assert!(errors.get("name").is_none());
        assert!(errors.get("guests").is_some());
    }

    #[test]
    fn clear_all_resets() {
        let mut errors = FieldErrors::new();
        errors.show_field_error("name", "x");
        errors.clear_all();
        assert!(errors.is_empty());
    }
}
