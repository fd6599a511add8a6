use serde::Serialize;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Not found: {entity} '{key}'")]
    NotFound { entity: &'static str, key: String },

    #[error("Invalid pattern for {name}: {source}")]
    InvalidPattern {
        name: &'static str,
        #[source]
        source: regex::Error,
    },

    #[error("Invalid configuration: {0}")]
    Config(String),
}

/// A single user-facing validation failure.
///
/// These are data returned by the validator, never raised. Every variant
/// names the field it refers to so callers can route it to a notification
/// or to the field's inline annotation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, thiserror::Error)]
#[serde(tag = "kind", content = "field", rename_all = "snake_case")]
pub enum ValidationError {
    #[error("Missing required field: {0}")]
    MissingRequiredField(String),

    #[error("Invalid format: {0}")]
    InvalidFormat(String),

    #[error("Out of range: {0}")]
    OutOfRange(String),

    #[error("Date is in the past: {0}")]
    PastDate(String),
}

impl ValidationError {
    /// The field this error refers to.
    pub fn field(&self) -> &str {
        match self {
            ValidationError::MissingRequiredField(f)
            | ValidationError::InvalidFormat(f)
            | ValidationError::OutOfRange(f)
            | ValidationError::PastDate(f) => f,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_returns_referenced_field() {
        assert_eq!(ValidationError::PastDate("date".into()).field(), "date");
        assert_eq!(
            ValidationError::MissingRequiredField("name".into()).field(),
            "name"
        );
    }

    #[test]
    fn serializes_with_kind_tag() {
        let json = serde_json::to_value(ValidationError::OutOfRange("guests".into())).unwrap();
        assert_eq!(json["kind"], "out_of_range");
        assert_eq!(json["field"], "guests");
    }
}
