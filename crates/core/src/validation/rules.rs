//! Validation rule and result types.

use std::ops::RangeInclusive;

use chrono::NaiveDate;
use regex::Regex;
use serde::Serialize;

use crate::error::{CoreError, ValidationError};
use crate::types::FormRecord;

use super::catalog::{Locale, Surface};

/// Regex matcher for a field's format.
#[derive(Debug, Clone)]
pub struct PatternRule {
    regex: Regex,
    strip_whitespace: bool,
}

impl PatternRule {
    /// Compile `pattern`. `name` identifies the pattern in the error.
    pub fn new(name: &'static str, pattern: &str) -> Result<Self, CoreError> {
        let regex =
            Regex::new(pattern).map_err(|source| CoreError::InvalidPattern { name, source })?;
        Ok(Self {
            regex,
            strip_whitespace: false,
        })
    }

    /// Remove every whitespace character before matching (phone numbers are
    /// commonly typed in groups).
    pub fn stripping_whitespace(mut self) -> Self {
        self.strip_whitespace = true;
        self
    }

    pub fn matches(&self, value: &str) -> bool {
        if self.strip_whitespace {
            let compact: String = value.chars().filter(|c| !c.is_whitespace()).collect();
            self.regex.is_match(&compact)
        } else {
            self.regex.is_match(value)
        }
    }
}

/// What a custom check can see besides the value under test.
#[derive(Debug, Clone, Copy)]
pub struct CheckContext<'a> {
    pub record: &'a FormRecord,
    /// The local calendar date the pass runs on.
    pub today: NaiveDate,
}

/// Predicate over a trimmed, non-empty value. Receives the field name so the
/// returned error can reference it.
pub type CustomCheck =
    fn(field: &str, value: &str, ctx: &CheckContext<'_>) -> Result<(), ValidationError>;

/// Static rule for one form control.
#[derive(Debug, Clone)]
pub struct FieldRule {
    pub field: String,
    pub required: bool,
    pub pattern: Option<PatternRule>,
    /// Inclusive integer bounds. Non-integer input fails the range check.
    pub range: Option<RangeInclusive<i64>>,
    pub custom: Option<CustomCheck>,
}

impl FieldRule {
    pub fn required(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            required: true,
            pattern: None,
            range: None,
            custom: None,
        }
    }

    pub fn optional(field: impl Into<String>) -> Self {
        Self {
            required: false,
            ..Self::required(field)
        }
    }

    pub fn with_pattern(mut self, pattern: PatternRule) -> Self {
        self.pattern = Some(pattern);
        self
    }

    pub fn with_range(mut self, min: i64, max: i64) -> Self {
        self.range = Some(min..=max);
        self
    }

    pub fn with_custom(mut self, check: CustomCheck) -> Self {
        self.custom = Some(check);
        self
    }
}

/// Ordered rules for one form plus the locale its messages are written in.
///
/// Declaration order decides which failure surfaces first on submit.
#[derive(Debug, Clone)]
pub struct RuleSet {
    locale: Locale,
    rules: Vec<FieldRule>,
}

impl RuleSet {
    pub fn new(locale: Locale, rules: Vec<FieldRule>) -> Self {
        Self { locale, rules }
    }

    pub fn locale(&self) -> Locale {
        self.locale
    }

    pub fn get(&self, field: &str) -> Option<&FieldRule> {
        self.rules.iter().find(|r| r.field == field)
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldRule> {
        self.rules.iter()
    }

    /// Names of the required fields in declaration order.
    pub fn required_fields(&self) -> impl Iterator<Item = &str> {
        self.rules
            .iter()
            .filter(|r| r.required)
            .map(|r| r.field.as_str())
    }
}

/// Which pass to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationMode<'a> {
    /// Whole-record check on form submission. Fail-fast.
    Submit,
    /// Single-field check when the named control loses focus.
    FieldBlur(&'a str),
}

impl ValidationMode<'_> {
    /// Submit failures go to the notifier, blur failures stay inline.
    pub fn surface(&self) -> Surface {
        match self {
            ValidationMode::Submit => Surface::Notification,
            ValidationMode::FieldBlur(_) => Surface::Inline,
        }
    }
}

/// A single field-level rule violation with its localized message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldViolation {
    pub field: String,
    pub error: ValidationError,
    pub message: String,
}

/// Outcome of one validation pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "violations", rename_all = "snake_case")]
pub enum ValidationResult {
    Valid,
    Invalid(Vec<FieldViolation>),
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        matches!(self, ValidationResult::Valid)
    }

    /// The violation to surface. Both passes report at most one.
    pub fn first(&self) -> Option<&FieldViolation> {
        self.violations().first()
    }

    pub fn violations(&self) -> &[FieldViolation] {
        match self {
            ValidationResult::Valid => &[],
            ValidationResult::Invalid(v) => v,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pattern_strips_whitespace_when_asked() {
        let plain = PatternRule::new("digits", r"^[0-9]+$").unwrap();
        let stripping = plain.clone().stripping_whitespace();
        assert!(!plain.matches("12 34"));
        assert!(stripping.matches("12 34"));
        assert!(stripping.matches(" 1\t2 3 4 "));
    }

    #[test]
    fn invalid_pattern_is_config_error() {
        let err = PatternRule::new("broken", "(").unwrap_err();
        assert!(matches!(err, CoreError::InvalidPattern { name: "broken", .. }));
    }

    #[test]
    fn required_fields_keep_declaration_order() {
        let rules = RuleSet::new(
            Locale::En,
            vec![
                FieldRule::required("name"),
                FieldRule::optional("phone"),
                FieldRule::required("email"),
            ],
        );
        let required: Vec<_> = rules.required_fields().collect();
        assert_eq!(required, ["name", "email"]);
        assert!(rules.get("phone").is_some());
        assert!(rules.get("fax").is_none());
    }

    #[test]
    fn result_serializes_with_status_tag() {
        let invalid = ValidationResult::Invalid(vec![FieldViolation {
            field: "email".into(),
            error: ValidationError::InvalidFormat("email".into()),
            message: "bad".into(),
        }]);
        let json = serde_json::to_value(&invalid).unwrap();
        assert_eq!(json["status"], "invalid");
        assert_eq!(json["violations"][0]["field"], "email");

        let valid = serde_json::to_value(ValidationResult::Valid).unwrap();
        assert_eq!(valid["status"], "valid");
    }
}
