//! Form validation engine.
//!
//! Provides rule types, a pure-logic evaluator, the localized message
//! catalogs and the rule sets of the two booking-page forms.

pub mod catalog;
pub mod evaluator;
pub mod forms;
pub mod rules;

pub use catalog::{Locale, Surface};
pub use evaluator::{validate, validate_on};
pub use forms::FormKind;
pub use rules::{FieldRule, FieldViolation, PatternRule, RuleSet, ValidationMode, ValidationResult};
