//! Rule evaluator -- pure logic, no side effects.
//!
//! Never fails on malformed input: every outcome is a [`ValidationResult`].

use chrono::{Local, NaiveDate};

use crate::error::ValidationError;
use crate::types::FormRecord;

use super::catalog;
use super::rules::{CheckContext, FieldRule, FieldViolation, RuleSet, ValidationMode, ValidationResult};

/// Date format submitted by `<input type="date">`.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Validate `record` against `rules` as of today's local date.
pub fn validate(record: &FormRecord, rules: &RuleSet, mode: ValidationMode<'_>) -> ValidationResult {
    validate_on(record, rules, mode, Local::now().date_naive())
}

/// Validate `record` against `rules` as of `today`.
///
/// - `Submit`: first missing required field in declared order, then the
///   first format/range/custom failure in declared order.
/// - `FieldBlur(name)`: only the named field. Unknown fields are valid.
pub fn validate_on(
    record: &FormRecord,
    rules: &RuleSet,
    mode: ValidationMode<'_>,
    today: NaiveDate,
) -> ValidationResult {
    let ctx = CheckContext { record, today };

    let failure = match mode {
        ValidationMode::Submit => check_submit(rules, &ctx),
        ValidationMode::FieldBlur(name) => rules
            .get(name)
            .and_then(|rule| check_field(rule, &ctx).map(|e| (rule, e))),
    };

    match failure {
        None => ValidationResult::Valid,
        Some((rule, error)) => {
            let message = catalog::message(rules.locale(), mode.surface(), &error, rule.range.as_ref());
            ValidationResult::Invalid(vec![FieldViolation {
                field: rule.field.clone(),
                error,
                message,
            }])
        }
    }
}

/// Custom check: the value is a `YYYY-MM-DD` date no earlier than today.
///
/// Today itself passes. Unparseable dates are a format error.
pub fn not_in_past(field: &str, value: &str, ctx: &CheckContext<'_>) -> Result<(), ValidationError> {
    let date = NaiveDate::parse_from_str(value, DATE_FORMAT)
        .map_err(|_| ValidationError::InvalidFormat(field.to_string()))?;
    if date < ctx.today {
        return Err(ValidationError::PastDate(field.to_string()));
    }
    Ok(())
}

fn check_submit<'r>(
    rules: &'r RuleSet,
    ctx: &CheckContext<'_>,
) -> Option<(&'r FieldRule, ValidationError)> {
    if let Some(rule) = rules
        .iter()
        .find(|r| r.required && ctx.record.value(&r.field).is_none())
    {
        return Some((rule, ValidationError::MissingRequiredField(rule.field.clone())));
    }

    rules
        .iter()
        .find_map(|rule| check_format(rule, ctx).map(|e| (rule, e)))
}

fn check_field(rule: &FieldRule, ctx: &CheckContext<'_>) -> Option<ValidationError> {
    match ctx.record.value(&rule.field) {
        None if rule.required => Some(ValidationError::MissingRequiredField(rule.field.clone())),
        None => None,
        Some(_) => check_format(rule, ctx),
    }
}

/// Pattern, then range, then custom. Absent values skip all three.
fn check_format(rule: &FieldRule, ctx: &CheckContext<'_>) -> Option<ValidationError> {
    let value = ctx.record.value(&rule.field)?;

    if let Some(pattern) = &rule.pattern {
        if !pattern.matches(value) {
            return Some(ValidationError::InvalidFormat(rule.field.clone()));
        }
    }

    if let Some(range) = &rule.range {
        match value.parse::<i64>() {
            Ok(n) if range.contains(&n) => {}
            _ => return Some(ValidationError::OutOfRange(rule.field.clone())),
        }
    }

    rule.custom.and_then(|check| check(&rule.field, value, ctx).err())
}
