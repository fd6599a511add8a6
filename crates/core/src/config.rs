//! Business constants for the booking forms.
//!
//! The guest bounds and the phone pattern reflect the operator's current
//! rules rather than anything derived, so they are plain configuration that
//! the API layer may override from the environment.

use crate::error::CoreError;

/// Matches `local@domain.tld` with no whitespace and a single `@`.
pub const EMAIL_PATTERN: &str = r"^[^\s@]+@[^\s@]+\.[^\s@]+$";

/// Indonesian mobile number: `+62`, `62` or `0`, then `8`, a non-zero digit
/// and 6-9 more digits. Applied after stripping whitespace.
pub const PHONE_PATTERN: &str = r"^(\+62|62|0)8[1-9][0-9]{6,9}$";

/// Default inclusive lower bound for the number of guests.
pub const DEFAULT_GUESTS_MIN: i64 = 1;

/// Default inclusive upper bound for the number of guests.
pub const DEFAULT_GUESTS_MAX: i64 = 50;

/// Tunable inputs for building the form rule sets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationConfig {
    pub email_pattern: String,
    pub phone_pattern: String,
    pub guests_min: i64,
    pub guests_max: i64,
}

impl ValidationConfig {
    /// Reject configurations that could never accept any guest count.
    pub fn check(&self) -> Result<(), CoreError> {
        if self.guests_min > self.guests_max {
            return Err(CoreError::Config(format!(
                "guest range is empty: {}-{}",
                self.guests_min, self.guests_max
            )));
        }
        Ok(())
    }
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            email_pattern: EMAIL_PATTERN.to_string(),
            phone_pattern: PHONE_PATTERN.to_string(),
            guests_min: DEFAULT_GUESTS_MIN,
            guests_max: DEFAULT_GUESTS_MAX,
        }
    }
}
