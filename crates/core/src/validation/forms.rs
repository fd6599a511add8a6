//! The two forms on the booking page.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::config::ValidationConfig;
use crate::error::CoreError;

use super::catalog::Locale;
use super::evaluator::not_in_past;
use super::rules::{FieldRule, PatternRule, RuleSet};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FormKind {
    /// General enquiry form, English messages.
    Contact,
    /// Tour booking form, Indonesian messages.
    Reservation,
}

impl FormKind {
    pub const ALL: [FormKind; 2] = [FormKind::Contact, FormKind::Reservation];

    /// URL slug, also used in logs.
    pub fn slug(self) -> &'static str {
        match self {
            FormKind::Contact => "contact",
            FormKind::Reservation => "reservation",
        }
    }

    pub fn locale(self) -> Locale {
        match self {
            FormKind::Contact => Locale::En,
            FormKind::Reservation => Locale::Id,
        }
    }

    /// Shown once the (simulated) submission completes.
    pub fn success_message(self) -> &'static str {
        match self {
            FormKind::Contact => {
                "Thank you! Your message has been sent successfully. We will contact you soon!"
            }
            FormKind::Reservation => {
                "Terima kasih! Reservasi Anda telah berhasil dikirim. Kami akan segera mengkonfirmasi booking Anda!"
            }
        }
    }

    /// Build the rule set for this form.
    ///
    /// Both forms declare email, phone, date and guests in that order, which
    /// fixes the order their format checks surface on submit.
    pub fn rule_set(self, config: &ValidationConfig) -> Result<RuleSet, CoreError> {
        config.check()?;

        let email = PatternRule::new("email", &config.email_pattern)?;
        let phone = PatternRule::new("phone", &config.phone_pattern)?.stripping_whitespace();

        let phone_rule = match self {
            FormKind::Contact => FieldRule::optional("phone"),
            FormKind::Reservation => FieldRule::required("phone"),
        };
        let notes = match self {
            FormKind::Contact => "message",
            FormKind::Reservation => "requests",
        };

        let rules = vec![
            FieldRule::required("name"),
            FieldRule::required("email").with_pattern(email),
            phone_rule.with_pattern(phone),
            FieldRule::required("package"),
            FieldRule::required("date").with_custom(not_in_past),
            FieldRule::required("guests").with_range(config.guests_min, config.guests_max),
            FieldRule::optional(notes),
        ];

        Ok(RuleSet::new(self.locale(), rules))
    }
}

impl fmt::Display for FormKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

impl FromStr for FormKind {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FormKind::ALL
            .into_iter()
            .find(|k| k.slug() == s)
            .ok_or_else(|| CoreError::NotFound {
                entity: "form",
                key: s.to_string(),
            })
    }
}
