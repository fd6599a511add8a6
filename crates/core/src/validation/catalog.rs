//! Localized validation messages.
//!
//! The contact form speaks English and the reservation form speaks
//! Indonesian. Language is a property of the form, not of the visitor.
//! Notification messages are full sentences; inline messages are the short
//! labels shown under a control.

use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    En,
    Id,
}

/// Where a message is going to be displayed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Surface {
    Notification,
    Inline,
}

/// Render `error` for the given locale and surface.
///
/// `range` is the violated field's configured bounds, used by range
/// messages; the default 1-50 is shown when absent.
pub fn message(
    locale: Locale,
    surface: Surface,
    error: &ValidationError,
    range: Option<&RangeInclusive<i64>>,
) -> String {
    let (min, max) = range.map_or((1, 50), |r| (*r.start(), *r.end()));
    match locale {
        Locale::En => english(surface, error, min, max),
        Locale::Id => indonesian(surface, error, min, max),
    }
}

fn english(surface: Surface, error: &ValidationError, min: i64, max: i64) -> String {
    use ValidationError::*;

    match (surface, error) {
        (Surface::Notification, MissingRequiredField(f)) => format!("Please fill in the {f} field."),
        (Surface::Inline, MissingRequiredField(_)) => "This field is required".to_string(),

        (Surface::Notification, InvalidFormat(f)) => match f.as_str() {
            "email" => "Please enter a valid email address.".to_string(),
            "phone" => "Please enter a valid phone number.".to_string(),
            "date" => "Please enter a valid date.".to_string(),
            other => format!("Please enter a valid {other}."),
        },
        (Surface::Inline, InvalidFormat(f)) => match f.as_str() {
            "email" => "Invalid email format".to_string(),
            "phone" => "Invalid phone number format".to_string(),
            "date" => "Invalid date format".to_string(),
            other => format!("Invalid {other} format"),
        },

        (Surface::Notification, OutOfRange(f)) if f == "guests" => {
            format!("Number of guests must be between {min}-{max}.")
        }
        (Surface::Notification, OutOfRange(f)) => format!("The {f} must be between {min}-{max}."),
        (Surface::Inline, OutOfRange(f)) if f == "guests" => format!("Guests must be {min}-{max}"),
        (Surface::Inline, OutOfRange(_)) => format!("Must be between {min}-{max}"),

        (Surface::Notification, PastDate(_)) => "Tour date must be in the future.".to_string(),
        (Surface::Inline, PastDate(_)) => "Date must be in the future".to_string(),
    }
}

fn indonesian(surface: Surface, error: &ValidationError, min: i64, max: i64) -> String {
    use ValidationError::*;

    match (surface, error) {
        (Surface::Notification, MissingRequiredField(f)) => format!("Mohon isi field {f}."),
        (Surface::Inline, MissingRequiredField(_)) => "Field ini wajib diisi".to_string(),

        (Surface::Notification, InvalidFormat(f)) => match f.as_str() {
            "email" => "Mohon masukkan alamat email yang valid.".to_string(),
            "phone" => "Mohon masukkan nomor telepon yang valid.".to_string(),
            "date" => "Mohon masukkan tanggal yang valid.".to_string(),
            other => format!("Mohon periksa kembali field {other}."),
        },
        (Surface::Inline, InvalidFormat(f)) => match f.as_str() {
            "email" => "Format email tidak valid".to_string(),
            "phone" => "Format nomor telepon tidak valid".to_string(),
            "date" => "Format tanggal tidak valid".to_string(),
            other => format!("Format {other} tidak valid"),
        },

        (Surface::Notification, OutOfRange(f)) if f == "guests" => {
            format!("Jumlah peserta harus antara {min}-{max} orang.")
        }
        (Surface::Notification, OutOfRange(f)) => format!("Nilai {f} harus antara {min}-{max}."),
        (Surface::Inline, OutOfRange(f)) if f == "guests" => {
            format!("Jumlah peserta harus {min}-{max} orang")
        }
        (Surface::Inline, OutOfRange(_)) => format!("Nilai harus {min}-{max}"),

        (Surface::Notification, PastDate(_)) => "Tanggal tour harus di masa depan.".to_string(),
        (Surface::Inline, PastDate(_)) => "Tanggal harus di masa depan".to_string(),
    }
}
