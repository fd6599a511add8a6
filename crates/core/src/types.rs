use std::collections::HashMap;

use serde::{Deserialize, Deserializer, Serialize};

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// Key/value snapshot of one submitted form.
///
/// Produced once per submission or blur event. Values are kept exactly as
/// submitted; trimming happens inside the validator. When deserialized,
/// JSON numbers and booleans become their text form and `null` becomes an
/// empty value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FormRecord {
    fields: HashMap<String, String>,
}

impl FormRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert, mostly for tests and single-field blur records.
    pub fn with(mut self, field: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.insert(field.into(), value.into());
        self
    }

    pub fn insert(&mut self, field: impl Into<String>, value: impl Into<String>) {
        self.fields.insert(field.into(), value.into());
    }

    /// Raw submitted value, if the control was present at all.
    pub fn get(&self, field: &str) -> Option<&str> {
        self.fields.get(field).map(String::as_str)
    }

    /// Trimmed value, or `None` when missing or whitespace-only.
    pub fn value(&self, field: &str) -> Option<&str> {
        self.get(field).map(str::trim).filter(|v| !v.is_empty())
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for FormRecord
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            fields: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// A single submitted value as it may arrive in JSON.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawValue {
    Text(String),
    Integer(i64),
    Number(f64),
    Flag(bool),
    Null,
}

impl From<RawValue> for String {
    fn from(raw: RawValue) -> Self {
        match raw {
            RawValue::Text(s) => s,
            RawValue::Integer(n) => n.to_string(),
            RawValue::Number(n) => n.to_string(),
            RawValue::Flag(b) => b.to_string(),
            RawValue::Null => String::new(),
        }
    }
}

impl<'de> Deserialize<'de> for FormRecord {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = HashMap::<String, RawValue>::deserialize(deserializer)?;
        Ok(raw.into_iter().collect())
    }
}
