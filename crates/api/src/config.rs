use std::str::FromStr;
use std::time::Duration;

use tourdesk_core::config::{
    ValidationConfig, DEFAULT_GUESTS_MAX, DEFAULT_GUESTS_MIN, EMAIL_PATTERN, PHONE_PATTERN,
};
use tourdesk_events::controller::DEFAULT_SUBMIT_DELAY;
use tourdesk_events::notifier::{
    NotifierConfig, DEFAULT_DISPLAY_DURATION, DEFAULT_EXIT_TRANSITION, DEFAULT_SHOW_DELAY,
};

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{name} has an invalid value: {value:?}")]
    Invalid { name: &'static str, value: String },
}

/// Server configuration loaded from environment variables.
///
/// All fields have sensible defaults suitable for local development.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default                    |
    /// |------------------------|----------------------------|
    /// | `HOST`                 | `0.0.0.0`                  |
    /// | `PORT`                 | `3000`                     |
    /// | `CORS_ORIGINS`         | `http://localhost:5173`    |
    /// | `REQUEST_TIMEOUT_SECS` | `30`                       |
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Same as [`from_env`](Self::from_env) but reading through `lookup`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let host = lookup("HOST").unwrap_or_else(|| "0.0.0.0".into());
        let port = parse_or(&lookup, "PORT", 3000)?;

        let cors_origins: Vec<String> = lookup("CORS_ORIGINS")
            .unwrap_or_else(|| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs = parse_or(&lookup, "REQUEST_TIMEOUT_SECS", 30)?;

        Ok(Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
        })
    }
}

/// Timing and business rules for the booking forms.
#[derive(Debug, Clone)]
pub struct FormsConfig {
    pub notifier: NotifierConfig,
    pub submit_delay: Duration,
    pub validation: ValidationConfig,
}

impl FormsConfig {
    /// Load form settings from environment variables with defaults.
    ///
    /// | Env Var                      | Default                     |
    /// |------------------------------|-----------------------------|
    /// | `NOTIFICATION_DURATION_MS`   | `5000`                      |
    /// | `NOTIFICATION_EXIT_MS`       | `300`                       |
    /// | `NOTIFICATION_SHOW_DELAY_MS` | `10`                        |
    /// | `SUBMIT_DELAY_MS`            | `2000`                      |
    /// | `GUESTS_MIN`                 | `1`                         |
    /// | `GUESTS_MAX`                 | `50`                        |
    /// | `PHONE_PATTERN`              | Indonesian mobile numbers   |
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let notifier = NotifierConfig {
            display_duration: millis_or(&lookup, "NOTIFICATION_DURATION_MS", DEFAULT_DISPLAY_DURATION)?,
            exit_transition: millis_or(&lookup, "NOTIFICATION_EXIT_MS", DEFAULT_EXIT_TRANSITION)?,
            show_delay: millis_or(&lookup, "NOTIFICATION_SHOW_DELAY_MS", DEFAULT_SHOW_DELAY)?,
        };
        let submit_delay = millis_or(&lookup, "SUBMIT_DELAY_MS", DEFAULT_SUBMIT_DELAY)?;

        let validation = ValidationConfig {
            email_pattern: EMAIL_PATTERN.to_string(),
            phone_pattern: lookup("PHONE_PATTERN").unwrap_or_else(|| PHONE_PATTERN.to_string()),
            guests_min: parse_or(&lookup, "GUESTS_MIN", DEFAULT_GUESTS_MIN)?,
            guests_max: parse_or(&lookup, "GUESTS_MAX", DEFAULT_GUESTS_MAX)?,
        };

        Ok(Self {
            notifier,
            submit_delay,
            validation,
        })
    }
}

impl Default for FormsConfig {
    fn default() -> Self {
        Self {
            notifier: NotifierConfig::default(),
            submit_delay: DEFAULT_SUBMIT_DELAY,
            validation: ValidationConfig::default(),
        }
    }
}

fn parse_or<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &'static str,
    default: T,
) -> Result<T, ConfigError> {
    match lookup(name) {
        None => Ok(default),
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { name, value: raw }),
    }
}

fn millis_or(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &'static str,
    default: Duration,
) -> Result<Duration, ConfigError> {
    parse_or(lookup, name, as_millis_u64(default)).map(Duration::from_millis)
}

/// Whole milliseconds in `duration`, saturating at `u64::MAX`.
pub fn as_millis_u64(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn server_defaults() {
        let config = ServerConfig::from_lookup(env(&[])).unwrap();
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 3000);
        assert_eq!(config.cors_origins, ["http://localhost:5173"]);
        assert_eq!(config.request_timeout_secs, 30);
    }

    #[test]
    fn cors_origins_are_split_and_trimmed() {
        let config =
            ServerConfig::from_lookup(env(&[("CORS_ORIGINS", "https://a.id, https://b.id,")]))
                .unwrap();
        assert_eq!(config.cors_origins, ["https://a.id", "https://b.id"]);
    }

    #[test]
    fn bad_port_is_an_error() {
        let err = ServerConfig::from_lookup(env(&[("PORT", "eighty")])).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { name: "PORT", .. }));
    }

    #[test]
    fn forms_defaults_match_page_constants() {
        let config = FormsConfig::from_lookup(env(&[])).unwrap();
        assert_eq!(config.notifier.display_duration, Duration::from_millis(5000));
        assert_eq!(config.notifier.exit_transition, Duration::from_millis(300));
        assert_eq!(config.notifier.show_delay, Duration::from_millis(10));
        assert_eq!(config.submit_delay, Duration::from_millis(2000));
        assert_eq!(config.validation, ValidationConfig::default());
    }

    #[test]
    fn forms_overrides() {
        let config = FormsConfig::from_lookup(env(&[
            ("NOTIFICATION_DURATION_MS", "8000"),
            ("GUESTS_MAX", "30"),
            ("SUBMIT_DELAY_MS", "0"),
        ]))
        .unwrap();
        assert_eq!(config.notifier.display_duration, Duration::from_millis(8000));
        assert_eq!(config.validation.guests_max, 30);
        assert_eq!(config.submit_delay, Duration::ZERO);
    }

    #[test]
    fn millis_conversion_saturates() {
        assert_eq!(as_millis_u64(Duration::from_millis(2000)), 2000);
        assert_eq!(as_millis_u64(Duration::MAX), u64::MAX);
    }

    #[test]
    fn negative_duration_is_an_error() {
        let err = FormsConfig::from_lookup(env(&[("NOTIFICATION_EXIT_MS", "-5")])).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { name: "NOTIFICATION_EXIT_MS", .. }));
    }
}
