//! Server configuration loaded from environment variables.
//!
//! Every setting has a default so the board starts with zero configuration
//! for local development. Twilio credentials have no default; without them
//! the SMS relay answers with an error and reminders stay disabled.

use std::net::SocketAddr;
use std::path::PathBuf;

use crate::domain::notification::{DEFAULT_LEAD_MINUTES, MAX_LEAD_MINUTES};
use crate::domain::sms_service::TwilioConfig;

const DEFAULT_TWILIO_API_BASE: &str = "https://api.twilio.com";

/// Board server configuration.
#[derive(Debug, Clone)]
pub struct BoardConfig {
    /// Socket address for the HTTP API.
    /// Env: `HTTP_ADDR`
    /// Default: `127.0.0.1:3000`
    pub http_addr: SocketAddr,

    /// sqlx SQLite connection URL.
    /// Env: `DATABASE_URL`
    /// Default: `sqlite:chore_board.db`
    pub database_url: String,

    /// Directory holding the built frontend bundle.
    /// Env: `STATIC_DIR`
    /// Default: `./frontend/dist`
    pub static_dir: PathBuf,

    /// Origin allowed by CORS.
    /// Env: `ALLOWED_ORIGIN`
    /// Default: `http://localhost:8080`
    pub allowed_origin: String,

    /// Minutes before the due time that a reminder fires.
    /// Env: `REMINDER_LEAD_MINUTES`
    /// Default: `15`, accepted range `0..=10080`
    pub reminder_lead_minutes: i64,

    /// Env: `TWILIO_ACCOUNT_SID`, `TWILIO_AUTH_TOKEN`, `TWILIO_PHONE_NUMBER`,
    /// `TWILIO_API_BASE`
    pub twilio: Option<TwilioConfig>,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            http_addr: ([127, 0, 0, 1], 3000).into(),
            database_url: "sqlite:chore_board.db".to_string(),
            static_dir: PathBuf::from("./frontend/dist"),
            allowed_origin: "http://localhost:8080".to_string(),
            reminder_lead_minutes: DEFAULT_LEAD_MINUTES,
            twilio: None,
        }
    }
}

impl BoardConfig {
    /// Load configuration from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(addr) = lookup("HTTP_ADDR") {
            match addr.parse::<SocketAddr>() {
                Ok(parsed) => config.http_addr = parsed,
                Err(_) => tracing::warn!(value = %addr, "Invalid HTTP_ADDR, using default"),
            }
        }

        if let Some(url) = lookup("DATABASE_URL") {
            if !url.trim().is_empty() {
                config.database_url = url;
            }
        }

        if let Some(dir) = lookup("STATIC_DIR") {
            config.static_dir = PathBuf::from(dir);
        }

        if let Some(origin) = lookup("ALLOWED_ORIGIN") {
            config.allowed_origin = origin;
        }

        if let Some(val) = lookup("REMINDER_LEAD_MINUTES") {
            match val.parse::<i64>() {
                Ok(minutes) if (0..=MAX_LEAD_MINUTES).contains(&minutes) => config.reminder_lead_minutes = minutes,
                _ => tracing::warn!(value = %val, "Invalid REMINDER_LEAD_MINUTES, using default"),
            }
        }

        let sid = lookup("TWILIO_ACCOUNT_SID").filter(|v| !v.is_empty());
        let token = lookup("TWILIO_AUTH_TOKEN").filter(|v| !v.is_empty());
        let from = lookup("TWILIO_PHONE_NUMBER").filter(|v| !v.is_empty());
        match (sid, token, from) {
            (Some(account_sid), Some(auth_token), Some(from_number)) => {
                config.twilio = Some(TwilioConfig {
                    account_sid,
                    auth_token,
                    from_number,
                    api_base: lookup("TWILIO_API_BASE")
                        .unwrap_or_else(|| DEFAULT_TWILIO_API_BASE.to_string()),
                });
            }
            (None, None, None) => {}
            _ => tracing::warn!("Incomplete Twilio credentials, SMS relay disabled"),
        }

        // RUST_LOG is read by tracing-subscriber's EnvFilter directly.

        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_default_config() {
        let config = BoardConfig::default();
        assert_eq!(config.http_addr, ([127, 0, 0, 1], 3000).into());
        assert_eq!(config.database_url, "sqlite:chore_board.db");
        assert_eq!(config.reminder_lead_minutes, 15);
        assert!(config.twilio.is_none());
    }

    #[test]
    fn test_overrides_from_lookup() {
        let config = BoardConfig::from_lookup(lookup_from(&[
            ("HTTP_ADDR", "0.0.0.0:8081"),
            ("DATABASE_URL", "sqlite::memory:"),
            ("REMINDER_LEAD_MINUTES", "30"),
        ]));
        assert_eq!(config.http_addr, ([0, 0, 0, 0], 8081).into());
        assert_eq!(config.database_url, "sqlite::memory:");
        assert_eq!(config.reminder_lead_minutes, 30);
    }

    #[test]
    fn test_invalid_values_fall_back() {
        let config = BoardConfig::from_lookup(lookup_from(&[
            ("HTTP_ADDR", "not-an-address"),
            ("REMINDER_LEAD_MINUTES", "-5"),
        ]));
        assert_eq!(config.http_addr, ([127, 0, 0, 1], 3000).into());
        assert_eq!(config.reminder_lead_minutes, 15);
    }

    #[test]
    fn test_lead_minutes_are_bounded() {
        let huge = BoardConfig::from_lookup(lookup_from(&[("REMINDER_LEAD_MINUTES", "200000000000000")]));
        assert_eq!(huge.reminder_lead_minutes, DEFAULT_LEAD_MINUTES);

        let week = BoardConfig::from_lookup(lookup_from(&[("REMINDER_LEAD_MINUTES", "10080")]));
        assert_eq!(week.reminder_lead_minutes, MAX_LEAD_MINUTES);

        let over = BoardConfig::from_lookup(lookup_from(&[("REMINDER_LEAD_MINUTES", "10081")]));
        assert_eq!(over.reminder_lead_minutes, DEFAULT_LEAD_MINUTES);
    }

    #[test]
    fn test_twilio_requires_all_credentials() {
        let partial = BoardConfig::from_lookup(lookup_from(&[("TWILIO_ACCOUNT_SID", "AC123")]));
        assert!(partial.twilio.is_none());

        let full = BoardConfig::from_lookup(lookup_from(&[
            ("TWILIO_ACCOUNT_SID", "AC123"),
            ("TWILIO_AUTH_TOKEN", "secret"),
            ("TWILIO_PHONE_NUMBER", "+15550001111"),
        ]));
        let twilio = full.twilio.expect("twilio config");
        assert_eq!(twilio.account_sid, "AC123");
        assert_eq!(twilio.from_number, "+15550001111");
        assert_eq!(twilio.api_base, "https://api.twilio.com");
    }
}
