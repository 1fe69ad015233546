//! # Client Configuration Module
//!
//! Loads settings for talking to the booking backend from environment
//! variables, with defaults where the backend's development setup allows.
//!
//! ## Environment Variables
//!
//! - `BOOKIT_API_URL`: Base URL of the booking backend (default: "http://localhost:8000")
//! - `BOOKIT_TIMEZONE`: IANA timezone used for display (default: `TZ`, then UTC)
//! - `LOG_LEVEL`: Logging level (default: "info")
//! - `BOOKIT_REQUEST_TIMEOUT_SECONDS`: Per-request timeout (default: 30)

use bookit_core::time::local_timezone;
use chrono_tz::Tz;
use eyre::{eyre, Result};
use std::env;
use std::time::Duration;
use tracing::Level;

pub const DEFAULT_API_URL: &str = "http://localhost:8000";
pub const DEFAULT_REQUEST_TIMEOUT_SECONDS: u64 = 30;

/// Configuration for the booking client.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the backend, without a trailing slash
    pub api_url: String,

    /// Timezone timestamps are displayed in
    pub timezone: Tz,

    /// Log level for the application
    pub log_level: Level,

    /// Request timeout in seconds
    pub request_timeout: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            timezone: Tz::UTC,
            log_level: Level::INFO,
            request_timeout: DEFAULT_REQUEST_TIMEOUT_SECONDS,
        }
    }
}

impl ClientConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if `BOOKIT_TIMEZONE` is set to a name chrono-tz
    /// doesn't know.
    pub fn from_env() -> Result<Self> {
        Self::from_vars(|key| env::var(key).ok())
    }

    /// Load configuration from any variable source, e.g. a map in tests.
    ///
    /// Unset `BOOKIT_TIMEZONE` falls back to [`local_timezone`]. An
    /// unparsable timeout falls back to [`DEFAULT_REQUEST_TIMEOUT_SECONDS`].
    ///
    /// # Errors
    ///
    /// Returns an error if `BOOKIT_TIMEZONE` is set to a name chrono-tz
    /// doesn't know.
    pub fn from_vars<F>(var: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_url = var("BOOKIT_API_URL").unwrap_or_else(|| DEFAULT_API_URL.to_string());

        let timezone = match var("BOOKIT_TIMEZONE") {
            Some(name) => parse_timezone(&name)?,
            None => local_timezone(),
        };

        let log_level = parse_log_level(&var("LOG_LEVEL").unwrap_or_else(|| "info".to_string()));

        let request_timeout = var("BOOKIT_REQUEST_TIMEOUT_SECONDS")
            .and_then(|secs| secs.trim().parse().ok())
            .unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECONDS);

        Ok(Self {
            api_url: normalize_base_url(&api_url),
            timezone,
            log_level,
            request_timeout,
        })
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout)
    }
}

pub fn parse_timezone(name: &str) -> Result<Tz> {
    name.trim()
        .parse::<Tz>()
        .map_err(|_| eyre!("BOOKIT_TIMEZONE must be an IANA timezone name, got {name:?}"))
}

/// Unknown names fall back to `INFO`.
pub fn parse_log_level(value: &str) -> Level {
    match value.trim().to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    }
}

pub fn normalize_base_url(url: &str) -> String {
    url.trim().trim_end_matches('/').to_string()
}
