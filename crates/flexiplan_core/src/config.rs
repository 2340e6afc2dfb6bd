//! Remote client configuration.
//!
//! # Responsibility
//! - Describe where the routine backend lives and how to authenticate.
//! - Load the same settings from the process environment for CLI/FFI hosts.
//!
//! # Invariants
//! - `base_url` is an `http(s)` URL without a trailing slash.
//! - `user_id` is positive.
//! - `request_timeout` lies within `MIN_REQUEST_TIMEOUT_MS..=MAX_REQUEST_TIMEOUT_MS`.

use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::Duration;

pub const ENV_BASE_URL: &str = "FLEXIPLAN_API_BASE_URL";
pub const ENV_USER_ID: &str = "FLEXIPLAN_USER_ID";
pub const ENV_ACCESS_TOKEN: &str = "FLEXIPLAN_ACCESS_TOKEN";
pub const ENV_REQUEST_TIMEOUT_MS: &str = "FLEXIPLAN_REQUEST_TIMEOUT_MS";

pub const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 15_000;
pub const MIN_REQUEST_TIMEOUT_MS: u64 = 1_000;
pub const MAX_REQUEST_TIMEOUT_MS: u64 = 120_000;

/// Configuration error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    Missing(&'static str),
    InvalidBaseUrl(String),
    InvalidUserId(String),
    InvalidTimeout(String),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Missing(name) => write!(f, "missing required setting `{name}`"),
            Self::InvalidBaseUrl(value) => {
                write!(f, "base url must start with http:// or https://, got `{value}`")
            }
            Self::InvalidUserId(value) => {
                write!(f, "user id must be a positive integer, got `{value}`")
            }
            Self::InvalidTimeout(value) => {
                write!(f, "request timeout must be milliseconds, got `{value}`")
            }
        }
    }
}

impl Error for ConfigError {}

/// Settings for talking to the routine backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub base_url: String,
    pub user_id: u64,
    pub access_token: Option<String>,
    pub request_timeout: Duration,
}

impl ClientConfig {
    /// Builds a validated config with the default timeout.
    pub fn new(
        base_url: &str,
        user_id: u64,
        access_token: Option<String>,
    ) -> Result<Self, ConfigError> {
        if user_id == 0 {
            return Err(ConfigError::InvalidUserId(user_id.to_string()));
        }
        Ok(Self {
            base_url: normalize_base_url(base_url)?,
            user_id,
            access_token: access_token
                .map(|token| token.trim().to_string())
                .filter(|token| !token.is_empty()),
            request_timeout: Duration::from_millis(DEFAULT_REQUEST_TIMEOUT_MS),
        })
    }

    /// Replaces the timeout, clamped to the supported range.
    pub fn with_request_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.request_timeout = Duration::from_millis(
            timeout_ms.clamp(MIN_REQUEST_TIMEOUT_MS, MAX_REQUEST_TIMEOUT_MS),
        );
        self
    }

    /// Loads settings from `FLEXIPLAN_*` environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Loads settings through an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let read = |name: &str| {
            lookup(name)
                .map(|raw| raw.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let base_url = read(ENV_BASE_URL).ok_or(ConfigError::Missing(ENV_BASE_URL))?;
        let raw_user_id = read(ENV_USER_ID).ok_or(ConfigError::Missing(ENV_USER_ID))?;
        let user_id = raw_user_id
            .parse::<u64>()
            .map_err(|_| ConfigError::InvalidUserId(raw_user_id.clone()))?;

        let config = Self::new(base_url.as_str(), user_id, read(ENV_ACCESS_TOKEN))?;
        match read(ENV_REQUEST_TIMEOUT_MS) {
            Some(raw) => {
                let timeout_ms = raw
                    .parse::<u64>()
                    .map_err(|_| ConfigError::InvalidTimeout(raw.clone()))?;
                Ok(config.with_request_timeout_ms(timeout_ms))
            }
            None => Ok(config),
        }
    }

    /// Joins an absolute API path onto the base URL.
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }
}

fn normalize_base_url(value: &str) -> Result<String, ConfigError> {
    let trimmed = value.trim().trim_end_matches('/');
    let has_host = trimmed
        .strip_prefix("https://")
        .or_else(|| trimmed.strip_prefix("http://"))
        .is_some_and(|rest| !rest.is_empty());
    if !has_host {
        return Err(ConfigError::InvalidBaseUrl(value.trim().to_string()));
    }
    Ok(trimmed.to_string())
}
