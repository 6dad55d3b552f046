//! Configuration handling for the archive client.
//!
//! Everything has a development default pointing at the public lore archive,
//! so `Config::from_env` only fails when a variable is present but malformed.

use std::env;
use std::time::Duration;

use thiserror::Error;
use url::Url;

/// Environment variable names. Public so tests and the CLI can refer to them.
pub const ENV_BASE_URL: &str = "LORE_BASE_URL";
pub const ENV_USER_AGENT: &str = "LORE_USER_AGENT";
pub const ENV_CONNECT_TIMEOUT_SECS: &str = "LORE_CONNECT_TIMEOUT_SECS";
pub const ENV_REQUEST_TIMEOUT_SECS: &str = "LORE_REQUEST_TIMEOUT_SECS";
pub const ENV_MAX_BODY_BYTES: &str = "LORE_MAX_BODY_BYTES";

const DEFAULT_BASE_URL: &str = "https://lore.kernel.org";
const DEFAULT_USER_AGENT: &str = "lorescope/0.1";
const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
const DEFAULT_MAX_BODY_BYTES: u64 = 5 * 1024 * 1024; // 5MB

/// Runtime configuration for fetching and parsing archive pages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    base_url: String,
    user_agent: String,
    connect_timeout: Duration,
    request_timeout: Duration,
    max_body_bytes: u64,
}

impl Config {
    /// Create a config for the given archive, keeping the default HTTP limits.
    pub fn new(base_url: &str) -> Result<Self, ConfigError> {
        Ok(Self {
            base_url: normalize_base_url(base_url)?,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            connect_timeout: Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS),
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
        })
    }

    /// Load from environment variables, falling back to defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        let base_url = env::var(ENV_BASE_URL).unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        let mut config = Self::new(&base_url)?;

        if let Ok(user_agent) = env::var(ENV_USER_AGENT) {
            config.user_agent = user_agent;
        }
        config.connect_timeout = Duration::from_secs(read_u64(
            ENV_CONNECT_TIMEOUT_SECS,
            DEFAULT_CONNECT_TIMEOUT_SECS,
        )?);
        config.request_timeout = Duration::from_secs(read_u64(
            ENV_REQUEST_TIMEOUT_SECS,
            DEFAULT_REQUEST_TIMEOUT_SECS,
        )?);
        config.max_body_bytes = read_u64(ENV_MAX_BODY_BYTES, DEFAULT_MAX_BODY_BYTES)?;

        Ok(config)
    }

    pub fn with_base_url(mut self, base_url: &str) -> Result<Self, ConfigError> {
        self.base_url = normalize_base_url(base_url)?;
        Ok(self)
    }

    pub fn with_max_body_bytes(mut self, max_body_bytes: u64) -> Self {
        self.max_body_bytes = max_body_bytes;
        self
    }

    /// Archive root without a trailing slash, e.g. `https://lore.kernel.org`.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }
    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }
    pub fn connect_timeout(&self) -> Duration {
        self.connect_timeout
    }
    pub fn request_timeout(&self) -> Duration {
        self.request_timeout
    }
    /// Largest response body the fetcher accepts.
    pub fn max_body_bytes(&self) -> u64 {
        self.max_body_bytes
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            connect_timeout: Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS),
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
        }
    }
}

/// Errors that can occur while building a configuration.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid value for '{field}': {reason}")]
    InvalidValue { field: &'static str, reason: String },
}

fn normalize_base_url(raw: &str) -> Result<String, ConfigError> {
    let trimmed = raw.trim().trim_end_matches('/');
    let parsed = Url::parse(trimmed).map_err(|e| ConfigError::InvalidValue {
        field: ENV_BASE_URL,
        reason: e.to_string(),
    })?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(ConfigError::InvalidValue {
            field: ENV_BASE_URL,
            reason: format!("unsupported scheme '{}'", parsed.scheme()),
        });
    }
    Ok(trimmed.to_string())
}

fn read_u64(key: &'static str, default: u64) -> Result<u64, ConfigError> {
    match env::var(key) {
        Ok(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue {
                field: key,
                reason: format!("expected a non-negative integer, got '{value}'"),
            }),
        Err(_) => Ok(default),
    }
}
