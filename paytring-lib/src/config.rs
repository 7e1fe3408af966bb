//! Client configuration and credentials.
//!
//! # Environment Variables
//!
//! - `PAYTRING_API_KEY` - API key (`test_...` or `prod_...`)
//! - `PAYTRING_API_SECRET` - API secret, used only to compute hashes locally
//! - `PAYTRING_API_BASE_URL` - Gateway base URL (optional)
//! - `PAYTRING_API_VERSION` - API version path segment (optional)
//! - `PAYTRING_TIMEOUT_SECS` - Request timeout in seconds (optional)

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Default gateway base URL.
pub const DEFAULT_BASE_URL: &str = "https://api.paytring.com";

/// Default API version path segment.
pub const DEFAULT_API_VERSION: &str = "v1";

pub const ENV_API_KEY: &str = "PAYTRING_API_KEY";
pub const ENV_API_SECRET: &str = "PAYTRING_API_SECRET";
pub const ENV_BASE_URL: &str = "PAYTRING_API_BASE_URL";
pub const ENV_API_VERSION: &str = "PAYTRING_API_VERSION";
pub const ENV_TIMEOUT_SECS: &str = "PAYTRING_TIMEOUT_SECS";

/// Configuration loading errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("missing environment variable {0}")]
    MissingVar(String),
    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: String, reason: String },
}

/// The API secret.
///
/// Never leaves the process: it is not serializable, renders as
/// `[REDACTED]` under `Debug`, and is wiped from memory on drop.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct ApiSecret(String);

impl ApiSecret {
    pub fn new(secret: impl Into<String>) -> Self {
        Self(secret.into())
    }

    /// Borrow the raw secret for hashing.
    pub fn expose_secret(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for ApiSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiSecret([REDACTED])")
    }
}

impl From<&str> for ApiSecret {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for ApiSecret {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Gateway environment, inferred from the API key prefix.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Environment {
    /// Key starts with `test_`.
    Test,
    /// Key starts with `prod_`.
    Production,
    /// Any other key shape.
    Unknown,
}

/// API key and secret pair. Immutable once constructed.
#[derive(Clone, Debug)]
pub struct Credentials {
    api_key: String,
    api_secret: ApiSecret,
}

impl Credentials {
    pub fn new(api_key: impl Into<String>, api_secret: impl Into<ApiSecret>) -> Self {
        Self {
            api_key: api_key.into(),
            api_secret: api_secret.into(),
        }
    }

    /// Load credentials from `PAYTRING_API_KEY` and `PAYTRING_API_SECRET`.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load credentials through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = lookup(ENV_API_KEY)
            .filter(|v| !v.is_empty())
            .ok_or_else(|| ConfigError::MissingVar(ENV_API_KEY.to_string()))?;
        let api_secret = lookup(ENV_API_SECRET)
            .filter(|v| !v.is_empty())
            .ok_or_else(|| ConfigError::MissingVar(ENV_API_SECRET.to_string()))?;
        Ok(Self::new(api_key, api_secret))
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    pub fn api_secret(&self) -> &ApiSecret {
        &self.api_secret
    }

    pub fn environment(&self) -> Environment {
        if self.api_key.starts_with("test_") {
            Environment::Test
        } else if self.api_key.starts_with("prod_") {
            Environment::Production
        } else {
            Environment::Unknown
        }
    }
}

/// Configuration for the gateway client.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Gateway base URL (e.g., `https://api.paytring.com`).
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// API version path segment (e.g., `v1`).
    #[serde(default = "default_api_version")]
    pub api_version: String,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// User-Agent sent with every request.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Extra fixed headers attached to every request.
    #[serde(default)]
    pub extra_headers: BTreeMap<String, String>,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_api_version() -> String {
    DEFAULT_API_VERSION.to_string()
}

fn default_timeout() -> u64 {
    30
}

fn default_user_agent() -> String {
    concat!("paytring-rs/", env!("CARGO_PKG_VERSION")).to_string()
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            api_version: default_api_version(),
            timeout_secs: default_timeout(),
            user_agent: default_user_agent(),
            extra_headers: BTreeMap::new(),
        }
    }
}

impl ClientConfig {
    /// Create a configuration pointing at the given base URL.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::default().with_base_url(base_url)
    }

    /// Defaults overridden by `PAYTRING_API_BASE_URL`, `PAYTRING_API_VERSION`
    /// and `PAYTRING_TIMEOUT_SECS` when set.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Same as [`ClientConfig::from_env`] with an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        if let Some(url) = lookup(ENV_BASE_URL).filter(|v| !v.is_empty()) {
            config.base_url = url;
        }
        if let Some(version) = lookup(ENV_API_VERSION).filter(|v| !v.is_empty()) {
            config.api_version = version;
        }
        if let Some(raw) = lookup(ENV_TIMEOUT_SECS).filter(|v| !v.is_empty()) {
            config.timeout_secs = raw
                .trim()
                .parse::<u64>()
                .map_err(|e| ConfigError::InvalidValue {
                    field: ENV_TIMEOUT_SECS.to_string(),
                    reason: e.to_string(),
                })?;
        }
        config.validate()?;
        Ok(config)
    }

    /// Set the base URL.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Set the API version.
    pub fn with_api_version(mut self, version: impl Into<String>) -> Self {
        self.api_version = version.into();
        self
    }

    /// Set the request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    /// Set the User-Agent.
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Add a fixed header sent with every request.
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.extra_headers.insert(name.into(), value.into());
        self
    }

    /// Reject configurations that cannot produce a valid request URL.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let base = self.base_url.trim();
        if base.is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "base_url".to_string(),
                reason: "base URL cannot be empty".to_string(),
            });
        }
        if !base.starts_with("http://") && !base.starts_with("https://") {
            return Err(ConfigError::InvalidValue {
                field: "base_url".to_string(),
                reason: format!("unsupported scheme in {}", base),
            });
        }
        if self.api_version.trim_matches('/').is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "api_version".to_string(),
                reason: "API version cannot be empty".to_string(),
            });
        }
        if self.timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                field: "timeout_secs".to_string(),
                reason: "timeout must be at least one second".to_string(),
            });
        }
        Ok(())
    }

    /// `{base_url}/api/{api_version}`
    pub fn api_root(&self) -> String {
        format!(
            "{}/api/{}",
            self.base_url.trim().trim_end_matches('/'),
            self.api_version.trim_matches('/')
        )
    }

    /// Full URL for an endpoint such as `order/create`.
    pub fn endpoint_url(&self, endpoint: &str) -> String {
        format!("{}/{}", self.api_root(), endpoint.trim_start_matches('/'))
    }
}
