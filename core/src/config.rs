//! Client configuration.
//!
//! # Design
//! Base URL, user agent and timeout live on a `ClientConfig` value owned by
//! each client. Nothing is process-global, so two clients pointed at
//! different hosts never see each other's settings.

use std::time::Duration;

use crate::error::{ApiError, Result};

/// Root URL of the hosted service.
pub const DEFAULT_BASE_URL: &str = "https://dashboard.redisgreen.net";

/// Versioned media type sent in the `Accept` header.
pub const MEDIA_TYPE: &str = "application/vnd.redisgreen.1+json";

/// Header carrying the API token.
pub const TOKEN_HEADER: &str = "X-API-Token";

/// Environment variable holding the API token.
pub const TOKEN_ENV: &str = "REDISGREEN_TOKEN";

/// Environment variable overriding the base URL.
pub const BASE_URL_ENV: &str = "REDISGREEN_API_URL";

/// Environment variable setting a request timeout in whole seconds.
pub const TIMEOUT_ENV: &str = "REDISGREEN_TIMEOUT_SECS";

/// Connection settings shared by every request a client makes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub base_url: String,
    pub user_agent: String,
    /// Whole-request timeout. `None` leaves it to the transport.
    pub timeout: Option<Duration>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            user_agent: default_user_agent(),
            timeout: None,
        }
    }
}

impl ClientConfig {
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Build a config from `REDISGREEN_API_URL` and `REDISGREEN_TIMEOUT_SECS`.
    pub fn from_env() -> Result<Self> {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Build a config from an arbitrary variable lookup. Unset or empty
    /// variables keep their defaults.
    pub fn from_vars<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        if let Some(url) = lookup(BASE_URL_ENV).filter(|v| !v.is_empty()) {
            config = config.with_base_url(&url);
        }
        if let Some(raw) = lookup(TIMEOUT_ENV).filter(|v| !v.is_empty()) {
            let secs: u64 = raw
                .trim()
                .parse()
                .ok()
                .filter(|secs| *secs > 0)
                .ok_or_else(|| {
                    ApiError::Config(format!("{TIMEOUT_ENV} must be a positive integer, got {raw:?}"))
                })?;
            config = config.with_timeout(Duration::from_secs(secs));
        }
        Ok(config)
    }
}

/// `redisgreen-rust/<version> (<os>; <arch>)`
pub fn default_user_agent() -> String {
    format!(
        "redisgreen-rust/{} ({}; {})",
        env!("CARGO_PKG_VERSION"),
        std::env::consts::OS,
        std::env::consts::ARCH
    )
}
