//! Configuration types for the request façade.
//!
//! This module provides the process-wide settings the façade and its default
//! HTTP client are built from.
//!
//! # Overview
//!
//! The main types in this module are:
//!
//! - [`RequestConfig`]: Base URL, API prefix, default timeout and messages
//! - [`RequestConfigBuilder`]: A builder for constructing [`RequestConfig`] instances
//! - [`BaseUrl`]: A validated base URL newtype
//! - [`Messages`]: Localized fixed strings surfaced to users
//!
//! The configuration is immutable once built. Construct it once at start-up,
//! either explicitly or with [`RequestConfig::from_env`], and share it.
//!
//! # Example
//!
//! ```rust
//! use api_request::{BaseUrl, RequestConfig};
//! use std::time::Duration;
//!
//! let config = RequestConfig::builder()
//!     .base_url(BaseUrl::new("https://api.example.com").unwrap())
//!     .timeout(Duration::from_secs(10))
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(config.api_prefix(), "/api/");
//! ```

mod newtypes;

pub use newtypes::BaseUrl;

use std::time::Duration;

use crate::error::ConfigError;

/// Default timeout applied to every request, in milliseconds.
pub const DEFAULT_TIMEOUT_MS: u64 = 3000;

/// Default prefix prepended to every logical request path.
pub const DEFAULT_API_PREFIX: &str = "/api/";

/// Environment variable holding the base URL.
pub const BASE_URL_ENV: &str = "API_BASE_URL";

/// Environment variable holding the default timeout in milliseconds.
pub const TIMEOUT_ENV: &str = "API_TIMEOUT_MS";

/// Fixed, user-facing strings produced by the façade itself.
///
/// Override these to localize what ends up in error callbacks and
/// notifications.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Messages {
    /// Returned when a request is dispatched without parameters.
    pub missing_parameters: String,
    /// Replaces any error message mentioning a timeout.
    pub request_timed_out: String,
    /// Used when a binary error body cannot be decoded.
    pub unknown_error: String,
}

impl Default for Messages {
    fn default() -> Self {
        Self {
            missing_parameters: "Please provide request parameters".to_string(),
            request_timed_out: "Request timed out".to_string(),
            unknown_error: "Unknown error".to_string(),
        }
    }
}

/// Configuration for the request façade.
///
/// # Thread Safety
///
/// `RequestConfig` is `Clone`, `Send`, and `Sync`.
#[derive(Clone, Debug)]
pub struct RequestConfig {
    base_url: BaseUrl,
    api_prefix: String,
    timeout: Duration,
    user_agent_prefix: Option<String>,
    messages: Messages,
}

impl RequestConfig {
    /// Creates a new builder for constructing a `RequestConfig`.
    #[must_use]
    pub fn builder() -> RequestConfigBuilder {
        RequestConfigBuilder::new()
    }

    /// Reads the configuration from the process environment.
    ///
    /// `API_BASE_URL` is required; `API_TIMEOUT_MS` defaults to
    /// [`DEFAULT_TIMEOUT_MS`].
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if a variable is missing or malformed.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds the configuration from an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if a variable is missing or malformed.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let base_url = lookup(BASE_URL_ENV).ok_or(ConfigError::MissingEnvVar {
            name: BASE_URL_ENV,
        })?;

        let mut builder = Self::builder().base_url(BaseUrl::new(base_url)?);

        if let Some(raw) = lookup(TIMEOUT_ENV) {
            let millis = raw
                .trim()
                .parse::<u64>()
                .map_err(|_| ConfigError::InvalidTimeout { value: raw.clone() })?;
            builder = builder.timeout(Duration::from_millis(millis));
        }

        builder.build()
    }

    /// Returns the base URL.
    #[must_use]
    pub const fn base_url(&self) -> &BaseUrl {
        &self.base_url
    }

    /// Returns the prefix prepended to every logical path.
    #[must_use]
    pub fn api_prefix(&self) -> &str {
        &self.api_prefix
    }

    /// Returns the default request timeout.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Returns the user agent prefix, if configured.
    #[must_use]
    pub fn user_agent_prefix(&self) -> Option<&str> {
        self.user_agent_prefix.as_deref()
    }

    /// Returns the localized fixed messages.
    #[must_use]
    pub const fn messages(&self) -> &Messages {
        &self.messages
    }
}

// Verify RequestConfig is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<RequestConfig>();
};

/// Builder for constructing [`RequestConfig`] instances.
///
/// # Defaults
///
/// - `api_prefix`: `/api/`
/// - `timeout`: 3000 ms
/// - `user_agent_prefix`: `None`
/// - `messages`: [`Messages::default`]
#[derive(Debug, Default)]
pub struct RequestConfigBuilder {
    base_url: Option<BaseUrl>,
    api_prefix: Option<String>,
    timeout: Option<Duration>,
    user_agent_prefix: Option<String>,
    messages: Option<Messages>,
}

impl RequestConfigBuilder {
    /// Creates a new builder with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the base URL (required).
    #[must_use]
    pub fn base_url(mut self, url: BaseUrl) -> Self {
        self.base_url = Some(url);
        self
    }

    /// Sets the prefix prepended to every logical path.
    ///
    /// Leading and trailing slashes are optional; paths are always joined
    /// as `/{prefix}/{path}`.
    #[must_use]
    pub fn api_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.api_prefix = Some(prefix.into());
        self
    }

    /// Sets the default request timeout.
    #[must_use]
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Sets the user agent prefix for HTTP requests.
    #[must_use]
    pub fn user_agent_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.user_agent_prefix = Some(prefix.into());
        self
    }

    /// Overrides the localized fixed messages.
    #[must_use]
    pub fn messages(mut self, messages: Messages) -> Self {
        self.messages = Some(messages);
        self
    }

    /// Builds the [`RequestConfig`].
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingRequiredField`] if `base_url` is not set,
    /// or [`ConfigError::InvalidTimeout`] if the timeout is zero.
    pub fn build(self) -> Result<RequestConfig, ConfigError> {
        let base_url = self
            .base_url
            .ok_or(ConfigError::MissingRequiredField { field: "base_url" })?;

        let timeout = self
            .timeout
            .unwrap_or(Duration::from_millis(DEFAULT_TIMEOUT_MS));
        if timeout.is_zero() {
            return Err(ConfigError::InvalidTimeout {
                value: "0".to_string(),
            });
        }

        Ok(RequestConfig {
            base_url,
            api_prefix: self
                .api_prefix
                .unwrap_or_else(|| DEFAULT_API_PREFIX.to_string()),
            timeout,
            user_agent_prefix: self.user_agent_prefix,
            messages: self.messages.unwrap_or_default(),
        })
    }
}
