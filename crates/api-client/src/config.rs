//! Configuration for the Knocker API client
//!
//! Supports environment-based configuration with builder overrides.

use crate::error::{ApiError, ApiResult};
use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;

/// Local API served by `knocker api`
const DEVELOPMENT_BASE_URL: &str = "http://localhost:8000/api";

/// Keys whose nested objects keep their original casing on ingress
const DEFAULT_PRESERVE_KEYS: &[&str] = &["headers"];

/// Environment types
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    /// Local development API
    Development,
    /// Staging environment
    Staging,
    /// Production environment
    #[default]
    Production,
}

impl Environment {
    /// Parse an environment name; unknown names mean production
    #[must_use]
    pub fn parse(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "development" | "dev" | "local" => Self::Development,
            "staging" | "stage" => Self::Staging,
            _ => Self::Production,
        }
    }

    /// Read `KNOCKER_ENV`
    #[must_use]
    pub fn from_env() -> Self {
        Self::parse(&env::var("KNOCKER_ENV").unwrap_or_default())
    }
}

/// Client configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Base URL every resource path is joined to, e.g. `https://host/api`
    pub base_url: String,
    /// Request timeout; `None` lets requests run to completion
    #[serde(default, with = "optional_secs")]
    pub timeout: Option<Duration>,
    /// Response keys whose nested objects are not re-cased
    #[serde(default)]
    pub preserve_keys: Vec<String>,
    /// User agent sent with every request
    pub user_agent: String,
    /// Current environment
    pub environment: Environment,
}

mod optional_secs {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    #[allow(clippy::ref_option)]
    pub fn serialize<S: Serializer>(
        duration: &Option<Duration>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        duration.map(|d| d.as_secs()).serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<Duration>, D::Error> {
        Ok(Option::<u64>::deserialize(deserializer)?.map(Duration::from_secs))
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::development()
    }
}

impl ClientConfig {
    /// Create configuration from environment variables
    ///
    /// Reads the following environment variables:
    /// - `KNOCKER_API_BASE`: base URL of the API (required outside development)
    /// - `KNOCKER_ENV`: environment (development/staging/production)
    /// - `KNOCKER_TIMEOUT_SECS`: request timeout in seconds
    pub fn from_env() -> ApiResult<Self> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build configuration from an arbitrary variable source
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> ApiResult<Self> {
        let environment = lookup("KNOCKER_ENV")
            .map(|v| Environment::parse(&v))
            .unwrap_or_default();

        let base_url = match (lookup("KNOCKER_API_BASE"), environment) {
            (Some(url), _) if !url.trim().is_empty() => url,
            (_, Environment::Development) => DEVELOPMENT_BASE_URL.to_string(),
            _ => return Err(ApiError::missing_env("KNOCKER_API_BASE")),
        };

        let timeout = lookup("KNOCKER_TIMEOUT_SECS")
            .and_then(|s| s.trim().parse().ok())
            .map(Duration::from_secs);

        Ok(Self {
            base_url,
            timeout,
            environment,
            ..Self::development()
        })
    }

    /// Create development configuration (local API)
    #[must_use]
    pub fn development() -> Self {
        Self {
            base_url: DEVELOPMENT_BASE_URL.to_string(),
            timeout: None,
            preserve_keys: DEFAULT_PRESERVE_KEYS.iter().map(ToString::to_string).collect(),
            user_agent: format!("knocker-api-client/{}", env!("CARGO_PKG_VERSION")),
            environment: Environment::Development,
        }
    }

    /// Builder-style method to set base URL
    #[must_use]
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Builder-style method to set timeout
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Join a resource path onto the base URL
    #[must_use]
    pub fn url_for(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    /// Validate the configuration
    pub fn validate(&self) -> ApiResult<()> {
        if self.base_url.is_empty() {
            return Err(ApiError::config("base_url cannot be empty"));
        }

        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err(ApiError::InvalidUrl(self.base_url.clone()));
        }

        if self.timeout.is_some_and(|t| t.is_zero()) {
            return Err(ApiError::config("timeout cannot be zero"));
        }

        Ok(())
    }
}
