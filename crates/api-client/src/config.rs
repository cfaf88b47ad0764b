//! Configuration for the Spaces API client
//!
//! Supports environment-based configuration with sensible defaults.

use crate::error::{ApiError, ApiResult};
use crate::middleware::RetryPolicy;
use serde::{Deserialize, Serialize};
use spaces_core::config::ApiConfig;
use std::env;
use std::time::Duration;

/// Default API base URL, including the version segment
pub const DEFAULT_BASE_URL: &str = "http://localhost:8080/v1";

/// Environment types
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    /// Local development server
    #[default]
    Development,
    /// Staging environment
    Staging,
    /// Production environment
    Production,
}

impl Environment {
    /// Parse from the `SPACES_ENV` environment variable
    pub fn from_env() -> Self {
        Self::parse(&env::var("SPACES_ENV").unwrap_or_default())
    }

    fn parse(value: &str) -> Self {
        match value.to_lowercase().as_str() {
            "production" | "prod" => Self::Production,
            "staging" | "stage" => Self::Staging,
            _ => Self::Development,
        }
    }

    /// Retry policy suited to the environment
    #[must_use]
    pub fn retry_policy(self) -> RetryPolicy {
        match self {
            Self::Development => RetryPolicy::quick(),
            Self::Staging | Self::Production => RetryPolicy::default(),
        }
    }
}

/// Client configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Base URL every request path is appended to
    pub base_url: String,
    /// Identity token sent as a bearer credential
    #[serde(skip_serializing)]
    pub id_token: Option<String>,
    /// Request timeout
    #[serde(with = "duration_secs")]
    pub timeout: Duration,
    /// Retry policy for failed requests
    pub retry: RetryPolicy,
    /// Current environment
    pub environment: Environment,
}

mod duration_secs {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        duration.as_secs().serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        let secs = u64::deserialize(deserializer)?;
        Ok(Duration::from_secs(secs))
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            id_token: None,
            timeout: Duration::from_secs(30),
            retry: RetryPolicy::default(),
            environment: Environment::default(),
        }
    }
}

impl ClientConfig {
    /// Create configuration from environment variables
    ///
    /// Reads the following environment variables:
    /// - `SPACES_API_URL`: Base URL (defaults to the local server)
    /// - `SPACES_ID_TOKEN`: Identity token for authenticated endpoints
    /// - `SPACES_ENV`: Environment (development/staging/production)
    /// - `SPACES_TIMEOUT_SECS`: Request timeout in seconds
    pub fn from_env() -> ApiResult<Self> {
        let environment = Environment::from_env();

        let base_url = env::var("SPACES_API_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        let id_token = env::var("SPACES_ID_TOKEN").ok().filter(|t| !t.is_empty());

        let timeout = match env::var("SPACES_TIMEOUT_SECS") {
            Ok(raw) => raw
                .parse()
                .map(Duration::from_secs)
                .map_err(|_| ApiError::config(format!("SPACES_TIMEOUT_SECS is not a number: {raw}")))?,
            Err(_) => Duration::from_secs(30),
        };

        Ok(Self {
            base_url,
            id_token,
            timeout,
            retry: environment.retry_policy(),
            environment,
        })
    }

    /// Build from the `[api]` section of the configuration file
    #[must_use]
    pub fn from_schema(api: &ApiConfig) -> Self {
        Self {
            base_url: api.base_url.clone(),
            timeout: Duration::from_secs(api.timeout_secs),
            ..Self::default()
        }
    }

    /// Builder-style method to set base URL
    #[must_use]
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Builder-style method to set the identity token
    #[must_use]
    pub fn with_id_token(mut self, token: impl Into<String>) -> Self {
        self.id_token = Some(token.into());
        self
    }

    /// Builder-style method to set timeout
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Builder-style method to set the retry policy
    #[must_use]
    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> ApiResult<()> {
        if self.base_url.is_empty() {
            return Err(ApiError::config("base_url cannot be empty"));
        }

        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err(ApiError::config("base_url must start with http:// or https://"));
        }

        if self.timeout.is_zero() {
            return Err(ApiError::config("timeout cannot be zero"));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ClientConfig::default();
        assert_eq!(config.base_url, "http://localhost:8080/v1");
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert_eq!(config.retry.max_retries, 3);
        assert!(config.id_token.is_none());
    }

    #[test]
    fn test_environment_parse() {
        assert_eq!(Environment::parse("prod"), Environment::Production);
        assert_eq!(Environment::parse("STAGING"), Environment::Staging);
        assert_eq!(Environment::parse(""), Environment::Development);
    }

    #[test]
    fn test_builder_pattern() {
        let config = ClientConfig::default()
            .with_base_url("https://api.spaces-p.app/v1")
            .with_id_token("token")
            .with_timeout(Duration::from_secs(5));

        assert_eq!(config.base_url, "https://api.spaces-p.app/v1");
        assert_eq!(config.id_token.as_deref(), Some("token"));
        assert_eq!(config.timeout, Duration::from_secs(5));
    }

    #[test]
    fn test_from_schema() {
        let api = ApiConfig {
            base_url: "https://staging.spaces-p.app/v1".to_string(),
            timeout_secs: 12,
        };
        let config = ClientConfig::from_schema(&api);
        assert_eq!(config.base_url, api.base_url);
        assert_eq!(config.timeout, Duration::from_secs(12));
    }

    #[test]
    fn test_validation() {
        assert!(ClientConfig::default().validate().is_ok());
        assert!(ClientConfig::default().with_base_url("").validate().is_err());
        assert!(ClientConfig::default().with_base_url("ftp://x").validate().is_err());
        assert!(ClientConfig::default().with_timeout(Duration::ZERO).validate().is_err());
    }
}
