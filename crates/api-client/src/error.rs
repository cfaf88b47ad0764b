//! Error types for the API client

use thiserror::Error;

/// Result type alias for API operations
pub type ApiResult<T> = Result<T, ApiError>;

/// API client errors
#[derive(Error, Debug)]
pub enum ApiError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// JSON serialization/deserialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// API returned an error response
    #[error("API error ({status}): {message}")]
    ApiResponse {
        /// HTTP status code
        status: u16,
        /// Error message from API
        message: String,
    },

    /// Request timeout
    #[error("Request timeout after {0:?}")]
    Timeout(std::time::Duration),

    /// All retry attempts exhausted
    #[error("All {attempts} attempts failed: {last_error}")]
    RetriesExhausted {
        /// Number of attempts made
        attempts: u32,
        /// Last error message
        last_error: String,
        /// HTTP status of the last attempt, when the server answered
        status: Option<u16>,
    },

    /// Invalid URL
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Request payload failed local validation
    #[error("Validation failed: {0}")]
    Validation(String),
}

impl ApiError {
    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create an API response error
    pub fn api_response(status: u16, message: impl Into<String>) -> Self {
        Self::ApiResponse {
            status,
            message: message.into(),
        }
    }

    /// Check if this error is retryable
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Request(e) => e.is_connect() || e.is_timeout(),
            Self::ApiResponse { status, .. } => *status >= 500 || *status == 429,
            Self::Timeout(_) => true,
            Self::Config(_)
            | Self::Json(_)
            | Self::InvalidUrl(_)
            | Self::Validation(_)
            | Self::RetriesExhausted { .. } => false,
        }
    }

    /// HTTP status, when the server answered
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::ApiResponse { status, .. } => Some(*status),
            Self::Request(e) => e.status().map(|s| s.as_u16()),
            Self::RetriesExhausted { status, .. } => *status,
            _ => None,
        }
    }

    /// Check if this is a client error (4xx)
    #[must_use]
    pub fn is_client_error(&self) -> bool {
        matches!(self.status(), Some(status) if (400..500).contains(&status))
    }

    /// Check if this is a server error (5xx)
    #[must_use]
    pub fn is_server_error(&self) -> bool {
        matches!(self.status(), Some(status) if status >= 500)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retryable_classification() {
        assert!(ApiError::api_response(503, "unavailable").is_retryable());
        assert!(ApiError::api_response(429, "slow down").is_retryable());
        assert!(!ApiError::api_response(404, "missing").is_retryable());
        assert!(!ApiError::Validation("name".into()).is_retryable());
        assert!(ApiError::Timeout(std::time::Duration::from_secs(1)).is_retryable());
    }

    #[test]
    fn test_status_helpers() {
        let err = ApiError::api_response(401, "unauthorized");
        assert_eq!(err.status(), Some(401));
        assert!(err.is_client_error());
        assert!(!err.is_server_error());
        assert_eq!(ApiError::config("x").status(), None);
    }

    #[test]
    fn test_exhausted_retries_keep_last_status() {
        let err = ApiError::RetriesExhausted {
            attempts: 3,
            last_error: "API error (503): unavailable".to_string(),
            status: Some(503),
        };
        assert_eq!(err.status(), Some(503));
        assert!(err.is_server_error());
        assert!(!err.is_retryable());
    }
}
