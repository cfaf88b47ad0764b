//! Error types for the geo crate.

use thiserror::Error;

/// Result type alias for geo operations.
pub type Result<T> = std::result::Result<T, GeoError>;

/// Errors that can occur during geo operations.
#[derive(Debug, Error)]
pub enum GeoError {
    /// Malformed input to a geometry function (bad step count, NaN, infinity)
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// A location string or value could not be parsed, or is out of range
    #[error("Invalid location: {0}")]
    InvalidLocation(String),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

impl GeoError {
    pub(crate) fn invalid_argument(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }

    /// Returns the error code for this error.
    pub fn code(&self) -> GeoErrorCode {
        match self {
            GeoError::InvalidArgument(_) => GeoErrorCode::InvalidArgument,
            GeoError::InvalidLocation(_) => GeoErrorCode::InvalidLocation,
            GeoError::JsonError(_) => GeoErrorCode::Json,
        }
    }
}

/// Error code for integration with spaces-core error handling.
/// Range: 10xxx for geo errors.
#[repr(u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeoErrorCode {
    /// Malformed geometry input
    InvalidArgument = 10001,
    /// Unparseable or out-of-range location
    InvalidLocation = 10002,
    /// JSON error
    Json = 10003,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(
            GeoError::invalid_argument("steps").code(),
            GeoErrorCode::InvalidArgument
        );
        assert_eq!(GeoErrorCode::InvalidLocation as u32, 10002);
    }

    #[test]
    fn test_error_display() {
        let err = GeoError::invalid_argument("steps must be at least 3");
        assert_eq!(err.to_string(), "Invalid argument: steps must be at least 3");
    }
}
