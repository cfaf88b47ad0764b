//! Per-query state slots.

use chrono::{DateTime, Utc};
use spaces_api_client::ApiError;
use std::fmt;

/// The two queries driven by the device location
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QueryKind {
    Spaces,
    Address,
}

impl QueryKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Spaces => "spaces",
            Self::Address => "address",
        }
    }

    pub(crate) fn timer_name(self) -> &'static str {
        match self {
            Self::Spaces => "nearby.spaces",
            Self::Address => "nearby.address",
        }
    }
}

impl fmt::Display for QueryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why a query failed
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct QueryError {
    pub message: String,
    /// HTTP status, when the server answered
    pub status: Option<u16>,
    pub retryable: bool,
}

impl QueryError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            status: None,
            retryable: false,
        }
    }
}

impl From<ApiError> for QueryError {
    fn from(err: ApiError) -> Self {
        let message = match &err {
            ApiError::ApiResponse { message, .. } => message.clone(),
            other => other.to_string(),
        };
        Self {
            status: err.status(),
            retryable: err.is_retryable(),
            message,
        }
    }
}

/// Cached result of one query.
///
/// A failed fetch records the error but keeps the last good `data`.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryState<T> {
    pub data: Option<T>,
    pub error: Option<QueryError>,
    pub is_fetching: bool,
    /// When `data` last arrived
    pub updated_at: Option<DateTime<Utc>>,
}

impl<T> Default for QueryState<T> {
    fn default() -> Self {
        Self {
            data: None,
            error: None,
            is_fetching: false,
            updated_at: None,
        }
    }
}

impl<T> QueryState<T> {
    /// Never started
    pub fn is_idle(&self) -> bool {
        !self.is_fetching && self.data.is_none() && self.error.is_none()
    }

    /// Last fetch succeeded
    pub fn is_success(&self) -> bool {
        self.data.is_some() && self.error.is_none()
    }

    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }

    pub(crate) fn begin(&mut self) {
        self.is_fetching = true;
    }

    /// Drops the loading flag, reporting whether it was set
    pub(crate) fn cancel(&mut self) -> bool {
        std::mem::replace(&mut self.is_fetching, false)
    }

    pub(crate) fn settle(&mut self, result: Result<T, QueryError>) {
        self.is_fetching = false;
        match result {
            Ok(data) => {
                self.data = Some(data);
                self.error = None;
                self.updated_at = Some(Utc::now());
            }
            Err(err) => self.error = Some(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failed_refetch_keeps_data() {
        let mut state = QueryState::default();
        assert!(state.is_idle());

        state.begin();
        state.settle(Ok(vec![1, 2]));
        assert!(state.is_success());
        assert!(state.updated_at.is_some());

        state.begin();
        state.settle(Err(QueryError::new("offline")));
        assert!(state.is_error());
        assert_eq!(state.data, Some(vec![1, 2]));
        assert!(!state.is_fetching);

        state.settle(Ok(vec![3]));
        assert!(state.is_success());
    }

    #[test]
    fn test_from_api_error() {
        let err = QueryError::from(ApiError::api_response(503, "maintenance"));
        assert_eq!(err.message, "maintenance");
        assert_eq!(err.status, Some(503));
        assert!(err.retryable);

        let err = QueryError::from(ApiError::RetriesExhausted {
            attempts: 3,
            last_error: "API error (503): maintenance".to_string(),
            status: Some(503),
        });
        assert_eq!(err.status, Some(503));
        assert!(err.message.contains("maintenance"));

        let err = QueryError::from(ApiError::Validation("name: Field is required".into()));
        assert_eq!(err.status, None);
        assert!(!err.retryable);
    }
}
