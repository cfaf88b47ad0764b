//! Health check endpoints

use crate::client::SpacesClient;
use crate::error::{ApiError, ApiResult};
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

/// Health check API interface
#[derive(Clone)]
pub struct HealthApi {
    client: SpacesClient,
}

impl HealthApi {
    /// Create a new health API interface
    pub(crate) fn new(client: SpacesClient) -> Self {
        Self { client }
    }

    /// GET /healthz
    pub async fn check(&self) -> ApiResult<HealthResponse> {
        self.client
            .fetch_json(reqwest::Method::GET, "/healthz", None::<&()>)
            .await
    }

    /// Probe the API, never failing on an unhealthy answer
    pub async fn status(&self) -> EndpointStatus {
        let url = self.client.url("/healthz");
        let start = Instant::now();
        let result = self.check().await;
        let response_time = start.elapsed();

        match result {
            Ok(health) => EndpointStatus {
                url,
                status_code: Some(200),
                response_time,
                is_healthy: health.is_ok(),
                error: None,
            },
            Err(err) => EndpointStatus {
                url,
                status_code: err.status(),
                response_time,
                is_healthy: false,
                error: Some(describe(&err)),
            },
        }
    }
}

fn describe(err: &ApiError) -> String {
    match err {
        ApiError::ApiResponse { message, .. } => message.clone(),
        other => other.to_string(),
    }
}

/// Health check response from the API
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Health status (e.g., "ok", "healthy")
    pub status: String,
    /// API version, when reported
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

impl HealthResponse {
    pub fn is_ok(&self) -> bool {
        matches!(self.status.to_lowercase().as_str(), "ok" | "healthy" | "up")
    }
}

/// Endpoint status information
#[derive(Debug, Clone, Serialize)]
pub struct EndpointStatus {
    /// URL that was checked
    pub url: String,
    /// HTTP status code, when the server answered
    pub status_code: Option<u16>,
    /// Response time
    #[serde(serialize_with = "millis")]
    pub response_time: Duration,
    /// Whether the endpoint is healthy
    pub is_healthy: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

fn millis<S: serde::Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_u128(duration.as_millis())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_health_response_deserialize() {
        let response: HealthResponse =
            serde_json::from_str(r#"{"status": "ok", "version": "1.4.0"}"#).unwrap();
        assert!(response.is_ok());
        assert_eq!(response.version.as_deref(), Some("1.4.0"));

        let degraded: HealthResponse = serde_json::from_str(r#"{"status": "degraded"}"#).unwrap();
        assert!(!degraded.is_ok());
    }
}
