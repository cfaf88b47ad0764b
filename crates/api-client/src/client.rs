//! Main API client implementation

use crate::config::ClientConfig;
use crate::endpoints::{AddressApi, HealthApi, SpacesApi, ThreadsApi, UsersApi};
use crate::error::{ApiError, ApiResult};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE, USER_AGENT};
use reqwest::{Client, Method, Response};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, instrument, warn};
use uuid::Uuid;

/// Request correlation ID header
const X_REQUEST_ID: &str = "X-Request-ID";

/// Success bodies wrap their payload as `{"data": ...}`
#[derive(Deserialize)]
struct Envelope<T> {
    data: T,
}

/// Spaces API client
///
/// This client wraps `reqwest` and adds:
/// - Bearer authentication from the configured identity token
/// - Automatic retry with exponential backoff
/// - Request correlation IDs for tracing
#[derive(Clone)]
pub struct SpacesClient {
    inner: Client,
    config: Arc<ClientConfig>,
}

impl SpacesClient {
    /// Create a new client with default configuration from environment
    pub fn new() -> ApiResult<Self> {
        let config = ClientConfig::from_env()?;
        Self::with_config(config)
    }

    /// Create a new client with specific configuration
    pub fn with_config(config: ClientConfig) -> ApiResult<Self> {
        config.validate()?;

        let mut default_headers = HeaderMap::new();
        default_headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        default_headers.insert(
            USER_AGENT,
            HeaderValue::from_static(concat!("spaces-api-client/", env!("CARGO_PKG_VERSION"))),
        );

        let inner = Client::builder()
            .timeout(config.timeout)
            .default_headers(default_headers)
            .build()
            .map_err(ApiError::Request)?;

        Ok(Self {
            inner,
            config: Arc::new(config),
        })
    }

    /// Get the current configuration
    #[must_use]
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Get the base URL
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    // -------------------------------------------------------------------------
    // Endpoint API accessors
    // -------------------------------------------------------------------------

    /// Access space endpoints
    #[must_use]
    pub fn spaces(&self) -> SpacesApi {
        SpacesApi::new(self.clone())
    }

    /// Access thread and message endpoints
    #[must_use]
    pub fn threads(&self) -> ThreadsApi {
        ThreadsApi::new(self.clone())
    }

    /// Access reverse-geocoding endpoints
    #[must_use]
    pub fn address(&self) -> AddressApi {
        AddressApi::new(self.clone())
    }

    /// Access user endpoints
    #[must_use]
    pub fn users(&self) -> UsersApi {
        UsersApi::new(self.clone())
    }

    /// Access health check endpoints
    #[must_use]
    pub fn health(&self) -> HealthApi {
        HealthApi::new(self.clone())
    }

    // -------------------------------------------------------------------------
    // Low-level HTTP methods with retry
    // -------------------------------------------------------------------------

    /// Perform a GET request and unwrap the `data` envelope
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> ApiResult<T> {
        self.fetch_api(Method::GET, path, None::<&()>).await
    }

    /// Perform a POST request and unwrap the `data` envelope
    pub async fn post<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> ApiResult<T> {
        self.fetch_api(Method::POST, path, Some(body)).await
    }

    /// Issue a request against `base_url + path` and return the `data` field
    /// of the JSON body.
    ///
    /// Non-2xx responses become [`ApiError::ApiResponse`] carrying the server's
    /// error message. Retryable failures are retried per the configured policy.
    #[instrument(skip(self, body))]
    pub async fn fetch_api<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> ApiResult<T> {
        let text = self.execute_with_retry(method, &self.url(path), body).await?;
        let envelope: Envelope<T> = serde_json::from_str(&text)?;
        Ok(envelope.data)
    }

    /// Like [`fetch_api`](Self::fetch_api) for endpoints that do not use the
    /// `data` envelope.
    #[instrument(skip(self, body))]
    pub async fn fetch_json<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> ApiResult<T> {
        let text = self.execute_with_retry(method, &self.url(path), body).await?;
        Ok(serde_json::from_str(&text)?)
    }

    /// Absolute URL for an API path
    pub fn url(&self, path: &str) -> String {
        let base = self.config.base_url.trim_end_matches('/');
        if path.starts_with('/') {
            format!("{base}{path}")
        } else {
            format!("{base}/{path}")
        }
    }

    /// Execute request with retry logic, returning the success body
    async fn execute_with_retry<B: Serialize + ?Sized>(
        &self,
        method: Method,
        url: &str,
        body: Option<&B>,
    ) -> ApiResult<String> {
        let request_id = Uuid::new_v4().to_string();
        let policy = &self.config.retry;
        let max_attempts = policy.max_attempts();
        let mut last_error: Option<ApiError> = None;

        for attempt in 0..max_attempts {
            // Wait before retry (except first attempt)
            if attempt > 0 {
                let delay = policy.delay_for_retry(attempt);
                debug!(
                    request_id = %request_id,
                    attempt = attempt,
                    delay_ms = delay.as_millis(),
                    "Retrying after delay"
                );
                tokio::time::sleep(delay).await;
            }

            let start = Instant::now();
            let result = self
                .execute_single_request(&request_id, method.clone(), url, body)
                .await;
            let elapsed = start.elapsed();

            match result {
                Ok(text) => {
                    debug!(
                        request_id = %request_id,
                        attempt = attempt + 1,
                        elapsed_ms = elapsed.as_millis(),
                        "Request succeeded"
                    );
                    return Ok(text);
                }
                Err(e) => {
                    if e.is_retryable() && attempt + 1 < max_attempts {
                        debug!(
                            request_id = %request_id,
                            attempt = attempt + 1,
                            error = %e,
                            "Request failed, will retry"
                        );
                        last_error = Some(e);
                    } else if e.is_retryable() && attempt > 0 {
                        warn!(
                            request_id = %request_id,
                            attempts = attempt + 1,
                            error = %e,
                            "Request failed, retries exhausted"
                        );
                        return Err(ApiError::RetriesExhausted {
                            attempts: attempt + 1,
                            last_error: e.to_string(),
                            status: e.status(),
                        });
                    } else {
                        debug!(
                            request_id = %request_id,
                            attempt = attempt + 1,
                            error = %e,
                            "Request failed, not retrying"
                        );
                        return Err(e);
                    }
                }
            }
        }

        Err(ApiError::RetriesExhausted {
            attempts: max_attempts,
            status: last_error.as_ref().and_then(ApiError::status),
            last_error: last_error.map_or_else(|| "Unknown error".to_string(), |e| e.to_string()),
        })
    }

    /// Execute a single request without retry
    async fn execute_single_request<B: Serialize + ?Sized>(
        &self,
        request_id: &str,
        method: Method,
        url: &str,
        body: Option<&B>,
    ) -> ApiResult<String> {
        let mut request = self
            .inner
            .request(method, url)
            .header(X_REQUEST_ID, request_id);

        if let Some(ref token) = self.config.id_token {
            request = request.header(AUTHORIZATION, format!("Bearer {token}"));
        }

        if let Some(b) = body {
            request = request.json(b);
        }

        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                ApiError::Timeout(self.config.timeout)
            } else {
                ApiError::Request(e)
            }
        })?;
        handle_response(response).await
    }
}

/// Read the body, mapping non-2xx statuses to [`ApiError::ApiResponse`]
async fn handle_response(response: Response) -> ApiResult<String> {
    let status = response.status();
    let text = response.text().await.unwrap_or_default();

    if status.is_success() {
        Ok(text)
    } else {
        let message = error_message(&text).unwrap_or_else(|| {
            status
                .canonical_reason()
                .unwrap_or("Unknown error")
                .to_string()
        });
        Err(ApiError::api_response(status.as_u16(), message))
    }
}

/// Pull a human-readable message out of an error body
fn error_message(body: &str) -> Option<String> {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(value) = serde_json::from_str::<serde_json::Value>(trimmed) {
        for key in ["error", "message"] {
            if let Some(msg) = value.get(key).and_then(serde_json::Value::as_str) {
                return Some(msg.to_string());
            }
        }
    }

    Some(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::middleware::RetryPolicy;
    use std::time::Duration;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::task::JoinHandle;

    /// Serves one canned response per connection, returning the raw requests.
    async fn serve(responses: Vec<(u16, &'static str)>) -> (String, JoinHandle<Vec<String>>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let handle = tokio::spawn(async move {
            let mut requests = Vec::new();
            for (status, body) in responses {
                let (mut socket, _) = listener.accept().await.unwrap();
                requests.push(read_request(&mut socket).await);

                let reply = format!(
                    "HTTP/1.1 {status} Test\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                    body.len()
                );
                socket.write_all(reply.as_bytes()).await.unwrap();
                let _ = socket.shutdown().await;
            }
            requests
        });

        (format!("http://{addr}/v1"), handle)
    }

    async fn read_request(socket: &mut tokio::net::TcpStream) -> String {
        let mut buf = Vec::new();
        let mut chunk = [0u8; 4096];
        loop {
            let n = socket.read(&mut chunk).await.unwrap();
            if n == 0 {
                break;
            }
            buf.extend_from_slice(&chunk[..n]);

            let text = String::from_utf8_lossy(&buf).to_string();
            if let Some(head_end) = text.find("\r\n\r\n") {
                let content_length = text[..head_end]
                    .lines()
                    .find_map(|l| {
                        let lower = l.to_ascii_lowercase();
                        lower
                            .strip_prefix("content-length:")
                            .map(|v| v.trim().parse::<usize>().unwrap())
                    })
                    .unwrap_or(0);
                if buf.len() >= head_end + 4 + content_length {
                    break;
                }
            }
        }
        String::from_utf8_lossy(&buf).into_owned()
    }

    fn client(base_url: &str, retry: RetryPolicy) -> SpacesClient {
        let config = ClientConfig::default()
            .with_base_url(base_url)
            .with_retry(retry)
            .with_timeout(Duration::from_secs(5));
        SpacesClient::with_config(config).unwrap()
    }

    fn fast_retry(max_retries: u32) -> RetryPolicy {
        RetryPolicy {
            max_retries,
            initial_delay: Duration::from_millis(1),
            max_delay: Duration::from_millis(4),
            backoff_multiplier: 2.0,
            jitter: false,
        }
    }

    #[test]
    fn test_client_creation() {
        assert!(SpacesClient::with_config(ClientConfig::default()).is_ok());
        assert!(SpacesClient::with_config(ClientConfig::default().with_base_url("nope")).is_err());
    }

    #[test]
    fn test_url_joining() {
        let client = client("http://localhost:8080/v1/", RetryPolicy::none());
        assert_eq!(client.url("/spaces"), "http://localhost:8080/v1/spaces");
        assert_eq!(client.url("healthz"), "http://localhost:8080/v1/healthz");
    }

    #[test]
    fn test_error_message_extraction() {
        assert_eq!(error_message(r#"{"error":"space not found"}"#).as_deref(), Some("space not found"));
        assert_eq!(error_message(r#"{"message":"bad input"}"#).as_deref(), Some("bad input"));
        assert_eq!(error_message("gateway down").as_deref(), Some("gateway down"));
        assert_eq!(error_message("  "), None);
    }

    #[tokio::test]
    async fn test_fetch_api_unwraps_envelope() {
        let (base, server) = serve(vec![(200, r#"{"data":{"answer":42}}"#)]).await;
        let client = client(&base, RetryPolicy::none());

        let value: serde_json::Value = client.get("/spaces/abc").await.unwrap();
        assert_eq!(value["answer"], 42);

        let requests = server.await.unwrap();
        let request = requests[0].to_ascii_lowercase();
        assert!(request.starts_with("get /v1/spaces/abc http/1.1"));
        assert!(request.contains("x-request-id:"));
        assert!(!request.contains("authorization:"));
    }

    #[tokio::test]
    async fn test_bearer_token_and_json_body() {
        let (base, server) = serve(vec![(201, r#"{"data":{"ok":true}}"#)]).await;
        let config = ClientConfig::default()
            .with_base_url(&base)
            .with_id_token("tok-123")
            .with_retry(RetryPolicy::none());
        let client = SpacesClient::with_config(config).unwrap();

        let _: serde_json::Value = client
            .post("/spaces", &serde_json::json!({"name": "Plaza"}))
            .await
            .unwrap();

        let request = server.await.unwrap().remove(0);
        assert!(request.to_ascii_lowercase().contains("authorization: bearer tok-123"));
        assert!(request.ends_with(r#"{"name":"Plaza"}"#));
    }

    #[tokio::test]
    async fn test_non_success_maps_to_api_response() {
        let (base, _server) = serve(vec![(404, r#"{"error":"space not found"}"#)]).await;
        let client = client(&base, fast_retry(3));

        let err = client.get::<serde_json::Value>("/spaces/x").await.unwrap_err();
        match err {
            ApiError::ApiResponse { status, message } => {
                assert_eq!(status, 404);
                assert_eq!(message, "space not found");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_retries_server_errors_then_succeeds() {
        let (base, server) = serve(vec![
            (503, "unavailable"),
            (500, ""),
            (200, r#"{"data":[1,2,3]}"#),
        ])
        .await;
        let client = client(&base, fast_retry(3));

        let values: Vec<u32> = client.get("/spaces").await.unwrap();
        assert_eq!(values, vec![1, 2, 3]);

        let requests = server.await.unwrap();
        assert_eq!(requests.len(), 3);
        let id = |r: &str| {
            r.lines()
                .find(|l| l.to_ascii_lowercase().starts_with("x-request-id:"))
                .map(str::to_string)
        };
        assert_eq!(id(&requests[0]), id(&requests[2]));
    }

    #[tokio::test]
    async fn test_retries_exhausted() {
        let (base, _server) = serve(vec![(502, "bad gateway"), (502, "bad gateway")]).await;
        let client = client(&base, fast_retry(1));

        let err = client.get::<serde_json::Value>("/address").await.unwrap_err();
        assert!(matches!(err, ApiError::RetriesExhausted { attempts: 2, .. }));
        assert_eq!(err.status(), Some(502));
        assert!(err.is_server_error());
    }

    #[tokio::test]
    async fn test_fetch_json_without_envelope() {
        let (base, _server) = serve(vec![(200, r#"{"status":"ok"}"#)]).await;
        let client = client(&base, RetryPolicy::none());

        let value: serde_json::Value = client
            .fetch_json(Method::GET, "/healthz", None::<&()>)
            .await
            .unwrap();
        assert_eq!(value["status"], "ok");
    }

    #[tokio::test]
    async fn test_missing_envelope_is_json_error() {
        let (base, _server) = serve(vec![(200, r#"{"answer":42}"#)]).await;
        let client = client(&base, RetryPolicy::none());

        let err = client.get::<serde_json::Value>("/spaces").await.unwrap_err();
        assert!(matches!(err, ApiError::Json(_)));
    }
}
