//! HTTP transport for the Evolution API.
//!
//! Issues the actual requests, retries network-level failures, and maps
//! HTTP status codes onto [`EvolutionErrorKind`](crate::evolution::error::EvolutionErrorKind).
//! Non-2xx responses and timeouts are reported at once; only failures
//! that never produced a response are retried.

use crate::evolution::config::EvolutionConfig;
use crate::evolution::error::{EvolutionError, EvolutionResult};
use crate::evolution::types::{ApiRequest, ApiResponse};
use log::{debug, warn};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT, CONTENT_TYPE};
use serde_json::Value;

/// Header carrying the API key.
pub const API_KEY_HEADER: &str = "apikey";

/// Low-level HTTP client bound to one server configuration.
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: reqwest::Client,
    config: EvolutionConfig,
}

impl ApiClient {
    /// Create a new client from configuration.
    pub fn new(config: &EvolutionConfig) -> EvolutionResult<Self> {
        config.validate()?;
        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .default_headers(Self::default_headers(config)?)
            .build()
            .map_err(|e| {
                EvolutionError::configuration(format!("HTTP client init failed: {}", e))
            })?;

        Ok(Self {
            client,
            config: config.clone(),
        })
    }

    /// Get current config reference.
    pub fn config(&self) -> &EvolutionConfig {
        &self.config
    }

    /// Build a full URL: `{base_url}{path}`.
    pub fn url(&self, path: &str) -> String {
        let base = self.config.base_url.trim_end_matches('/');
        if path.starts_with('/') {
            format!("{}{}", base, path)
        } else {
            format!("{}/{}", base, path)
        }
    }

    fn default_headers(config: &EvolutionConfig) -> EvolutionResult<HeaderMap> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        if let Some(ref key) = config.api_key {
            let mut value = HeaderValue::from_str(key).map_err(|_| {
                EvolutionError::configuration("api_key contains characters not allowed in a header")
            })?;
            value.set_sensitive(true);
            headers.insert(HeaderName::from_static(API_KEY_HEADER), value);
        }
        Ok(headers)
    }

    // ─── HTTP primitives ─────────────────────────────────────────────

    /// GET with query parameters.
    pub async fn get(&self, path: &str, params: &[(&str, &str)]) -> EvolutionResult<ApiResponse> {
        let request = params
            .iter()
            .fold(ApiRequest::get(path), |req, (k, v)| req.with_query(*k, *v));
        self.execute(&request).await
    }

    /// POST JSON body.
    pub async fn post(&self, path: &str, body: Value) -> EvolutionResult<ApiResponse> {
        self.execute(&ApiRequest::post(path).with_body(body)).await
    }

    /// PUT JSON body.
    pub async fn put(&self, path: &str, body: Value) -> EvolutionResult<ApiResponse> {
        self.execute(&ApiRequest::put(path).with_body(body)).await
    }

    /// DELETE.
    pub async fn delete(&self, path: &str) -> EvolutionResult<ApiResponse> {
        self.execute(&ApiRequest::delete(path)).await
    }

    // ─── Core request method with retry ──────────────────────────────

    /// Run one request through the retry policy and classify the outcome.
    ///
    /// With `retry_attempts = N` a request that never gets a response is
    /// attempted `N + 1` times before a `Connection` error is returned. Once
    /// the server has answered, the request is never sent again.
    pub async fn execute(&self, request: &ApiRequest) -> EvolutionResult<ApiResponse> {
        let url = self.url(request.path());
        let max_attempts = self.config.retry_attempts.saturating_add(1);
        let mut attempt = 0u32;

        let resp = loop {
            attempt += 1;
            debug!(
                "{} {} (attempt {}/{})",
                request.method(),
                request.path(),
                attempt,
                max_attempts
            );

            let mut req = self.client.request(request.method().clone(), &url);
            if !request.query().is_empty() {
                req = req.query(request.query());
            }
            if let Some(body) = request.sendable_body() {
                req = req.json(body);
            }

            let failure = match req.send().await {
                Ok(resp) => break resp,
                Err(e) => e,
            };

            if failure.is_timeout() {
                warn!("Timeout on {} {}", request.method(), request.path());
                return Err(EvolutionError::timeout(request.path()));
            }
            if attempt < max_attempts {
                warn!(
                    "Network error (attempt {}/{}) on {}: {}",
                    attempt,
                    max_attempts,
                    request.path(),
                    failure
                );
                tokio::time::sleep(self.config.retry_delay()).await;
                continue;
            }
            return Err(EvolutionError::connection(attempt, failure));
        };

        let status = resp.status().as_u16();
        match resp.text().await {
            Ok(body) => {
                debug!("{} {} -> {}", request.method(), request.path(), status);
                Self::handle_response(status, &body)
            }
            Err(e) => {
                warn!(
                    "Reading the {} response of {} failed: {}",
                    status,
                    request.path(),
                    e
                );
                Self::handle_unreadable_body(status, attempt, e)
            }
        }
    }

    /// The status line arrived but the body did not. Error statuses keep
    /// their classification; a success is reported without resending.
    fn handle_unreadable_body(
        status: u16,
        attempt: u32,
        cause: reqwest::Error,
    ) -> EvolutionResult<ApiResponse> {
        if !(200..300).contains(&status) {
            return Err(EvolutionError::from_response(status, ""));
        }
        let mut err = EvolutionError::connection(
            attempt,
            format!("response body of HTTP {} unreadable: {}", status, cause),
        );
        err.status_code = Some(status);
        Err(err)
    }

    /// Map a received response onto a result.
    fn handle_response(status: u16, body: &str) -> EvolutionResult<ApiResponse> {
        if (200..300).contains(&status) {
            Ok(ApiResponse::from_body(body))
        } else {
            Err(EvolutionError::from_response(status, body))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evolution::error::EvolutionErrorKind;
    use serde_json::json;

    fn test_config() -> EvolutionConfig {
        EvolutionConfig::new("http://localhost:8080/").with_api_key("test_key")
    }

    #[test]
    fn test_url_builder() {
        let client = ApiClient::new(&test_config()).unwrap();
        assert_eq!(
            client.url("/instance/fetchInstances"),
            "http://localhost:8080/instance/fetchInstances"
        );
        assert_eq!(client.url("webhook/find/a"), "http://localhost:8080/webhook/find/a");
    }

    #[test]
    fn test_rejects_invalid_config() {
        let cfg = EvolutionConfig::new("http://localhost:8080").with_timeout(std::time::Duration::ZERO);
        let err = ApiClient::new(&cfg).unwrap_err();
        assert_eq!(err.kind(), EvolutionErrorKind::Configuration);
    }

    #[test]
    fn test_rejects_bad_api_key() {
        let cfg = EvolutionConfig::default().with_api_key("line\nbreak");
        assert!(ApiClient::new(&cfg).is_err());
    }

    #[test]
    fn test_default_headers() {
        let headers = ApiClient::default_headers(&test_config()).unwrap();
        assert_eq!(headers[CONTENT_TYPE], "application/json");
        assert_eq!(headers[ACCEPT], "application/json");
        assert_eq!(headers[API_KEY_HEADER], "test_key");

        let anon = ApiClient::default_headers(&EvolutionConfig::default()).unwrap();
        assert!(anon.get(API_KEY_HEADER).is_none());
    }

    #[test]
    fn test_handle_response_success() {
        assert_eq!(ApiClient::handle_response(200, "").unwrap(), ApiResponse::Empty);
        assert_eq!(ApiClient::handle_response(204, "").unwrap(), ApiResponse::Empty);
        assert_eq!(
            ApiClient::handle_response(201, r#"{"ok":true}"#).unwrap(),
            ApiResponse::Json(json!({"ok": true}))
        );
        assert_eq!(
            ApiClient::handle_response(200, "pong").unwrap(),
            ApiResponse::Text("pong".into())
        );
    }

    #[test]
    fn test_handle_response_errors() {
        let err = ApiClient::handle_response(401, r#"{"error":"Unauthorized"}"#).unwrap_err();
        assert_eq!(err.kind(), EvolutionErrorKind::Authentication);
        let err = ApiClient::handle_response(502, "bad gateway").unwrap_err();
        assert_eq!(err.kind(), EvolutionErrorKind::Server);
        assert_eq!(err.status_code(), Some(502));
    }
}
