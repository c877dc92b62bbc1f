//! Crate-level error types for the Evolution API client.
//!
//! Every failure is reported as an [`EvolutionError`] whose
//! [`EvolutionErrorKind`] tells the caller *why* the call failed, while the
//! shared fields (message, status code, raw response, validation detail)
//! stay reachable regardless of the kind.

use serde::Serialize;
use serde_json::{json, Value};
use std::fmt;

/// Alias for `Result<T, EvolutionError>`.
pub type EvolutionResult<T> = Result<T, EvolutionError>;

/// Status code and raw body of an HTTP response, kept on errors that
/// originated from one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseEnvelope {
    pub status_code: u16,
    pub raw_body: String,
}

impl ResponseEnvelope {
    pub fn new(status_code: u16, raw_body: impl Into<String>) -> Self {
        Self {
            status_code,
            raw_body: raw_body.into(),
        }
    }
}

/// Uniform error type used across the crate.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EvolutionError {
    pub kind: EvolutionErrorKind,
    pub message: String,
    /// The HTTP response that triggered the error, if any.
    pub response: Option<ResponseEnvelope>,
    /// HTTP status code if originated from an API call.
    pub status_code: Option<u16>,
    /// Machine-readable code for caller-side failures.
    pub error_code: Option<String>,
    /// Structured detail of a validation failure.
    pub errors: Option<Value>,
    /// Number of attempts made before a connection failure was reported.
    pub attempts: Option<u32>,
}

impl fmt::Display for EvolutionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{:?}] {}", self.kind, self.message)?;
        if let Some(status) = self.status_code {
            write!(f, " (HTTP {})", status)?;
        }
        Ok(())
    }
}

impl std::error::Error for EvolutionError {}

/// Categorised failure kinds.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EvolutionErrorKind {
    // ── HTTP responses ───────────────────────────────────
    Authentication,
    Authorization,
    NotFound,
    Validation,
    RateLimit,
    Server,
    Unexpected,
    // ── No response ──────────────────────────────────────
    Timeout,
    Connection,
    // ── Caller-side ──────────────────────────────────────
    InstanceNotConnected,
    QrCodeExpired,
    InvalidNumber,
    Configuration,
}

impl EvolutionError {
    fn new(kind: EvolutionErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            response: None,
            status_code: None,
            error_code: None,
            errors: None,
            attempts: None,
        }
    }

    /// The local deadline passed before any response arrived.
    pub fn timeout(path: &str) -> Self {
        Self::new(
            EvolutionErrorKind::Timeout,
            format!("Request to {} timed out", path),
        )
    }

    /// Network-level failure that persisted through every retry.
    pub fn connection(attempts: u32, cause: impl fmt::Display) -> Self {
        let mut err = Self::new(
            EvolutionErrorKind::Connection,
            format!("Connection failed after {} attempt(s): {}", attempts, cause),
        );
        err.attempts = Some(attempts);
        err
    }

    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::new(EvolutionErrorKind::Configuration, msg)
    }

    pub fn instance_not_connected(instance_name: &str) -> Self {
        let mut err = Self::new(
            EvolutionErrorKind::InstanceNotConnected,
            format!("Instance '{}' is not connected", instance_name),
        );
        err.error_code = Some("INSTANCE_NOT_CONNECTED".to_string());
        err
    }

    pub fn qr_code_expired() -> Self {
        let mut err = Self::new(EvolutionErrorKind::QrCodeExpired, "QR code expired");
        err.error_code = Some("QR_CODE_EXPIRED".to_string());
        err
    }

    pub fn invalid_number(number: &str) -> Self {
        let mut err = Self::new(
            EvolutionErrorKind::InvalidNumber,
            format!("Number '{}' is invalid", number),
        );
        err.error_code = Some("INVALID_NUMBER".to_string());
        err
    }

    /// Classify a non-success HTTP response.
    pub fn from_response(status: u16, body: &str) -> Self {
        let kind = Self::classify_status(status);
        let base = match kind {
            EvolutionErrorKind::Authentication => "Authentication failed".to_string(),
            EvolutionErrorKind::Authorization => "Access denied".to_string(),
            EvolutionErrorKind::NotFound => "Resource not found".to_string(),
            EvolutionErrorKind::Validation => "Validation failed".to_string(),
            EvolutionErrorKind::RateLimit => "Rate limit exceeded".to_string(),
            EvolutionErrorKind::Server => "Internal server error".to_string(),
            _ => format!("Unexpected response: {}", status),
        };
        let message = match Self::remote_message(body) {
            Some(detail) => format!("{}: {}", base, detail),
            None => base,
        };

        let mut err = Self::new(kind, message);
        err.status_code = Some(status);
        err.response = Some(ResponseEnvelope::new(status, body));
        if kind == EvolutionErrorKind::Validation {
            err.errors = Some(Self::parse_validation_errors(body));
        }
        err
    }

    fn classify_status(status: u16) -> EvolutionErrorKind {
        match status {
            400 | 422 => EvolutionErrorKind::Validation,
            401 => EvolutionErrorKind::Authentication,
            403 => EvolutionErrorKind::Authorization,
            404 => EvolutionErrorKind::NotFound,
            429 => EvolutionErrorKind::RateLimit,
            500..=599 => EvolutionErrorKind::Server,
            _ => EvolutionErrorKind::Unexpected,
        }
    }

    /// Validation detail: the body's `errors` field, else the whole parsed
    /// body, else `{"body": raw}` for non-JSON bodies.
    fn parse_validation_errors(body: &str) -> Value {
        match serde_json::from_str::<Value>(body) {
            Ok(parsed) => match parsed.get("errors") {
                Some(errors) if !errors.is_null() => errors.clone(),
                _ => parsed,
            },
            Err(_) => json!({ "body": body }),
        }
    }

    // The server reports failures as
    // { "status": 404, "error": "Not Found", "response": { "message": [..] } }
    fn remote_message(body: &str) -> Option<String> {
        let v: Value = serde_json::from_str(body).ok()?;
        let candidate = v
            .pointer("/response/message")
            .or_else(|| v.get("message"))
            .or_else(|| v.get("error"))?;
        match candidate {
            Value::String(s) if !s.is_empty() => Some(s.clone()),
            Value::Array(items) => {
                let parts: Vec<String> = items
                    .iter()
                    .map(|i| match i {
                        Value::String(s) => s.clone(),
                        other => other.to_string(),
                    })
                    .collect();
                if parts.is_empty() {
                    None
                } else {
                    Some(parts.join("; "))
                }
            }
            _ => None,
        }
    }

    pub fn kind(&self) -> EvolutionErrorKind {
        self.kind
    }

    pub fn status_code(&self) -> Option<u16> {
        self.status_code
    }

    /// Structured detail of a validation failure.
    pub fn validation_errors(&self) -> Option<&Value> {
        self.errors.as_ref()
    }

    /// `true` when no HTTP response was received at all.
    pub fn is_transport(&self) -> bool {
        matches!(
            self.kind,
            EvolutionErrorKind::Timeout | EvolutionErrorKind::Connection
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = EvolutionError::configuration("timeout must be positive");
        assert!(err.to_string().contains("timeout must be positive"));
        assert!(err.to_string().contains("Configuration"));
    }

    #[test]
    fn test_display_includes_status() {
        let err = EvolutionError::from_response(404, "");
        assert_eq!(err.to_string(), "[NotFound] Resource not found (HTTP 404)");
    }

    #[test]
    fn test_status_classification() {
        let cases = [
            (401, EvolutionErrorKind::Authentication),
            (403, EvolutionErrorKind::Authorization),
            (404, EvolutionErrorKind::NotFound),
            (429, EvolutionErrorKind::RateLimit),
            (500, EvolutionErrorKind::Server),
            (503, EvolutionErrorKind::Server),
            (599, EvolutionErrorKind::Server),
            (400, EvolutionErrorKind::Validation),
            (422, EvolutionErrorKind::Validation),
            (302, EvolutionErrorKind::Unexpected),
            (418, EvolutionErrorKind::Unexpected),
        ];
        for (status, kind) in cases {
            let err = EvolutionError::from_response(status, "{}");
            assert_eq!(err.kind(), kind, "status {}", status);
            assert_eq!(err.status_code(), Some(status));
            assert_eq!(err.response.as_ref().map(|r| r.status_code), Some(status));
        }
    }

    #[test]
    fn test_unexpected_carries_literal_status() {
        let err = EvolutionError::from_response(418, "teapot");
        assert!(err.message.contains("418"));
        assert_eq!(err.response.unwrap().raw_body, "teapot");
    }

    #[test]
    fn test_validation_prefers_errors_field() {
        let body = r#"{"errors":{"number":["is invalid"]},"status":422}"#;
        let err = EvolutionError::from_response(422, body);
        assert_eq!(
            err.validation_errors(),
            Some(&json!({"number": ["is invalid"]}))
        );
    }

    #[test]
    fn test_validation_falls_back_to_body() {
        let body = r#"{"status":400,"error":"Bad Request"}"#;
        let err = EvolutionError::from_response(400, body);
        assert_eq!(
            err.validation_errors(),
            Some(&json!({"status": 400, "error": "Bad Request"}))
        );
    }

    #[test]
    fn test_validation_non_json_body() {
        let err = EvolutionError::from_response(422, "<html>oops</html>");
        assert_eq!(
            err.validation_errors(),
            Some(&json!({"body": "<html>oops</html>"}))
        );
    }

    #[test]
    fn test_non_validation_has_no_errors_payload() {
        let err = EvolutionError::from_response(500, r#"{"errors":["boom"]}"#);
        assert!(err.validation_errors().is_none());
    }

    #[test]
    fn test_remote_message_extracted() {
        let body = r#"{"status":404,"error":"Not Found","response":{"message":["The \"bot\" instance does not exist"]}}"#;
        let err = EvolutionError::from_response(404, body);
        assert!(err.message.starts_with("Resource not found: "));
        assert!(err.message.contains("instance does not exist"));
    }

    #[test]
    fn test_connection_records_attempts() {
        let err = EvolutionError::connection(4, "connection refused");
        assert_eq!(err.kind(), EvolutionErrorKind::Connection);
        assert_eq!(err.attempts, Some(4));
        assert!(err.status_code().is_none());
        assert!(err.is_transport());
    }

    #[test]
    fn test_caller_side_codes() {
        assert_eq!(
            EvolutionError::instance_not_connected("bot1").error_code.as_deref(),
            Some("INSTANCE_NOT_CONNECTED")
        );
        assert_eq!(
            EvolutionError::qr_code_expired().error_code.as_deref(),
            Some("QR_CODE_EXPIRED")
        );
        let err = EvolutionError::invalid_number("abc");
        assert_eq!(err.error_code.as_deref(), Some("INVALID_NUMBER"));
        assert!(err.message.contains("abc"));
    }
}
