//! Shared request/response types.
//!
//! [`ApiRequest`] describes one outbound call, [`ApiResponse`] is what the
//! transport hands back on success, and the `*Options` structs carry the
//! optional knobs of individual operations.

use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};
use reqwest::Method;
use serde::{Deserialize, Serialize};
use serde_json::Value;

// ═══════════════════════════════════════════════════════════════════════
//  Paths
// ═══════════════════════════════════════════════════════════════════════

/// Characters escaped inside a single path segment (WHATWG path-segment set).
const PATH_SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// Percent-encode a caller-supplied value for use as one path segment.
/// Spaces become `%20`.
pub fn encode_segment(segment: &str) -> String {
    utf8_percent_encode(segment, PATH_SEGMENT).to_string()
}

// ═══════════════════════════════════════════════════════════════════════
//  Request descriptor
// ═══════════════════════════════════════════════════════════════════════

/// One outbound API call. Built per call, read-only once constructed.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    method: Method,
    path: String,
    query: Vec<(String, String)>,
    body: Option<Value>,
}

impl ApiRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            body: None,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::PUT, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    pub fn with_query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn query(&self) -> &[(String, String)] {
        &self.query
    }

    pub fn body(&self) -> Option<&Value> {
        self.body.as_ref()
    }

    /// The body to put on the wire: `null`, `{}` and `[]` are not sent.
    pub fn sendable_body(&self) -> Option<&Value> {
        self.body.as_ref().filter(|b| match b {
            Value::Null => false,
            Value::Object(map) => !map.is_empty(),
            Value::Array(items) => !items.is_empty(),
            _ => true,
        })
    }
}

// ═══════════════════════════════════════════════════════════════════════
//  Call result
// ═══════════════════════════════════════════════════════════════════════

/// Successful call result.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ApiResponse {
    /// The server answered with an empty body.
    Empty,
    /// The body parsed as JSON.
    Json(Value),
    /// The body was not JSON; kept verbatim.
    Text(String),
}

impl ApiResponse {
    /// Interpret a raw success body.
    pub fn from_body(body: &str) -> Self {
        if body.trim().is_empty() {
            return ApiResponse::Empty;
        }
        match serde_json::from_str(body) {
            Ok(v) => ApiResponse::Json(v),
            Err(_) => ApiResponse::Text(body.to_string()),
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, ApiResponse::Empty)
    }

    pub fn as_json(&self) -> Option<&Value> {
        match self {
            ApiResponse::Json(v) => Some(v),
            _ => None,
        }
    }

    pub fn into_json(self) -> Option<Value> {
        match self {
            ApiResponse::Json(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            ApiResponse::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Look up a top-level field of a JSON object body.
    pub fn field(&self, key: &str) -> Option<&Value> {
        self.as_json().and_then(|v| v.get(key))
    }
}

// ═══════════════════════════════════════════════════════════════════════
//  Operation options
// ═══════════════════════════════════════════════════════════════════════

/// Options for [`InstanceApi::create`](crate::evolution::instances::InstanceApi::create). Unset fields are left out of the request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateInstanceOptions {
    /// Ask the server to produce a pairing QR code (default `true`).
    pub qrcode: Option<bool>,
    pub number: Option<String>,
    pub token: Option<String>,
    pub webhook: Option<String>,
    /// Default `false`.
    pub webhook_by_events: Option<bool>,
    /// Default `false`.
    pub webhook_base64: Option<bool>,
}

impl CreateInstanceOptions {
    pub fn with_webhook(mut self, url: impl Into<String>) -> Self {
        self.webhook = Some(url.into());
        self
    }

    pub fn with_number(mut self, number: impl Into<String>) -> Self {
        self.number = Some(number.into());
        self
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn with_qrcode(mut self, qrcode: bool) -> Self {
        self.qrcode = Some(qrcode);
        self
    }
}

/// Delivery options accepted by every `send_*` operation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendOptions {
    /// Milliseconds the server waits (showing presence) before sending.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delay: Option<u64>,
    /// Presence shown while waiting, e.g. `composing` or `recording`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub presence: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link_preview: Option<bool>,
    /// JIDs mentioned in the message.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mentions: Option<Vec<String>>,
    /// Message being replied to, as returned by the server.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quoted: Option<Value>,
}

impl SendOptions {
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    pub fn with_delay(mut self, delay_ms: u64) -> Self {
        self.delay = Some(delay_ms);
        self
    }

    pub fn with_presence(mut self, presence: impl Into<String>) -> Self {
        self.presence = Some(presence.into());
        self
    }
}

/// Paging for `find_messages`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FindMessagesOptions {
    /// Page size; the server default of 50 is sent when unset.
    pub limit: Option<u32>,
    pub cursor: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_encode_segment_space() {
        assert_eq!(encode_segment("my bot"), "my%20bot");
        assert!(!encode_segment("my bot").contains('+'));
    }

    #[test]
    fn test_encode_segment_reserved() {
        assert_eq!(encode_segment("a/b?c#d"), "a%2Fb%3Fc%23d");
        assert_eq!(encode_segment("100%"), "100%25");
        assert_eq!(encode_segment("5511999999999@s.whatsapp.net"), "5511999999999@s.whatsapp.net");
        assert_eq!(encode_segment("bot1"), "bot1");
    }

    #[test]
    fn test_encode_segment_unicode() {
        assert_eq!(encode_segment("café"), "caf%C3%A9");
    }

    #[test]
    fn test_sendable_body() {
        assert!(ApiRequest::post("/x").sendable_body().is_none());
        assert!(ApiRequest::post("/x").with_body(json!({})).sendable_body().is_none());
        assert!(ApiRequest::post("/x").with_body(json!([])).sendable_body().is_none());
        assert!(ApiRequest::post("/x").with_body(Value::Null).sendable_body().is_none());
        let req = ApiRequest::post("/x").with_body(json!({"number": "1"}));
        assert_eq!(req.sendable_body(), Some(&json!({"number": "1"})));
    }

    #[test]
    fn test_request_builder() {
        let req = ApiRequest::get("/instance/fetchInstances").with_query("instanceName", "bot1");
        assert_eq!(req.method(), &Method::GET);
        assert_eq!(req.path(), "/instance/fetchInstances");
        assert_eq!(req.query(), &[("instanceName".to_string(), "bot1".to_string())]);
        assert!(req.body().is_none());
    }

    #[test]
    fn test_response_from_body() {
        assert_eq!(ApiResponse::from_body(""), ApiResponse::Empty);
        assert_eq!(ApiResponse::from_body("  \n"), ApiResponse::Empty);
        assert_eq!(
            ApiResponse::from_body(r#"{"status":"open"}"#),
            ApiResponse::Json(json!({"status": "open"}))
        );
        assert_eq!(
            ApiResponse::from_body("OK, queued"),
            ApiResponse::Text("OK, queued".to_string())
        );
    }

    #[test]
    fn test_response_accessors() {
        let resp = ApiResponse::Json(json!({"instance": {"state": "open"}}));
        assert_eq!(resp.field("instance"), Some(&json!({"state": "open"})));
        assert!(resp.as_text().is_none());
        assert!(ApiResponse::Text("x".into()).field("instance").is_none());
        assert!(ApiResponse::Empty.is_empty());
    }

    #[test]
    fn test_send_options_is_empty() {
        assert!(SendOptions::default().is_empty());
        assert!(!SendOptions::default().with_delay(1200).is_empty());
        assert_eq!(
            serde_json::to_value(SendOptions::default().with_presence("composing")).unwrap(),
            json!({"presence": "composing"})
        );
    }
}
