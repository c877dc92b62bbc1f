//! Client configuration.
//!
//! A configuration is a plain value handed to
//! [`EvolutionClient::new`](crate::evolution::client::EvolutionClient::new);
//! there is no process-wide state. Build one with [`EvolutionConfig::new`] or
//! `Default` and the chained `with_*` setters, or deserialize it.

use crate::evolution::error::{EvolutionError, EvolutionResult};
use log::LevelFilter;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Connection settings for an Evolution API server.
#[derive(Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvolutionConfig {
    /// Server root, e.g. `http://localhost:8080`.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Global API key, sent as the `apikey` header.
    #[serde(default)]
    pub api_key: Option<String>,
    /// Per-attempt request timeout, in milliseconds.
    #[serde(default = "default_timeout")]
    pub timeout_ms: u64,
    /// Extra attempts after a network-level failure.
    #[serde(default = "default_retry_attempts")]
    pub retry_attempts: u32,
    /// Pause between attempts, in milliseconds.
    #[serde(default = "default_retry_delay")]
    pub retry_delay_ms: u64,
    /// Webhook URL applications usually register for their instances.
    #[serde(default)]
    pub webhook_url: Option<String>,
    /// Webhook events applications usually subscribe to.
    #[serde(default = "default_webhook_events")]
    pub webhook_events: Vec<String>,
    /// Log verbosity the embedding application should apply.
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_base_url() -> String {
    "http://localhost:8080".to_string()
}
fn default_timeout() -> u64 {
    30_000
}
fn default_retry_attempts() -> u32 {
    3
}
fn default_retry_delay() -> u64 {
    1000
}
fn default_webhook_events() -> Vec<String> {
    vec!["connection.update".to_string(), "message.upsert".to_string()]
}
fn default_log_level() -> String {
    "info".to_string()
}

/// Whole milliseconds of `d`, rounding a non-zero sub-millisecond value up
/// to 1 and saturating at `u64::MAX`.
fn duration_ms(d: Duration) -> u64 {
    let ms = u64::try_from(d.as_millis()).unwrap_or(u64::MAX);
    if ms == 0 && !d.is_zero() {
        1
    } else {
        ms
    }
}

impl fmt::Debug for EvolutionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EvolutionConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("timeout_ms", &self.timeout_ms)
            .field("retry_attempts", &self.retry_attempts)
            .field("retry_delay_ms", &self.retry_delay_ms)
            .field("webhook_url", &self.webhook_url)
            .field("webhook_events", &self.webhook_events)
            .field("log_level", &self.log_level)
            .finish()
    }
}

impl Default for EvolutionConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            api_key: None,
            timeout_ms: default_timeout(),
            retry_attempts: default_retry_attempts(),
            retry_delay_ms: default_retry_delay(),
            webhook_url: None,
            webhook_events: default_webhook_events(),
            log_level: default_log_level(),
        }
    }
}

impl EvolutionConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Per-attempt timeout, kept at millisecond resolution.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout_ms = duration_ms(timeout);
        self
    }

    pub fn with_retry_attempts(mut self, attempts: u32) -> Self {
        self.retry_attempts = attempts;
        self
    }

    pub fn with_retry_delay(mut self, delay: Duration) -> Self {
        self.retry_delay_ms = duration_ms(delay);
        self
    }

    pub fn with_webhook(mut self, url: impl Into<String>, events: Vec<String>) -> Self {
        self.webhook_url = Some(url.into());
        self.webhook_events = events;
        self
    }

    pub fn with_log_level(mut self, level: impl Into<String>) -> Self {
        self.log_level = level.into();
        self
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn retry_delay(&self) -> Duration {
        Duration::from_millis(self.retry_delay_ms)
    }

    /// Restore every setting to its default. Meant for test harnesses that
    /// reuse one configuration value across cases.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Check the invariants the transport relies on.
    pub fn validate(&self) -> EvolutionResult<()> {
        if self.base_url.trim().is_empty() {
            return Err(EvolutionError::configuration("base_url must not be empty"));
        }
        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err(EvolutionError::configuration(format!(
                "base_url must start with http:// or https://, got {}",
                self.base_url
            )));
        }
        if self.timeout_ms == 0 {
            return Err(EvolutionError::configuration("timeout must be greater than zero"));
        }
        Ok(())
    }

    /// Map the `log_level` setting onto a `log` filter. Unknown values fall
    /// back to `Info`.
    pub fn log_level_filter(&self) -> LevelFilter {
        self.log_level.parse().unwrap_or(LevelFilter::Info)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cfg = EvolutionConfig::default();
        assert_eq!(cfg.base_url, "http://localhost:8080");
        assert!(cfg.api_key.is_none());
        assert_eq!(cfg.timeout(), Duration::from_secs(30));
        assert_eq!(cfg.retry_attempts, 3);
        assert_eq!(cfg.retry_delay(), Duration::from_secs(1));
        assert_eq!(cfg.webhook_events, vec!["connection.update", "message.upsert"]);
    }

    #[test]
    fn test_deserialize_partial() {
        let cfg: EvolutionConfig = serde_json::from_str(
            r#"{"baseUrl":"https://evo.example.com","apiKey":"secret","retryAttempts":0}"#,
        )
        .unwrap();
        assert_eq!(cfg.base_url, "https://evo.example.com");
        assert_eq!(cfg.api_key.as_deref(), Some("secret"));
        assert_eq!(cfg.retry_attempts, 0);
        assert_eq!(cfg.timeout_ms, 30_000);
        assert_eq!(cfg.log_level, "info");
    }

    #[test]
    fn test_setters_and_reset() {
        let mut cfg = EvolutionConfig::new("http://10.0.0.5:8080")
            .with_api_key("k")
            .with_timeout(Duration::from_secs(5))
            .with_retry_attempts(1)
            .with_retry_delay(Duration::from_millis(100));
        assert_eq!(cfg.timeout_ms, 5_000);
        assert_eq!(cfg.retry_delay_ms, 100);

        cfg.reset();
        assert_eq!(cfg, EvolutionConfig::default());
    }

    #[test]
    fn test_validate() {
        assert!(EvolutionConfig::default().validate().is_ok());

        let zero = EvolutionConfig::default().with_timeout(Duration::ZERO);
        assert!(zero.validate().is_err());

        assert!(EvolutionConfig::new("").validate().is_err());
        assert!(EvolutionConfig::new("localhost:8080").validate().is_err());
    }

    #[test]
    fn test_sub_millisecond_durations_round_up() {
        let cfg = EvolutionConfig::default()
            .with_timeout(Duration::from_micros(500))
            .with_retry_delay(Duration::from_nanos(1));
        assert_eq!(cfg.timeout_ms, 1);
        assert_eq!(cfg.retry_delay_ms, 1);
        assert!(cfg.validate().is_ok());

        let cfg = EvolutionConfig::default()
            .with_timeout(Duration::from_micros(1500))
            .with_retry_delay(Duration::ZERO);
        assert_eq!(cfg.timeout_ms, 1);
        assert_eq!(cfg.retry_delay_ms, 0);
    }

    #[test]
    fn test_huge_duration_saturates() {
        let cfg = EvolutionConfig::default().with_timeout(Duration::MAX);
        assert_eq!(cfg.timeout_ms, u64::MAX);
    }

    #[test]
    fn test_debug_redacts_api_key() {
        let cfg = EvolutionConfig::default().with_api_key("super-secret-key");
        let shown = format!("{:?}", cfg);
        assert!(!shown.contains("super-secret-key"));
        assert!(shown.contains("<redacted>"));

        let client = crate::evolution::api_client::ApiClient::new(&cfg).unwrap();
        assert!(!format!("{:?}", client).contains("super-secret-key"));
    }

    #[test]
    fn test_log_level_filter() {
        assert_eq!(
            EvolutionConfig::default().with_log_level("debug").log_level_filter(),
            LevelFilter::Debug
        );
        assert_eq!(
            EvolutionConfig::default().with_log_level("chatty").log_level_filter(),
            LevelFilter::Info
        );
    }
}
