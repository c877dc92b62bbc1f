//! Webhook configuration for an instance.
//!
//! This only registers where the server should deliver events; receiving
//! the callbacks is the application's job.

use crate::evolution::api_client::ApiClient;
use crate::evolution::error::EvolutionResult;
use crate::evolution::types::{encode_segment, ApiResponse};
use log::info;
use serde_json::{json, Value};

/// Webhook-related API operations.
#[derive(Debug, Clone)]
pub struct WebhookApi {
    client: ApiClient,
}

impl WebhookApi {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// `events` is included only when non-empty, and `webhookByEvents` is
    /// `true` exactly in that case.
    pub fn set_body(url: &str, events: &[String]) -> Value {
        let mut body = json!({
            "webhook": url,
            "webhookByEvents": !events.is_empty(),
            "webhookBase64": false,
        });
        if !events.is_empty() {
            body["events"] = json!(events);
        }
        body
    }

    pub async fn set(
        &self,
        instance_name: &str,
        url: &str,
        events: &[String],
    ) -> EvolutionResult<ApiResponse> {
        info!("Setting webhook for {} ({} event(s))", instance_name, events.len());
        let path = format!("/webhook/set/{}", encode_segment(instance_name));
        self.client.post(&path, Self::set_body(url, events)).await
    }

    pub async fn get(&self, instance_name: &str) -> EvolutionResult<ApiResponse> {
        let path = format!("/webhook/find/{}", encode_segment(instance_name));
        self.client.get(&path, &[]).await
    }

    pub async fn delete(&self, instance_name: &str) -> EvolutionResult<ApiResponse> {
        let path = format!("/webhook/del/{}", encode_segment(instance_name));
        self.client.delete(&path).await
    }
}
