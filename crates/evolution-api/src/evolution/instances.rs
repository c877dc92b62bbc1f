//! Instance lifecycle: create, connect, log out, delete, inspect.

use crate::evolution::api_client::ApiClient;
use crate::evolution::error::EvolutionResult;
use crate::evolution::types::{encode_segment, ApiRequest, ApiResponse, CreateInstanceOptions};
use log::{debug, info};
use serde_json::{json, Value};

/// Instance-related API operations.
#[derive(Debug, Clone)]
pub struct InstanceApi {
    client: ApiClient,
}

impl InstanceApi {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// List every instance known to the server.
    pub async fn list(&self) -> EvolutionResult<ApiResponse> {
        self.client.get("/instance/fetchInstances", &[]).await
    }

    /// Create a new instance.
    pub async fn create(
        &self,
        instance_name: &str,
        options: &CreateInstanceOptions,
    ) -> EvolutionResult<ApiResponse> {
        info!("Creating instance {}", instance_name);
        self.client
            .post("/instance/create", Self::create_body(instance_name, options))
            .await
    }

    /// Request body for `create`; unset options are omitted, never `null`.
    pub fn create_body(instance_name: &str, options: &CreateInstanceOptions) -> Value {
        let mut body = json!({
            "instanceName": instance_name,
            "qrcode": options.qrcode.unwrap_or(true),
            "webhookByEvents": options.webhook_by_events.unwrap_or(false),
            "webhookBase64": options.webhook_base64.unwrap_or(false),
        });
        if let Some(ref number) = options.number {
            body["number"] = json!(number);
        }
        if let Some(ref token) = options.token {
            body["token"] = json!(token);
        }
        if let Some(ref webhook) = options.webhook {
            body["webhook"] = json!(webhook);
        }
        body
    }

    /// Start (or resume) the connection of an instance.
    pub async fn connect(&self, instance_name: &str) -> EvolutionResult<ApiResponse> {
        let path = format!("/instance/connect/{}", encode_segment(instance_name));
        self.client.execute(&ApiRequest::post(path)).await
    }

    /// Log the instance out of its messaging session.
    pub async fn logout(&self, instance_name: &str) -> EvolutionResult<ApiResponse> {
        info!("Logging out instance {}", instance_name);
        let path = format!("/instance/logout/{}", encode_segment(instance_name));
        self.client.delete(&path).await
    }

    /// Remove the instance from the server.
    pub async fn delete(&self, instance_name: &str) -> EvolutionResult<ApiResponse> {
        info!("Deleting instance {}", instance_name);
        let path = format!("/instance/delete/{}", encode_segment(instance_name));
        self.client.delete(&path).await
    }

    /// Fetch one instance by name.
    ///
    /// The server answers with either an object or a list; the result is
    /// always the single object, or `Empty` when the list is empty.
    pub async fn fetch(&self, instance_name: &str) -> EvolutionResult<ApiResponse> {
        let resp = self
            .client
            .get("/instance/fetchInstances", &[("instanceName", instance_name)])
            .await?;
        Ok(Self::single(resp))
    }

    /// Collapse a list response to its first element.
    pub fn single(resp: ApiResponse) -> ApiResponse {
        match resp {
            ApiResponse::Json(Value::Array(mut items)) => {
                if items.len() > 1 {
                    debug!("fetchInstances returned {} entries, keeping the first", items.len());
                }
                if items.is_empty() {
                    ApiResponse::Empty
                } else {
                    ApiResponse::Json(items.swap_remove(0))
                }
            }
            other => other,
        }
    }

    /// Get the pairing QR code of an instance.
    pub async fn qr_code(&self, instance_name: &str) -> EvolutionResult<ApiResponse> {
        let path = format!("/instance/connect/{}", encode_segment(instance_name));
        self.client.get(&path, &[]).await
    }

    /// Connection state as reported by the server.
    pub async fn connection_state(&self, instance_name: &str) -> EvolutionResult<ApiResponse> {
        let path = format!("/instance/connectionState/{}", encode_segment(instance_name));
        self.client.get(&path, &[]).await
    }

    /// Restart the instance's session on the server.
    pub async fn restart(&self, instance_name: &str) -> EvolutionResult<ApiResponse> {
        let path = format!("/instance/restart/{}", encode_segment(instance_name));
        self.client.execute(&ApiRequest::put(path)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_body_defaults() {
        let body = InstanceApi::create_body("bot1", &CreateInstanceOptions::default());
        assert_eq!(
            body,
            json!({
                "instanceName": "bot1",
                "qrcode": true,
                "webhookByEvents": false,
                "webhookBase64": false,
            })
        );
        assert!(body.get("webhook").is_none());
        assert!(body.get("number").is_none());
        assert!(body.get("token").is_none());
    }

    #[test]
    fn test_create_body_with_options() {
        let opts = CreateInstanceOptions::default()
            .with_qrcode(false)
            .with_number("5511999999999")
            .with_token("tok")
            .with_webhook("https://example.com/hook");
        let body = InstanceApi::create_body("bot1", &opts);
        assert_eq!(body["qrcode"], json!(false));
        assert_eq!(body["number"], json!("5511999999999"));
        assert_eq!(body["token"], json!("tok"));
        assert_eq!(body["webhook"], json!("https://example.com/hook"));
    }

    #[test]
    fn test_single_normalisation() {
        let one = ApiResponse::Json(json!([{"name": "bot1"}]));
        assert_eq!(InstanceApi::single(one), ApiResponse::Json(json!({"name": "bot1"})));

        let obj = ApiResponse::Json(json!({"name": "bot1"}));
        assert_eq!(InstanceApi::single(obj.clone()), obj);

        assert_eq!(InstanceApi::single(ApiResponse::Json(json!([]))), ApiResponse::Empty);

        let many = ApiResponse::Json(json!([{"name": "a"}, {"name": "b"}]));
        assert_eq!(InstanceApi::single(many), ApiResponse::Json(json!({"name": "a"})));

        assert_eq!(InstanceApi::single(ApiResponse::Empty), ApiResponse::Empty);
    }
}
