//! Contact lookup, number verification and blocking.

use crate::evolution::api_client::ApiClient;
use crate::evolution::error::EvolutionResult;
use crate::evolution::types::{encode_segment, ApiResponse};
use serde_json::json;

/// Contacts-related API operations.
#[derive(Debug, Clone)]
pub struct ContactApi {
    client: ApiClient,
}

impl ContactApi {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    pub async fn list(&self, instance_name: &str) -> EvolutionResult<ApiResponse> {
        let path = format!("/contact/findContacts/{}", encode_segment(instance_name));
        self.client.get(&path, &[]).await
    }

    pub async fn get(&self, instance_name: &str, number: &str) -> EvolutionResult<ApiResponse> {
        let path = format!(
            "/contact/findContact/{}/{}",
            encode_segment(instance_name),
            encode_segment(number)
        );
        self.client.get(&path, &[]).await
    }

    /// Ask the server whether `number` is registered on the platform.
    pub async fn check_number(
        &self,
        instance_name: &str,
        number: &str,
    ) -> EvolutionResult<ApiResponse> {
        self.post_number("checkNumber", instance_name, number).await
    }

    pub async fn block(&self, instance_name: &str, number: &str) -> EvolutionResult<ApiResponse> {
        self.post_number("blockContact", instance_name, number).await
    }

    pub async fn unblock(&self, instance_name: &str, number: &str) -> EvolutionResult<ApiResponse> {
        self.post_number("unblockContact", instance_name, number).await
    }

    async fn post_number(
        &self,
        action: &str,
        instance_name: &str,
        number: &str,
    ) -> EvolutionResult<ApiResponse> {
        let path = format!("/contact/{}/{}", action, encode_segment(instance_name));
        self.client.post(&path, json!({ "number": number })).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evolution::config::EvolutionConfig;
    use mockito::{Matcher, Server};

    fn contacts_for(server: &Server) -> ContactApi {
        let config = EvolutionConfig::new(server.url()).with_retry_attempts(0);
        ContactApi::new(ApiClient::new(&config).unwrap())
    }

    #[tokio::test]
    async fn test_get_contact_path() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/contact/findContact/my%20bot/5511999999999")
            .with_status(200)
            .with_body(r#"{"id":"5511999999999@s.whatsapp.net","pushName":"Ana"}"#)
            .create_async()
            .await;

        let resp = contacts_for(&server)
            .get("my bot", "5511999999999")
            .await
            .unwrap();
        assert_eq!(resp.field("pushName"), Some(&json!("Ana")));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_list_and_unblock() {
        let mut server = Server::new_async().await;
        let list = server
            .mock("GET", "/contact/findContacts/bot1")
            .with_status(200)
            .with_body("[]")
            .create_async()
            .await;
        let unblock = server
            .mock("POST", "/contact/unblockContact/bot1")
            .match_body(Matcher::Json(json!({"number": "5511999999999"})))
            .with_status(200)
            .create_async()
            .await;

        let contacts = contacts_for(&server);
        contacts.list("bot1").await.unwrap();
        contacts.unblock("bot1", "5511999999999").await.unwrap();
        list.assert_async().await;
        unblock.assert_async().await;
    }
}
