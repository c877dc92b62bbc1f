//! Chat listing, message history and chat housekeeping.

use crate::evolution::api_client::ApiClient;
use crate::evolution::error::EvolutionResult;
use crate::evolution::types::{encode_segment, ApiResponse, FindMessagesOptions};
use serde_json::{json, Value};

/// Page size used when the caller does not pick one.
pub const DEFAULT_MESSAGE_LIMIT: u32 = 50;

/// Chat-related API operations.
#[derive(Debug, Clone)]
pub struct ChatApi {
    client: ApiClient,
}

impl ChatApi {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// List the chats of an instance.
    pub async fn list(&self, instance_name: &str) -> EvolutionResult<ApiResponse> {
        let path = format!("/chat/findChats/{}", encode_segment(instance_name));
        self.client.get(&path, &[]).await
    }

    pub fn find_messages_body(remote_jid: &str, options: &FindMessagesOptions) -> Value {
        let mut body = json!({
            "where": { "key": { "remoteJid": remote_jid } },
            "limit": options.limit.unwrap_or(DEFAULT_MESSAGE_LIMIT),
        });
        if let Some(ref cursor) = options.cursor {
            body["cursor"] = json!(cursor);
        }
        body
    }

    /// Fetch the messages of one conversation.
    pub async fn find_messages(
        &self,
        instance_name: &str,
        remote_jid: &str,
        options: &FindMessagesOptions,
    ) -> EvolutionResult<ApiResponse> {
        let path = format!("/chat/findMessages/{}", encode_segment(instance_name));
        self.client
            .post(&path, Self::find_messages_body(remote_jid, options))
            .await
    }

    async fn post_number(
        &self,
        action: &str,
        instance_name: &str,
        number: &str,
    ) -> EvolutionResult<ApiResponse> {
        let path = format!("/chat/{}/{}", action, encode_segment(instance_name));
        self.client.post(&path, json!({ "number": number })).await
    }

    pub async fn mark_as_read(
        &self,
        instance_name: &str,
        number: &str,
    ) -> EvolutionResult<ApiResponse> {
        self.post_number("markMessageAsRead", instance_name, number).await
    }

    pub async fn archive(&self, instance_name: &str, number: &str) -> EvolutionResult<ApiResponse> {
        self.post_number("archiveChat", instance_name, number).await
    }

    pub async fn unarchive(
        &self,
        instance_name: &str,
        number: &str,
    ) -> EvolutionResult<ApiResponse> {
        self.post_number("unarchiveChat", instance_name, number).await
    }

    pub async fn delete(&self, instance_name: &str, number: &str) -> EvolutionResult<ApiResponse> {
        let path = format!(
            "/chat/deleteChat/{}/{}",
            encode_segment(instance_name),
            encode_segment(number)
        );
        self.client.delete(&path).await
    }
}
