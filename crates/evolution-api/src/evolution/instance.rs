//! Instance session wrapper.
//!
//! [`Instance`] binds an instance name to a client so callers can drop the
//! name argument from every operation.

use crate::evolution::client::EvolutionClient;
use crate::evolution::error::EvolutionResult;
use crate::evolution::types::{ApiResponse, CreateInstanceOptions, FindMessagesOptions, SendOptions};
use log::debug;
use serde_json::Value;

/// Connection status value the server reports for a live session.
pub const STATUS_OPEN: &str = "open";

/// One named instance on the server.
#[derive(Debug, Clone)]
pub struct Instance {
    name: String,
    client: EvolutionClient,
}

impl Instance {
    pub fn new(name: impl Into<String>, client: EvolutionClient) -> Self {
        Self {
            name: name.into(),
            client,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn client(&self) -> &EvolutionClient {
        &self.client
    }

    // ─── Lifecycle ───────────────────────────────────────────────────

    /// Create this instance on the server.
    pub async fn create(&self, options: &CreateInstanceOptions) -> EvolutionResult<ApiResponse> {
        self.client.instances().create(&self.name, options).await
    }

    pub async fn info(&self) -> EvolutionResult<ApiResponse> {
        self.client.instances().fetch(&self.name).await
    }

    pub async fn connect(&self) -> EvolutionResult<ApiResponse> {
        self.client.instances().connect(&self.name).await
    }

    pub async fn disconnect(&self) -> EvolutionResult<ApiResponse> {
        self.client.instances().logout(&self.name).await
    }

    pub async fn delete(&self) -> EvolutionResult<ApiResponse> {
        self.client.instances().delete(&self.name).await
    }

    pub async fn qr_code(&self) -> EvolutionResult<ApiResponse> {
        self.client.instances().qr_code(&self.name).await
    }

    pub async fn connection_state(&self) -> EvolutionResult<ApiResponse> {
        self.client.instances().connection_state(&self.name).await
    }

    pub async fn restart(&self) -> EvolutionResult<ApiResponse> {
        self.client.instances().restart(&self.name).await
    }

    /// Whether the server reports the session as `open`.
    ///
    /// Reads `status`, falling back to `connectionStatus`. A missing instance
    /// or a non-object body is `Ok(false)`; transport and HTTP failures are
    /// returned as errors.
    pub async fn connection_status(&self) -> EvolutionResult<bool> {
        let info = self.info().await?;
        Ok(Self::is_open(&info))
    }

    /// Like [`connection_status`](Self::connection_status) but collapses any
    /// failure to `false`: `false` means "not confirmed connected", not
    /// "confirmed disconnected".
    pub async fn is_connected(&self) -> bool {
        match self.connection_status().await {
            Ok(open) => open,
            Err(e) => {
                debug!("Status check for {} failed: {}", self.name, e);
                false
            }
        }
    }

    fn is_open(info: &ApiResponse) -> bool {
        info.field("status")
            .or_else(|| info.field("connectionStatus"))
            .and_then(Value::as_str)
            == Some(STATUS_OPEN)
    }

    // ─── Messaging ───────────────────────────────────────────────────

    pub async fn send_text(
        &self,
        number: &str,
        text: &str,
        options: &SendOptions,
    ) -> EvolutionResult<ApiResponse> {
        self.client
            .messages()
            .send_text(&self.name, number, text, options)
            .await
    }

    pub async fn send_image(
        &self,
        number: &str,
        image_url: &str,
        caption: Option<&str>,
        options: &SendOptions,
    ) -> EvolutionResult<ApiResponse> {
        self.client
            .messages()
            .send_image(&self.name, number, image_url, caption, options)
            .await
    }

    pub async fn send_audio(
        &self,
        number: &str,
        audio_url: &str,
        options: &SendOptions,
    ) -> EvolutionResult<ApiResponse> {
        self.client
            .messages()
            .send_audio(&self.name, number, audio_url, options)
            .await
    }

    pub async fn send_video(
        &self,
        number: &str,
        video_url: &str,
        caption: Option<&str>,
        options: &SendOptions,
    ) -> EvolutionResult<ApiResponse> {
        self.client
            .messages()
            .send_video(&self.name, number, video_url, caption, options)
            .await
    }

    pub async fn send_document(
        &self,
        number: &str,
        document_url: &str,
        caption: Option<&str>,
        options: &SendOptions,
    ) -> EvolutionResult<ApiResponse> {
        self.client
            .messages()
            .send_document(&self.name, number, document_url, caption, options)
            .await
    }

    pub async fn send_location(
        &self,
        number: &str,
        latitude: f64,
        longitude: f64,
        description: Option<&str>,
    ) -> EvolutionResult<ApiResponse> {
        self.client
            .messages()
            .send_location(&self.name, number, latitude, longitude, description)
            .await
    }

    pub async fn send_contact(
        &self,
        number: &str,
        contact_number: &str,
        contact_name: &str,
    ) -> EvolutionResult<ApiResponse> {
        self.client
            .messages()
            .send_contact(&self.name, number, contact_number, contact_name)
            .await
    }

    pub async fn send_buttons(
        &self,
        number: &str,
        title: &str,
        description: &str,
        buttons: Value,
    ) -> EvolutionResult<ApiResponse> {
        self.client
            .messages()
            .send_buttons(&self.name, number, title, description, buttons)
            .await
    }

    pub async fn send_list(
        &self,
        number: &str,
        title: &str,
        description: &str,
        sections: Value,
    ) -> EvolutionResult<ApiResponse> {
        self.client
            .messages()
            .send_list(&self.name, number, title, description, sections)
            .await
    }

    pub async fn send_reaction(&self, key: Value, emoji: &str) -> EvolutionResult<ApiResponse> {
        self.client
            .messages()
            .send_reaction(&self.name, key, emoji)
            .await
    }

    // ─── Chats ───────────────────────────────────────────────────────

    pub async fn chats(&self) -> EvolutionResult<ApiResponse> {
        self.client.chats().list(&self.name).await
    }

    pub async fn messages(
        &self,
        remote_jid: &str,
        options: &FindMessagesOptions,
    ) -> EvolutionResult<ApiResponse> {
        self.client
            .chats()
            .find_messages(&self.name, remote_jid, options)
            .await
    }

    pub async fn mark_as_read(&self, number: &str) -> EvolutionResult<ApiResponse> {
        self.client.chats().mark_as_read(&self.name, number).await
    }

    pub async fn archive_chat(&self, number: &str) -> EvolutionResult<ApiResponse> {
        self.client.chats().archive(&self.name, number).await
    }

    pub async fn unarchive_chat(&self, number: &str) -> EvolutionResult<ApiResponse> {
        self.client.chats().unarchive(&self.name, number).await
    }

    pub async fn delete_chat(&self, number: &str) -> EvolutionResult<ApiResponse> {
        self.client.chats().delete(&self.name, number).await
    }

    // ─── Contacts ────────────────────────────────────────────────────

    pub async fn contacts(&self) -> EvolutionResult<ApiResponse> {
        self.client.contacts().list(&self.name).await
    }

    pub async fn contact(&self, number: &str) -> EvolutionResult<ApiResponse> {
        self.client.contacts().get(&self.name, number).await
    }

    pub async fn check_number(&self, number: &str) -> EvolutionResult<ApiResponse> {
        self.client.contacts().check_number(&self.name, number).await
    }

    pub async fn block_contact(&self, number: &str) -> EvolutionResult<ApiResponse> {
        self.client.contacts().block(&self.name, number).await
    }

    pub async fn unblock_contact(&self, number: &str) -> EvolutionResult<ApiResponse> {
        self.client.contacts().unblock(&self.name, number).await
    }

    // ─── Webhook ─────────────────────────────────────────────────────

    pub async fn set_webhook(&self, url: &str, events: &[String]) -> EvolutionResult<ApiResponse> {
        self.client.webhooks().set(&self.name, url, events).await
    }

    pub async fn webhook(&self) -> EvolutionResult<ApiResponse> {
        self.client.webhooks().get(&self.name).await
    }

    pub async fn delete_webhook(&self) -> EvolutionResult<ApiResponse> {
        self.client.webhooks().delete(&self.name).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_is_open() {
        assert!(Instance::is_open(&ApiResponse::Json(json!({"status": "open"}))));
        assert!(Instance::is_open(&ApiResponse::Json(
            json!({"name": "bot1", "connectionStatus": "open"})
        )));
        assert!(!Instance::is_open(&ApiResponse::Json(json!({"status": "close"}))));
        assert!(!Instance::is_open(&ApiResponse::Json(json!({"status": "connecting"}))));
        assert!(!Instance::is_open(&ApiResponse::Empty));
        assert!(!Instance::is_open(&ApiResponse::Text("open".into())));
    }
}
