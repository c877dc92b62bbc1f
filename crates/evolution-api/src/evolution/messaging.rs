//! Send messages through an instance.
//!
//! Every operation posts to `/message/{action}/{instance}` with a body
//! specific to the message kind. Optional fields that are not set are left
//! out of the body.

use crate::evolution::api_client::ApiClient;
use crate::evolution::error::EvolutionResult;
use crate::evolution::types::{encode_segment, ApiResponse, SendOptions};
use log::debug;
use serde_json::{json, Value};

/// Message sender backed by the HTTP client.
#[derive(Debug, Clone)]
pub struct MessageApi {
    client: ApiClient,
}

impl MessageApi {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    // ─── Core send helper ────────────────────────────────────────────

    async fn send_raw(
        &self,
        action: &str,
        instance_name: &str,
        payload: Value,
    ) -> EvolutionResult<ApiResponse> {
        let path = format!("/message/{}/{}", action, encode_segment(instance_name));
        debug!("{} via {}", action, instance_name);
        self.client.post(&path, payload).await
    }

    fn attach_options(payload: &mut Value, options: &SendOptions) {
        if !options.is_empty() {
            payload["options"] = json!(options);
        }
    }

    fn attach_caption(payload: &mut Value, caption: Option<&str>) {
        if let Some(c) = caption {
            payload["caption"] = json!(c);
        }
    }

    // ─── Text ────────────────────────────────────────────────────────

    pub fn text_body(number: &str, text: &str, options: &SendOptions) -> Value {
        let mut payload = json!({ "number": number, "text": text });
        Self::attach_options(&mut payload, options);
        payload
    }

    /// Send a plain text message.
    pub async fn send_text(
        &self,
        instance_name: &str,
        number: &str,
        text: &str,
        options: &SendOptions,
    ) -> EvolutionResult<ApiResponse> {
        self.send_raw("sendText", instance_name, Self::text_body(number, text, options))
            .await
    }

    // ─── Media messages ──────────────────────────────────────────────

    /// Body shared by the URL-based media kinds.
    pub fn media_body(
        kind: &str,
        number: &str,
        url: &str,
        caption: Option<&str>,
        options: &SendOptions,
    ) -> Value {
        let mut payload = json!({ "number": number, kind: url });
        Self::attach_caption(&mut payload, caption);
        Self::attach_options(&mut payload, options);
        payload
    }

    /// Send an image by URL.
    pub async fn send_image(
        &self,
        instance_name: &str,
        number: &str,
        image_url: &str,
        caption: Option<&str>,
        options: &SendOptions,
    ) -> EvolutionResult<ApiResponse> {
        let payload = Self::media_body("image", number, image_url, caption, options);
        self.send_raw("sendImage", instance_name, payload).await
    }

    /// Send an audio clip by URL.
    pub async fn send_audio(
        &self,
        instance_name: &str,
        number: &str,
        audio_url: &str,
        options: &SendOptions,
    ) -> EvolutionResult<ApiResponse> {
        let payload = Self::media_body("audio", number, audio_url, None, options);
        self.send_raw("sendAudio", instance_name, payload).await
    }

    /// Send a video by URL.
    pub async fn send_video(
        &self,
        instance_name: &str,
        number: &str,
        video_url: &str,
        caption: Option<&str>,
        options: &SendOptions,
    ) -> EvolutionResult<ApiResponse> {
        let payload = Self::media_body("video", number, video_url, caption, options);
        self.send_raw("sendVideo", instance_name, payload).await
    }

    /// Send a document by URL.
    pub async fn send_document(
        &self,
        instance_name: &str,
        number: &str,
        document_url: &str,
        caption: Option<&str>,
        options: &SendOptions,
    ) -> EvolutionResult<ApiResponse> {
        let payload = Self::media_body("document", number, document_url, caption, options);
        self.send_raw("sendDocument", instance_name, payload).await
    }

    // ─── Location ────────────────────────────────────────────────────

    pub fn location_body(
        number: &str,
        latitude: f64,
        longitude: f64,
        description: Option<&str>,
    ) -> Value {
        let mut payload = json!({
            "number": number,
            "latitude": latitude,
            "longitude": longitude,
        });
        if let Some(d) = description {
            payload["description"] = json!(d);
        }
        payload
    }

    /// Send a location pin.
    pub async fn send_location(
        &self,
        instance_name: &str,
        number: &str,
        latitude: f64,
        longitude: f64,
        description: Option<&str>,
    ) -> EvolutionResult<ApiResponse> {
        let payload = Self::location_body(number, latitude, longitude, description);
        self.send_raw("sendLocation", instance_name, payload).await
    }

    // ─── Contact card ────────────────────────────────────────────────

    /// Share a contact card.
    pub async fn send_contact(
        &self,
        instance_name: &str,
        number: &str,
        contact_number: &str,
        contact_name: &str,
    ) -> EvolutionResult<ApiResponse> {
        let payload = json!({
            "number": number,
            "contacts": [{ "number": contact_number, "name": contact_name }],
        });
        self.send_raw("sendContact", instance_name, payload).await
    }

    // ─── Interactive ─────────────────────────────────────────────────

    /// Send a message with reply buttons. `buttons` is passed through as is.
    pub async fn send_buttons(
        &self,
        instance_name: &str,
        number: &str,
        title: &str,
        description: &str,
        buttons: Value,
    ) -> EvolutionResult<ApiResponse> {
        let payload = json!({
            "number": number,
            "title": title,
            "description": description,
            "buttons": buttons,
        });
        self.send_raw("sendButton", instance_name, payload).await
    }

    /// Send a list menu. `sections` is passed through as is.
    pub async fn send_list(
        &self,
        instance_name: &str,
        number: &str,
        title: &str,
        description: &str,
        sections: Value,
    ) -> EvolutionResult<ApiResponse> {
        let payload = json!({
            "number": number,
            "title": title,
            "description": description,
            "sections": sections,
        });
        self.send_raw("sendList", instance_name, payload).await
    }

    // ─── Reaction ────────────────────────────────────────────────────

    /// React to a message. `key` is the target message's `key` object; an
    /// empty `emoji` removes the reaction.
    pub async fn send_reaction(
        &self,
        instance_name: &str,
        key: Value,
        emoji: &str,
    ) -> EvolutionResult<ApiResponse> {
        let payload = json!({ "key": key, "reaction": emoji });
        self.send_raw("sendReaction", instance_name, payload).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_body_without_options() {
        let body = MessageApi::text_body("5511999999999", "Hello", &SendOptions::default());
        assert_eq!(body, json!({"number": "5511999999999", "text": "Hello"}));
    }

    #[test]
    fn test_text_body_with_options() {
        let opts = SendOptions::default().with_delay(1200).with_presence("composing");
        let body = MessageApi::text_body("5511999999999", "Hello", &opts);
        assert_eq!(body["options"], json!({"delay": 1200, "presence": "composing"}));
    }

    #[test]
    fn test_media_body_caption_omitted() {
        let body = MessageApi::media_body(
            "image",
            "5511999999999",
            "https://example.com/a.jpg",
            None,
            &SendOptions::default(),
        );
        assert_eq!(
            body,
            json!({"number": "5511999999999", "image": "https://example.com/a.jpg"})
        );
    }

    #[test]
    fn test_media_body_with_caption() {
        let body = MessageApi::media_body(
            "document",
            "1",
            "https://example.com/a.pdf",
            Some("Invoice"),
            &SendOptions::default(),
        );
        assert_eq!(body["document"], json!("https://example.com/a.pdf"));
        assert_eq!(body["caption"], json!("Invoice"));
    }

    #[test]
    fn test_location_body() {
        let body = MessageApi::location_body("1", -23.55, -46.63, None);
        assert_eq!(body, json!({"number": "1", "latitude": -23.55, "longitude": -46.63}));
        let body = MessageApi::location_body("1", 0.0, 0.0, Some("Office"));
        assert_eq!(body["description"], json!("Office"));
    }
}
