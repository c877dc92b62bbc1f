//! Read-only views over server payloads.
//!
//! Each view is built once from a JSON object (plus the instance it came
//! from) and never changes afterwards. Missing or mistyped fields read as
//! absent rather than failing construction.

use crate::evolution::types::ApiResponse;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::fmt;

// ═══════════════════════════════════════════════════════════════════════
//  Identifiers
// ═══════════════════════════════════════════════════════════════════════

/// JID suffix of group chats.
pub const GROUP_SUFFIX: &str = "@g.us";
/// JID suffix of broadcast lists and status updates.
pub const BROADCAST_SUFFIX: &str = "@broadcast";

/// The local part of a JID: `5511999999999@s.whatsapp.net` gives
/// `5511999999999`.
pub fn jid_number(jid: &str) -> &str {
    jid.split_once('@').map(|(number, _)| number).unwrap_or(jid)
}

fn str_field<'a>(data: &'a Value, key: &str) -> Option<&'a str> {
    data.get(key).and_then(Value::as_str)
}

fn string_field(data: &Value, key: &str) -> Option<String> {
    str_field(data, key).map(String::from)
}

fn flag(data: &Value, key: &str) -> bool {
    data.get(key).and_then(Value::as_bool) == Some(true)
}

fn non_empty(s: Option<&str>) -> Option<&str> {
    s.filter(|v| !v.is_empty())
}

/// Split a list response into items; a lone object counts as one item.
fn items(resp: &ApiResponse) -> Vec<&Value> {
    match resp.as_json() {
        Some(Value::Array(list)) => list.iter().collect(),
        Some(obj @ Value::Object(_)) => vec![obj],
        _ => Vec::new(),
    }
}

// ═══════════════════════════════════════════════════════════════════════
//  Message
// ═══════════════════════════════════════════════════════════════════════

/// Classified message kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageType {
    Text,
    Image,
    Audio,
    Video,
    Document,
    Location,
    Contact,
    Button,
    List,
    Reaction,
    Sticker,
    Unknown,
}

/// Candidate payload keys in precedence order; the first key present wins.
const TYPE_KEYS: &[(MessageType, &[&str])] = &[
    (MessageType::Text, &["conversation", "extendedTextMessage"]),
    (MessageType::Image, &["imageMessage"]),
    (MessageType::Audio, &["audioMessage"]),
    (MessageType::Video, &["videoMessage"]),
    (MessageType::Document, &["documentMessage"]),
    (MessageType::Location, &["locationMessage"]),
    (MessageType::Contact, &["contactMessage"]),
    (MessageType::Button, &["buttonsResponseMessage", "buttonMessage"]),
    (MessageType::List, &["listResponseMessage", "listMessage"]),
    (MessageType::Reaction, &["reactionMessage"]),
    (MessageType::Sticker, &["stickerMessage"]),
];

impl MessageType {
    /// Resolve the kind of a `message` payload, along with the key that
    /// decided it.
    pub fn classify(payload: &Value) -> (MessageType, Option<&'static str>) {
        let Some(obj) = payload.as_object() else {
            return (MessageType::Unknown, None);
        };
        for (kind, keys) in TYPE_KEYS {
            if let Some(key) = keys.iter().find(|k| obj.contains_key(**k)) {
                return (*kind, Some(*key));
            }
        }
        (MessageType::Unknown, None)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MessageType::Text => "text",
            MessageType::Image => "image",
            MessageType::Audio => "audio",
            MessageType::Video => "video",
            MessageType::Document => "document",
            MessageType::Location => "location",
            MessageType::Contact => "contact",
            MessageType::Button => "button",
            MessageType::List => "list",
            MessageType::Reaction => "reaction",
            MessageType::Sticker => "sticker",
            MessageType::Unknown => "unknown",
        }
    }
}

impl fmt::Display for MessageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A message record as returned by the server.
#[derive(Debug, Clone, PartialEq)]
pub struct Message {
    data: Value,
    message_type: MessageType,
    content_key: Option<&'static str>,
    instance_name: Option<String>,
}

impl Message {
    pub fn new(data: Value, instance_name: Option<String>) -> Self {
        let (message_type, content_key) = MessageType::classify(&data["message"]);
        Self {
            data,
            message_type,
            content_key,
            instance_name,
        }
    }

    /// Messages from a list response, a `{ "messages": { "records": [..] } }`
    /// page, or a single object.
    pub fn collect(resp: &ApiResponse, instance_name: Option<&str>) -> Vec<Message> {
        let records = resp
            .as_json()
            .and_then(|v| v.pointer("/messages/records").or_else(|| v.get("messages")))
            .and_then(Value::as_array);
        let raw: Vec<&Value> = match records {
            Some(list) => list.iter().collect(),
            None => items(resp),
        };
        raw.into_iter()
            .map(|m| Message::new(m.clone(), instance_name.map(String::from)))
            .collect()
    }

    pub fn raw(&self) -> &Value {
        &self.data
    }

    pub fn instance_name(&self) -> Option<&str> {
        self.instance_name.as_deref()
    }

    pub fn message_type(&self) -> MessageType {
        self.message_type
    }

    pub fn id(&self) -> Option<&str> {
        str_field(&self.data, "id")
    }

    pub fn key(&self) -> Option<&Value> {
        self.data.get("key")
    }

    pub fn remote_jid(&self) -> Option<&str> {
        str_field(&self.data["key"], "remoteJid")
    }

    /// Protocol-level message id (`key.id`).
    pub fn message_id(&self) -> Option<&str> {
        str_field(&self.data["key"], "id")
    }

    /// Number of the chat partner.
    pub fn from(&self) -> Option<&str> {
        self.remote_jid().map(jid_number)
    }

    pub fn from_me(&self) -> bool {
        flag(&self.data["key"], "fromMe")
    }

    pub fn participant(&self) -> Option<&str> {
        str_field(&self.data, "participant")
    }

    pub fn is_group(&self) -> bool {
        self.remote_jid().is_some_and(|j| j.contains(GROUP_SUFFIX))
    }

    pub fn is_broadcast(&self) -> bool {
        self.remote_jid().is_some_and(|j| j.contains(BROADCAST_SUFFIX))
    }

    pub fn is_private(&self) -> bool {
        !self.is_group() && !self.is_broadcast()
    }

    /// Send time; the server reports epoch seconds as a number or a string.
    pub fn timestamp(&self) -> Option<DateTime<Utc>> {
        let secs = match self.data.get("messageTimestamp")? {
            Value::Number(n) => n.as_i64()?,
            Value::String(s) => s.parse().ok()?,
            _ => return None,
        };
        DateTime::<Utc>::from_timestamp(secs, 0)
    }

    pub fn status(&self) -> Option<&str> {
        str_field(&self.data, "status")
    }

    pub fn is_read(&self) -> bool {
        self.status() == Some("read")
    }

    pub fn is_delivered(&self) -> bool {
        self.status() == Some("delivered")
    }

    pub fn is_sent(&self) -> bool {
        self.status() == Some("sent")
    }

    pub fn is_failed(&self) -> bool {
        self.status() == Some("failed")
    }

    /// Body text of a text message.
    pub fn text(&self) -> Option<&str> {
        let payload = &self.data["message"];
        str_field(payload, "conversation")
            .or_else(|| str_field(&payload["extendedTextMessage"], "text"))
    }

    /// The sub-payload that decided the message type, e.g. the
    /// `imageMessage` object of an image.
    pub fn content(&self) -> Option<&Value> {
        self.content_key.and_then(|k| self.data["message"].get(k))
    }

    pub fn summary(&self) -> Value {
        json!({
            "id": self.id(),
            "messageId": self.message_id(),
            "type": self.message_type,
            "from": self.from(),
            "fromMe": self.from_me(),
            "group": self.is_group(),
            "timestamp": self.timestamp().map(|t| t.to_rfc3339()),
            "status": self.status(),
            "text": self.text(),
            "instanceName": self.instance_name,
        })
    }
}

// ═══════════════════════════════════════════════════════════════════════
//  Chat
// ═══════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Chat {
    pub id: Option<String>,
    pub name: Option<String>,
    pub unread_count: u64,
    pub is_group: bool,
    pub is_read_only: bool,
    pub archived: bool,
    pub pinned: bool,
    pub instance_name: Option<String>,
}

impl Chat {
    pub fn new(data: &Value, instance_name: Option<String>) -> Self {
        Self {
            id: string_field(data, "id"),
            name: string_field(data, "name"),
            unread_count: data.get("unreadCount").and_then(Value::as_u64).unwrap_or(0),
            is_group: flag(data, "isGroup"),
            is_read_only: flag(data, "isReadOnly"),
            archived: flag(data, "archived"),
            pinned: flag(data, "pinned"),
            instance_name,
        }
    }

    pub fn collect(resp: &ApiResponse, instance_name: Option<&str>) -> Vec<Chat> {
        items(resp)
            .into_iter()
            .map(|c| Chat::new(c, instance_name.map(String::from)))
            .collect()
    }

    pub fn has_unread(&self) -> bool {
        self.unread_count > 0
    }

    pub fn is_private(&self) -> bool {
        !self.is_group
    }

    pub fn number(&self) -> Option<&str> {
        self.id.as_deref().map(jid_number)
    }

    pub fn summary(&self) -> Value {
        json!({
            "id": self.id,
            "name": self.name,
            "number": self.number(),
            "unreadCount": self.unread_count,
            "isGroup": self.is_group,
            "isPrivate": self.is_private(),
            "isReadOnly": self.is_read_only,
            "archived": self.archived,
            "pinned": self.pinned,
            "instanceName": self.instance_name,
        })
    }
}

// ═══════════════════════════════════════════════════════════════════════
//  Contact
// ═══════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Contact {
    pub id: Option<String>,
    pub name: Option<String>,
    pub push_name: Option<String>,
    pub verified_name: Option<String>,
    pub is_business: bool,
    pub is_enterprise: bool,
    pub is_high_level_verified: bool,
    pub instance_name: Option<String>,
}

impl Contact {
    pub fn new(data: &Value, instance_name: Option<String>) -> Self {
        Self {
            id: string_field(data, "id"),
            name: string_field(data, "name"),
            push_name: string_field(data, "pushName"),
            verified_name: string_field(data, "verifiedName"),
            is_business: flag(data, "isBusiness"),
            is_enterprise: flag(data, "isEnterprise"),
            is_high_level_verified: flag(data, "isHighLevelVerified"),
            instance_name,
        }
    }

    pub fn collect(resp: &ApiResponse, instance_name: Option<&str>) -> Vec<Contact> {
        items(resp)
            .into_iter()
            .map(|c| Contact::new(c, instance_name.map(String::from)))
            .collect()
    }

    pub fn number(&self) -> Option<&str> {
        self.id.as_deref().map(jid_number)
    }

    /// First non-empty of verified name, push name, saved name, number.
    pub fn display_name(&self) -> Option<&str> {
        non_empty(self.verified_name.as_deref())
            .or_else(|| non_empty(self.push_name.as_deref()))
            .or_else(|| non_empty(self.name.as_deref()))
            .or_else(|| self.number())
    }

    pub fn is_verified(&self) -> bool {
        non_empty(self.verified_name.as_deref()).is_some()
    }

    pub fn summary(&self) -> Value {
        json!({
            "id": self.id,
            "number": self.number(),
            "name": self.name,
            "pushName": self.push_name,
            "verifiedName": self.verified_name,
            "displayName": self.display_name(),
            "isBusiness": self.is_business,
            "isEnterprise": self.is_enterprise,
            "isHighLevelVerified": self.is_high_level_verified,
            "verified": self.is_verified(),
            "instanceName": self.instance_name,
        })
    }
}

// ═══════════════════════════════════════════════════════════════════════
//  Webhook
// ═══════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Webhook {
    pub url: Option<String>,
    pub events: Vec<String>,
    pub instance_name: Option<String>,
}

impl Webhook {
    /// Reads the URL from `webhook`, falling back to `url`.
    pub fn new(data: &Value, instance_name: Option<String>) -> Self {
        let url = string_field(data, "webhook").or_else(|| string_field(data, "url"));
        let events = data
            .get("events")
            .and_then(Value::as_array)
            .map(|list| {
                list.iter()
                    .filter_map(|e| e.as_str().map(String::from))
                    .collect()
            })
            .unwrap_or_default();
        Self {
            url,
            events,
            instance_name,
        }
    }

    /// `None` when the server has no webhook for the instance.
    pub fn from_response(resp: &ApiResponse, instance_name: Option<&str>) -> Option<Webhook> {
        resp.as_json()
            .filter(|v| v.is_object())
            .map(|v| Webhook::new(v, instance_name.map(String::from)))
    }

    pub fn is_configured(&self) -> bool {
        non_empty(self.url.as_deref()).is_some()
    }

    pub fn is_event_enabled(&self, event: &str) -> bool {
        self.events.iter().any(|e| e == event)
    }

    pub fn enabled_events(&self) -> &[String] {
        &self.events
    }

    pub fn summary(&self) -> Value {
        json!({
            "url": self.url,
            "events": self.events,
            "configured": self.is_configured(),
            "instanceName": self.instance_name,
        })
    }
}
