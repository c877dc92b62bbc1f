//! # evolution – Evolution API REST client
//!
//! Async client for a self-hosted Evolution API server, the HTTP gateway
//! that drives WhatsApp Web sessions ("instances").
//!
//! ## Capabilities
//!
//! - **Instances** – create, list, fetch, connect (QR), connection state,
//!   restart, logout, and delete.
//! - **Messaging** – text, image, audio, video, document, location,
//!   contact card, buttons, list, and reaction messages.
//! - **Chats** – list chats, page through messages, mark read, archive,
//!   unarchive, and delete.
//! - **Contacts** – list, look up, check registration, block and unblock.
//! - **Webhooks** – set, read back, and remove the event callback URL.
//! - **Views** – read-only `Message`, `Chat`, `Contact` and `Webhook`
//!   wrappers over server payloads.

pub mod types;
pub mod error;
pub mod config;
pub mod api_client;
pub mod instances;
pub mod messaging;
pub mod chats;
pub mod contacts;
pub mod webhooks;
pub mod models;
pub mod client;
pub mod instance;

// Re-exports
pub use api_client::ApiClient;
pub use client::EvolutionClient;
pub use config::EvolutionConfig;
pub use error::{EvolutionError, EvolutionErrorKind, EvolutionResult};
pub use instance::Instance;
pub use models::{Chat, Contact, Message, MessageType, Webhook};
pub use types::*;
