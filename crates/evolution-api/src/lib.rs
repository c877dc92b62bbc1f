//! # evolution-api – Evolution API Client
//!
//! Typed async client for the Evolution API, a REST gateway in front of
//! WhatsApp Web sessions.
//!
//! ## Features
//!
//! - **Configuration** – base URL, API key, timeout, retry policy, default
//!   webhook, and log level, loadable from JSON
//! - **Transport** – JSON requests with the `apikey` header, retry of
//!   network failures, and status-code classification
//! - **Errors** – one error type with a kind per failure class, carrying
//!   the HTTP status and raw response where there was one
//! - **Resources** – instances, messages, chats, contacts, webhooks
//! - **Sessions** – `Instance` binds a name so calls drop the argument
//! - **Views** – read-only wrappers with message type detection
//!
//! ```no_run
//! use evolution_api::{EvolutionClient, EvolutionConfig, SendOptions};
//!
//! # async fn run() -> evolution_api::EvolutionResult<()> {
//! let config = EvolutionConfig::new("http://localhost:8080").with_api_key("secret");
//! let client = EvolutionClient::new(config)?;
//! let bot = client.instance("bot1");
//! if bot.is_connected().await {
//!     bot.send_text("5511999999999", "Hello", &SendOptions::default()).await?;
//! }
//! # Ok(())
//! # }
//! ```

pub mod evolution;

// Re-export for downstream crates.
pub use evolution::*;
