//! High-level client facade.
//!
//! `EvolutionClient` owns one [`ApiClient`] and hands out the resource
//! families that share it. Cloning is cheap; clones share the connection
//! pool.

use crate::evolution::api_client::ApiClient;
use crate::evolution::chats::ChatApi;
use crate::evolution::config::EvolutionConfig;
use crate::evolution::contacts::ContactApi;
use crate::evolution::error::EvolutionResult;
use crate::evolution::instance::Instance;
use crate::evolution::instances::InstanceApi;
use crate::evolution::messaging::MessageApi;
use crate::evolution::webhooks::WebhookApi;
use log::info;

/// Entry point for every remote operation.
#[derive(Debug, Clone)]
pub struct EvolutionClient {
    api: ApiClient,
    instances: InstanceApi,
    messages: MessageApi,
    chats: ChatApi,
    contacts: ContactApi,
    webhooks: WebhookApi,
}

impl EvolutionClient {
    /// Validate `config` and build a client for it.
    pub fn new(config: EvolutionConfig) -> EvolutionResult<Self> {
        let api = ApiClient::new(&config)?;
        info!("Evolution API client configured for {}", config.base_url);
        Ok(Self::from_api_client(api))
    }

    /// Wrap an existing transport.
    pub fn from_api_client(api: ApiClient) -> Self {
        Self {
            instances: InstanceApi::new(api.clone()),
            messages: MessageApi::new(api.clone()),
            chats: ChatApi::new(api.clone()),
            contacts: ContactApi::new(api.clone()),
            webhooks: WebhookApi::new(api.clone()),
            api,
        }
    }

    pub fn config(&self) -> &EvolutionConfig {
        self.api.config()
    }

    /// The underlying transport, for endpoints without a typed wrapper.
    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    pub fn instances(&self) -> &InstanceApi {
        &self.instances
    }

    pub fn messages(&self) -> &MessageApi {
        &self.messages
    }

    pub fn chats(&self) -> &ChatApi {
        &self.chats
    }

    pub fn contacts(&self) -> &ContactApi {
        &self.contacts
    }

    pub fn webhooks(&self) -> &WebhookApi {
        &self.webhooks
    }

    /// Session wrapper scoped to one instance.
    pub fn instance(&self, name: impl Into<String>) -> Instance {
        Instance::new(name, self.clone())
    }
}
