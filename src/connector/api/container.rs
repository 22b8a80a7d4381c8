use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use tracing::debug;

use crate::application::{ChatSession, CompletionClient};
use crate::connector::adapter::{MockCompletionClient, OpenAiClient};
use crate::domain::SessionConfig;

use super::Settings;

pub struct ContainerConfig {
    pub settings: Settings,
    /// Use the offline echo backend instead of the HTTP API. No credential is needed.
    pub mock: bool,
    /// Show a spinner on stderr while a reply is pending.
    pub spinner: bool,
}

pub struct Container {
    client: Arc<dyn CompletionClient>,
    config: ContainerConfig,
}

impl Container {
    /// Wire the completion backend.
    ///
    /// Fails when the real backend is selected without a usable API key;
    /// callers treat this as fatal and exit before any session exists.
    pub fn new(config: ContainerConfig) -> Result<Self> {
        let client: Arc<dyn CompletionClient> = if config.mock {
            debug!("Using mock completion backend");
            Arc::new(MockCompletionClient::new())
        } else {
            let api_key = config.settings.require_api_key()?;
            debug!("Using OpenAI backend at {}", config.settings.base_url);
            Arc::new(OpenAiClient::new(
                api_key,
                &config.settings.base_url,
                Duration::from_secs(config.settings.timeout_secs),
            ))
        };

        Ok(Self { client, config })
    }

    /// Build a container around an already constructed backend.
    pub fn with_client(config: ContainerConfig, client: Arc<dyn CompletionClient>) -> Self {
        Self { client, config }
    }

    pub fn session(&self) -> ChatSession {
        ChatSession::new(self.config.settings.session.clone(), Arc::clone(&self.client))
    }

    pub fn session_config(&self) -> &SessionConfig {
        &self.config.settings.session
    }

    pub fn spinner_enabled(&self) -> bool {
        self.config.spinner
    }
}
