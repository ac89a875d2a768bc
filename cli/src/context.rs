// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Application wiring
//!
//! Loads the configuration once and builds the concrete collaborators the
//! orchestrators need: reqwest transport, key file plus environment secrets,
//! console notifier and the event bus.

use anyhow::{Context, Result};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::debug;

use duet_core::application::SessionServices;
use duet_core::domain::config::DuetConfigManifest;
use duet_core::domain::credential::SecretStore;
use duet_core::infrastructure::event_bus::EventBus;
use duet_core::infrastructure::llm::ProviderRegistry;
use duet_core::infrastructure::secret_store::{EnvSecretStore, FileSecretStore, LayeredSecretStore};
use duet_core::infrastructure::transport::ReqwestTransport;

use crate::console::ConsoleNotifier;

pub struct AppContext {
    pub config: DuetConfigManifest,
    pub registry: Arc<ProviderRegistry>,
    /// Key file; also the write target of `secrets`
    pub key_file: Arc<FileSecretStore>,
    /// Key file first, then `*_API_KEY` environment variables
    pub secrets: Arc<dyn SecretStore>,
    pub events: EventBus,
}

impl AppContext {
    pub fn load(config_path: Option<PathBuf>) -> Result<Self> {
        let config = DuetConfigManifest::load_or_default(config_path)
            .context("Failed to load configuration")?;
        config.validate().context("Configuration validation failed")?;
        debug!(
            "Configuration loaded: name={}, relay_prefix={:?}",
            config.metadata.name, config.spec.routing.relay_prefix
        );
        Ok(Self::from_config(config))
    }

    pub fn from_config(config: DuetConfigManifest) -> Self {
        let key_path = config
            .spec
            .credentials
            .file
            .clone()
            .unwrap_or_else(FileSecretStore::default_path);
        let key_file = Arc::new(FileSecretStore::new(key_path));

        let layers: Vec<Arc<dyn SecretStore>> = vec![key_file.clone(), Arc::new(EnvSecretStore::new())];
        let secrets: Arc<dyn SecretStore> = Arc::new(LayeredSecretStore::new(layers));

        Self {
            registry: Arc::new(ProviderRegistry::from_config(&config)),
            key_file,
            secrets,
            events: EventBus::with_default_capacity(),
            config,
        }
    }

    pub fn services(&self) -> SessionServices {
        let transport = ReqwestTransport::from_relay_prefix(self.config.spec.routing.relay_prefix.as_deref());
        SessionServices::new(
            self.registry.clone(),
            Arc::new(transport),
            self.secrets.clone(),
            Arc::new(ConsoleNotifier::new()),
            self.events.clone(),
        )
    }
}
