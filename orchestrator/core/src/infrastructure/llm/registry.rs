// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

// LLM Provider Registry - Provider Id Resolution
//
// Holds exactly one adapter per supported provider and resolves raw provider
// identifiers (as typed by a user or read from config) to those adapters.

use crate::domain::config::DuetConfigManifest;
use crate::domain::error::ConversationError;
use crate::domain::llm::ProviderAdapter;
use crate::domain::provider::ProviderId;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info};

use super::anthropic::AnthropicAdapter;
use super::grok::grok_adapter;
use super::groq::groq_adapter;
use super::openai::{OpenAIAdapter, OPENAI_PROFILE};
use super::perplexity::perplexity_adapter;

/// Listing entry for one registered provider
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProviderInfo {
    pub id: ProviderId,
    pub display_name: &'static str,
    pub model: String,
}

/// Registry mapping every provider id to its adapter
pub struct ProviderRegistry {
    providers: HashMap<ProviderId, Arc<dyn ProviderAdapter>>,
}

impl ProviderRegistry {
    /// Registry with built-in endpoints, models and parameters
    pub fn with_defaults() -> Self {
        Self::from_config(&DuetConfigManifest::default())
    }

    /// Create registry with per-provider overrides applied from configuration
    pub fn from_config(config: &DuetConfigManifest) -> Self {
        info!("Initializing LLM provider registry");

        let mut providers: HashMap<ProviderId, Arc<dyn ProviderAdapter>> = HashMap::new();
        for id in ProviderId::ALL {
            let overrides = config.provider(id);
            let adapter: Arc<dyn ProviderAdapter> = match id {
                ProviderId::OpenAI => Arc::new(OpenAIAdapter::with_overrides(OPENAI_PROFILE, &overrides)),
                ProviderId::Anthropic => Arc::new(AnthropicAdapter::with_overrides(&overrides)),
                ProviderId::Perplexity => Arc::new(perplexity_adapter(&overrides)),
                ProviderId::Grok => Arc::new(grok_adapter(&overrides)),
                ProviderId::Groq => Arc::new(groq_adapter(&overrides)),
            };
            debug!("Registered provider {} (model {})", id, adapter.model());
            providers.insert(id, adapter);
        }

        Self { providers }
    }

    /// Resolve a raw identifier such as `"openai"` or `" Groq "`
    pub fn resolve(&self, raw: &str) -> Result<Arc<dyn ProviderAdapter>, ConversationError> {
        let id: ProviderId = raw.parse()?;
        self.get(id).ok_or_else(|| ConversationError::UnknownProvider { id: raw.to_string() })
    }

    pub fn get(&self, id: ProviderId) -> Option<Arc<dyn ProviderAdapter>> {
        self.providers.get(&id).cloned()
    }

    /// Registered providers in canonical order
    pub fn list(&self) -> Vec<ProviderInfo> {
        ProviderId::ALL
            .into_iter()
            .filter_map(|id| {
                self.providers.get(&id).map(|adapter| ProviderInfo {
                    id,
                    display_name: id.display_name(),
                    model: adapter.model().to_string(),
                })
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.providers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }
}

impl Default for ProviderRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::config::ProviderOverrides;
    use crate::domain::error::ErrorKind;

    #[test]
    fn test_every_provider_resolves() {
        let registry = ProviderRegistry::with_defaults();
        assert_eq!(registry.len(), ProviderId::ALL.len());

        for id in ProviderId::ALL {
            let adapter = registry.resolve(id.as_str()).unwrap();
            assert_eq!(adapter.provider_id(), id);
        }
    }

    #[test]
    fn test_unknown_provider() {
        let registry = ProviderRegistry::with_defaults();
        let err = registry.resolve("foo").err().unwrap();
        assert_eq!(err.kind(), ErrorKind::UnknownProvider);
        assert_eq!(err, ConversationError::UnknownProvider { id: "foo".into() });
    }

    #[test]
    fn test_listing_uses_configured_models() {
        let mut config = DuetConfigManifest::default();
        config.spec.providers.insert(
            ProviderId::Groq,
            ProviderOverrides {
                model: Some("llama-3.1-8b-instant".into()),
                ..Default::default()
            },
        );

        let listing = ProviderRegistry::from_config(&config).list();
        let ids: Vec<ProviderId> = listing.iter().map(|p| p.id).collect();
        assert_eq!(ids, ProviderId::ALL.to_vec());

        let groq = listing.iter().find(|p| p.id == ProviderId::Groq).unwrap();
        assert_eq!(groq.model, "llama-3.1-8b-instant");
        assert_eq!(groq.display_name, "Groq");

        let openai = listing.iter().find(|p| p.id == ProviderId::OpenAI).unwrap();
        assert_eq!(openai.model, "gpt-3.5-turbo");
    }
}
