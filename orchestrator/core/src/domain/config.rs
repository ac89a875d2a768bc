// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

// Duet Configuration Types
//
// Defines the configuration manifest for a Duet installation:
// - Kubernetes-style manifest format (apiVersion/kind/metadata/spec)
// - Per-provider overrides (endpoint, model, sampling)
// - Optional relay prefix for routing provider calls
// - Single-chat and dual-agent defaults
//
// Nothing here is required: an empty manifest yields the built-in provider
// constants and the standard dual-agent script.

use crate::domain::provider::ProviderId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

pub const API_VERSION: &str = "duet/v1";
pub const KIND: &str = "DuetConfig";

/// Placeholder replaced by the previous message in the dual-agent template
pub const MESSAGE_PLACEHOLDER: &str = "{message}";

pub const DEFAULT_OPENING_PROMPT: &str =
    "Hello! Let's have an interesting discussion about the future of artificial intelligence.";

pub const DEFAULT_INSTRUCTION_TEMPLATE: &str =
    "You are having a conversation about AI. Respond to this message: \"{message}\"";

pub const DEFAULT_TOTAL_ROUNDS: u32 = 3;

/// Top-level configuration manifest
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DuetConfigManifest {
    /// API version (must be "duet/v1")
    #[serde(rename = "apiVersion")]
    pub api_version: String,

    /// Resource kind (must be "DuetConfig")
    pub kind: String,

    pub metadata: ManifestMetadata,

    #[serde(default)]
    pub spec: DuetConfigSpec,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ManifestMetadata {
    pub name: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DuetConfigSpec {
    /// Overrides keyed by provider id
    #[serde(default)]
    pub providers: BTreeMap<ProviderId, ProviderOverrides>,

    #[serde(default)]
    pub routing: RoutingConfig,

    #[serde(default)]
    pub chat: ChatConfig,

    #[serde(default)]
    pub dual_agent: DualAgentConfig,

    #[serde(default)]
    pub credentials: CredentialsConfig,
}

/// Per-provider settings; unset fields keep the adapter's built-in constants
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProviderOverrides {
    /// Full endpoint URL
    #[serde(skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,

    /// Anthropic only: value of the `anthropic-version` header
    #[serde(skip_serializing_if = "Option::is_none")]
    pub anthropic_version: Option<String>,

    /// Anthropic only: how the user text is encoded
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_format: Option<ContentFormat>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentFormat {
    /// `"content": "text"`
    #[default]
    Plain,
    /// `"content": [{"type": "text", "text": "text"}]`
    Blocks,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RoutingConfig {
    /// Prefix prepended to every provider endpoint (e.g. a CORS relay)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub relay_prefix: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatConfig {
    #[serde(default = "default_chat_provider")]
    pub default_provider: ProviderId,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DualAgentConfig {
    #[serde(default = "default_agent_a")]
    pub agent_a: ProviderId,

    #[serde(default = "default_agent_b")]
    pub agent_b: ProviderId,

    #[serde(default = "default_total_rounds")]
    pub total_rounds: u32,

    #[serde(default = "default_opening_prompt")]
    pub opening_prompt: String,

    /// Must contain `{message}`
    #[serde(default = "default_instruction_template")]
    pub instruction_template: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CredentialsConfig {
    /// File used by the file-backed secret store (default ~/.duet/credentials.json)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<PathBuf>,
}

fn default_chat_provider() -> ProviderId {
    ProviderId::OpenAI
}

fn default_agent_a() -> ProviderId {
    ProviderId::OpenAI
}

fn default_agent_b() -> ProviderId {
    ProviderId::Anthropic
}

fn default_total_rounds() -> u32 {
    DEFAULT_TOTAL_ROUNDS
}

fn default_opening_prompt() -> String {
    DEFAULT_OPENING_PROMPT.to_string()
}

fn default_instruction_template() -> String {
    DEFAULT_INSTRUCTION_TEMPLATE.to_string()
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            default_provider: default_chat_provider(),
        }
    }
}

impl Default for DualAgentConfig {
    fn default() -> Self {
        Self {
            agent_a: default_agent_a(),
            agent_b: default_agent_b(),
            total_rounds: default_total_rounds(),
            opening_prompt: default_opening_prompt(),
            instruction_template: default_instruction_template(),
        }
    }
}

impl DualAgentConfig {
    /// Wrap the previous message in the instruction template
    pub fn render_instruction(&self, message: &str) -> String {
        self.instruction_template.replace(MESSAGE_PLACEHOLDER, message)
    }
}

impl Default for DuetConfigManifest {
    fn default() -> Self {
        Self {
            api_version: API_VERSION.to_string(),
            kind: KIND.to_string(),
            metadata: ManifestMetadata {
                name: "duet".to_string(),
                version: Some("1.0.0".to_string()),
            },
            spec: DuetConfigSpec::default(),
        }
    }
}

impl DuetConfigManifest {
    /// Load configuration from YAML file
    pub fn from_yaml_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to YAML file
    pub fn to_yaml_file(&self, path: impl AsRef<Path>) -> anyhow::Result<()> {
        let yaml = serde_yaml::to_string(self)?;
        std::fs::write(path, yaml)?;
        Ok(())
    }

    pub fn from_yaml_str(yaml: &str) -> anyhow::Result<Self> {
        let config = serde_yaml::from_str(yaml)?;
        Ok(config)
    }

    /// Discover configuration file using precedence order
    /// 1. DUET_CONFIG_PATH environment variable
    /// 2. ./duet-config.yaml (working directory)
    /// 3. ~/.duet/config.yaml (user home)
    /// 4. /etc/duet/config.yaml (system, Unix) or C:\ProgramData\Duet\config.yaml (Windows)
    pub fn discover_config() -> Option<PathBuf> {
        if let Ok(path) = std::env::var("DUET_CONFIG_PATH") {
            let path = PathBuf::from(path);
            if path.exists() {
                return Some(path);
            }
        }

        let cwd = PathBuf::from("./duet-config.yaml");
        if cwd.exists() {
            return Some(cwd);
        }

        if let Some(home) = dirs::home_dir() {
            let user_config = home.join(".duet").join("config.yaml");
            if user_config.exists() {
                return Some(user_config);
            }
        }

        #[cfg(unix)]
        let system_config = PathBuf::from("/etc/duet/config.yaml");
        #[cfg(windows)]
        let system_config = PathBuf::from("C:\\ProgramData\\Duet\\config.yaml");

        if system_config.exists() {
            return Some(system_config);
        }

        None
    }

    /// Load configuration with discovery, fallback to default
    pub fn load_or_default(cli_path: Option<PathBuf>) -> anyhow::Result<Self> {
        // Explicit path must exist and parse
        if let Some(path) = cli_path {
            tracing::info!("Loading configuration from explicit path: {:?}", path);
            let mut config = Self::from_yaml_file(&path)
                .map_err(|e| anyhow::anyhow!("Failed to load config at {:?}: {}", path, e))?;
            config.apply_env_overrides();
            return Ok(config);
        }

        if let Some(config_path) = Self::discover_config() {
            tracing::info!("Loading configuration from discovered path: {:?}", config_path);
            let mut config = Self::from_yaml_file(config_path)?;
            config.apply_env_overrides();
            Ok(config)
        } else {
            tracing::debug!("No configuration file found in standard locations. Using defaults.");
            let mut config = Self::default();
            config.apply_env_overrides();
            Ok(config)
        }
    }

    /// Apply environment variable overrides to configuration
    pub fn apply_env_overrides(&mut self) {
        if let Ok(val) = std::env::var("DUET_RELAY_PREFIX") {
            let val = val.trim().to_string();
            if val.is_empty() {
                tracing::info!("Environment override: DUET_RELAY_PREFIX cleared");
                self.spec.routing.relay_prefix = None;
            } else {
                tracing::info!("Environment override: DUET_RELAY_PREFIX={}", val);
                self.spec.routing.relay_prefix = Some(val);
            }
        }

        if let Ok(val) = std::env::var("DUET_TOTAL_ROUNDS") {
            match val.trim().parse::<u32>() {
                Ok(rounds) => {
                    tracing::info!("Environment override: DUET_TOTAL_ROUNDS={}", rounds);
                    self.spec.dual_agent.total_rounds = rounds;
                }
                Err(_) => {
                    tracing::warn!(
                        "Invalid value for DUET_TOTAL_ROUNDS: '{}'. Expected a positive integer. Ignoring.",
                        val
                    );
                }
            }
        }
    }

    /// Overrides for one provider (empty when not configured)
    pub fn provider(&self, id: ProviderId) -> ProviderOverrides {
        self.spec.providers.get(&id).cloned().unwrap_or_default()
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if self.api_version != API_VERSION {
            anyhow::bail!(
                "Invalid apiVersion: '{}'. Must be '{}'",
                self.api_version,
                API_VERSION
            );
        }

        if self.kind != KIND {
            anyhow::bail!("Invalid kind: '{}'. Must be '{}'", self.kind, KIND);
        }

        if self.metadata.name.is_empty() {
            anyhow::bail!("metadata.name cannot be empty");
        }

        for (id, overrides) in &self.spec.providers {
            if let Some(endpoint) = &overrides.endpoint {
                if endpoint.trim().is_empty() {
                    anyhow::bail!("Endpoint cannot be empty for provider: {}", id);
                }
            }
            if let Some(model) = &overrides.model {
                if model.trim().is_empty() {
                    anyhow::bail!("Model cannot be empty for provider: {}", id);
                }
            }
            if let Some(max_tokens) = overrides.max_tokens {
                if max_tokens == 0 {
                    anyhow::bail!("max_tokens must be positive for provider: {}", id);
                }
            }
            if let Some(temperature) = overrides.temperature {
                if !(0.0..=2.0).contains(&temperature) {
                    anyhow::bail!(
                        "temperature must be between 0.0 and 2.0 for provider: {} (got {})",
                        id,
                        temperature
                    );
                }
            }
            if *id != ProviderId::Anthropic
                && (overrides.anthropic_version.is_some() || overrides.content_format.is_some())
            {
                anyhow::bail!(
                    "anthropic_version/content_format only apply to the anthropic provider, not: {}",
                    id
                );
            }
        }

        let dual = &self.spec.dual_agent;
        if dual.total_rounds == 0 {
            anyhow::bail!("dual_agent.total_rounds must be at least 1");
        }
        if dual.agent_a == dual.agent_b {
            anyhow::bail!(
                "dual_agent.agent_a and dual_agent.agent_b must differ (both are '{}')",
                dual.agent_a
            );
        }
        if dual.opening_prompt.trim().is_empty() {
            anyhow::bail!("dual_agent.opening_prompt cannot be empty");
        }
        if !dual.instruction_template.contains(MESSAGE_PLACEHOLDER) {
            anyhow::bail!(
                "dual_agent.instruction_template must contain the {} placeholder",
                MESSAGE_PLACEHOLDER
            );
        }

        Ok(())
    }
}
