// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

// Provider Identity - the closed set of language-model services Duet can talk to.
//
// Adding a provider means adding a variant here, an adapter under
// infrastructure/llm/, and an entry in the ProviderRegistry.

use crate::domain::error::ConversationError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Identifier of a supported provider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderId {
    OpenAI,
    Anthropic,
    Perplexity,
    Grok,
    Groq,
}

impl ProviderId {
    /// Every known provider, in registry order
    pub const ALL: [ProviderId; 5] = [
        ProviderId::OpenAI,
        ProviderId::Anthropic,
        ProviderId::Perplexity,
        ProviderId::Grok,
        ProviderId::Groq,
    ];

    /// Identifier used in configuration and on the command line
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderId::OpenAI => "openai",
            ProviderId::Anthropic => "anthropic",
            ProviderId::Perplexity => "perplexity",
            ProviderId::Grok => "grok",
            ProviderId::Groq => "groq",
        }
    }

    /// Human-readable vendor name
    pub fn display_name(&self) -> &'static str {
        match self {
            ProviderId::OpenAI => "OpenAI",
            ProviderId::Anthropic => "Anthropic",
            ProviderId::Perplexity => "Perplexity",
            ProviderId::Grok => "Grok",
            ProviderId::Groq => "Groq",
        }
    }
}

impl fmt::Display for ProviderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProviderId {
    type Err = ConversationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase();
        ProviderId::ALL
            .into_iter()
            .find(|id| id.as_str() == normalized)
            .ok_or_else(|| ConversationError::UnknownProvider { id: s.to_string() })
    }
}
