// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

// Groq LLM Provider Adapter
//
// Groq exposes an OpenAI-compatible endpoint under /openai/v1.

use super::openai::{ChatCompletionsProfile, OpenAIAdapter};
use crate::domain::config::ProviderOverrides;
use crate::domain::provider::ProviderId;

pub const GROQ_PROFILE: ChatCompletionsProfile = ChatCompletionsProfile {
    provider: ProviderId::Groq,
    endpoint: "https://api.groq.com/openai/v1/chat/completions",
    model: "mixtral-8x7b-32768",
    temperature: None,
    max_tokens: None,
    explicit_stream_flag: false,
    secondary_key_header: None,
};

pub fn groq_adapter(overrides: &ProviderOverrides) -> OpenAIAdapter {
    OpenAIAdapter::with_overrides(GROQ_PROFILE, overrides)
}
