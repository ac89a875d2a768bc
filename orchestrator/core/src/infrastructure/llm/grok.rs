// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

// Grok (xAI) LLM Provider Adapter
//
// Chat completions schema. xAI gets the key twice: as a bearer token and in a
// dedicated X-Api-Key header. Streaming is disabled explicitly and sampling
// defaults are pinned.

use super::openai::{ChatCompletionsProfile, OpenAIAdapter};
use crate::domain::config::ProviderOverrides;
use crate::domain::provider::ProviderId;

pub const GROK_PROFILE: ChatCompletionsProfile = ChatCompletionsProfile {
    provider: ProviderId::Grok,
    endpoint: "https://api.x.ai/v1/chat/completions",
    model: "grok-2-1212",
    temperature: Some(0.7),
    max_tokens: Some(1000),
    explicit_stream_flag: true,
    secondary_key_header: Some("X-Api-Key"),
};

pub fn grok_adapter(overrides: &ProviderOverrides) -> OpenAIAdapter {
    OpenAIAdapter::with_overrides(GROK_PROFILE, overrides)
}
