// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

// Perplexity LLM Provider Adapter
//
// Perplexity speaks the chat completions schema with a bearer token.

use super::openai::{ChatCompletionsProfile, OpenAIAdapter};
use crate::domain::config::ProviderOverrides;
use crate::domain::provider::ProviderId;

pub const PERPLEXITY_PROFILE: ChatCompletionsProfile = ChatCompletionsProfile {
    provider: ProviderId::Perplexity,
    endpoint: "https://api.perplexity.ai/chat/completions",
    model: "mixtral-8x7b-instruct",
    temperature: None,
    max_tokens: None,
    explicit_stream_flag: false,
    secondary_key_header: None,
};

pub fn perplexity_adapter(overrides: &ProviderOverrides) -> OpenAIAdapter {
    OpenAIAdapter::with_overrides(PERPLEXITY_PROFILE, overrides)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::credential::Credential;
    use crate::domain::llm::ProviderAdapter;

    #[test]
    fn test_perplexity_request() {
        let adapter = perplexity_adapter(&ProviderOverrides::default());
        assert_eq!(adapter.provider_id(), ProviderId::Perplexity);

        let request = adapter.build_request("hi", &Credential::new("pplx-1"));
        assert_eq!(request.url, "https://api.perplexity.ai/chat/completions");
        assert_eq!(request.header("authorization"), Some("Bearer pplx-1"));
        assert_eq!(request.body["model"], "mixtral-8x7b-instruct");
        assert_eq!(request.body["messages"][0]["content"], "hi");
    }
}
