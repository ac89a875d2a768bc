// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

// OpenAI LLM Provider Adapter
//
// Anti-Corruption Layer for the OpenAI chat completions API.
// Also serves the OpenAI-compatible providers (Perplexity, Grok, Groq); each of
// those supplies its own ChatCompletionsProfile.

use crate::domain::classifier::ErrorClassifier;
use crate::domain::config::ProviderOverrides;
use crate::domain::credential::Credential;
use crate::domain::error::ConversationError;
use crate::domain::llm::{ProviderAdapter, RequestDescriptor};
use crate::domain::provider::ProviderId;
use serde::{Deserialize, Serialize};

/// Provider-specific constants of a chat completions endpoint
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChatCompletionsProfile {
    pub provider: ProviderId,
    pub endpoint: &'static str,
    pub model: &'static str,
    pub temperature: Option<f64>,
    pub max_tokens: Option<u32>,
    /// Send `"stream": false` explicitly
    pub explicit_stream_flag: bool,
    /// Extra header carrying the credential next to the bearer token
    pub secondary_key_header: Option<&'static str>,
}

pub const OPENAI_PROFILE: ChatCompletionsProfile = ChatCompletionsProfile {
    provider: ProviderId::OpenAI,
    endpoint: "https://api.openai.com/v1/chat/completions",
    model: "gpt-3.5-turbo",
    temperature: None,
    max_tokens: None,
    explicit_stream_flag: false,
    secondary_key_header: None,
};

pub struct OpenAIAdapter {
    profile: ChatCompletionsProfile,
    endpoint: String,
    model: String,
    temperature: Option<f64>,
    max_tokens: Option<u32>,
}

#[derive(Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    stream: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f64>,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Deserialize)]
struct ChatChoiceMessage {
    content: Option<String>,
}

impl OpenAIAdapter {
    pub fn new(profile: ChatCompletionsProfile) -> Self {
        Self {
            profile,
            endpoint: profile.endpoint.to_string(),
            model: profile.model.to_string(),
            temperature: profile.temperature,
            max_tokens: profile.max_tokens,
        }
    }

    /// Profile constants with configured overrides applied on top
    pub fn with_overrides(profile: ChatCompletionsProfile, overrides: &ProviderOverrides) -> Self {
        let mut adapter = Self::new(profile);
        if let Some(endpoint) = &overrides.endpoint {
            adapter.endpoint = endpoint.clone();
        }
        if let Some(model) = &overrides.model {
            adapter.model = model.clone();
        }
        if overrides.temperature.is_some() {
            adapter.temperature = overrides.temperature;
        }
        if overrides.max_tokens.is_some() {
            adapter.max_tokens = overrides.max_tokens;
        }
        adapter
    }

    pub fn openai() -> Self {
        Self::new(OPENAI_PROFILE)
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl ProviderAdapter for OpenAIAdapter {
    fn provider_id(&self) -> ProviderId {
        self.profile.provider
    }

    fn model(&self) -> &str {
        &self.model
    }

    fn build_request(&self, text: &str, credential: &Credential) -> RequestDescriptor {
        let request = ChatCompletionRequest {
            model: &self.model,
            messages: vec![ChatMessage {
                role: "user",
                content: text,
            }],
            stream: self.profile.explicit_stream_flag.then_some(false),
            max_tokens: self.max_tokens,
            temperature: self.temperature,
        };

        let mut descriptor = RequestDescriptor::post(&self.endpoint, serde_json::json!(request))
            .with_header("Authorization", format!("Bearer {}", credential.expose()));
        if let Some(header) = self.profile.secondary_key_header {
            descriptor = descriptor.with_header(header, credential.expose());
        }
        descriptor
    }

    fn extract_text(&self, body: &str) -> Result<String, ConversationError> {
        let provider = self.provider_id();
        let response: ChatCompletionResponse = ErrorClassifier::parse_body(provider, body)?;

        let choice = response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| ErrorClassifier::malformed(provider, "response contained no choices"))?;

        choice
            .message
            .content
            .ok_or_else(|| ErrorClassifier::malformed(provider, "first choice has no message content"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::error::ErrorKind;
    use serde_json::json;

    #[test]
    fn test_build_request_openai() {
        let adapter = OpenAIAdapter::openai();
        let request = adapter.build_request("hi", &Credential::new("sk-test"));

        assert_eq!(request.url, "https://api.openai.com/v1/chat/completions");
        assert_eq!(request.header("Authorization"), Some("Bearer sk-test"));
        assert_eq!(request.header("Content-Type"), Some("application/json"));
        assert_eq!(
            request.body,
            json!({
                "model": "gpt-3.5-turbo",
                "messages": [{"role": "user", "content": "hi"}]
            })
        );
    }

    #[test]
    fn test_overrides_apply() {
        let overrides = ProviderOverrides {
            endpoint: Some("http://localhost:8080/v1/chat/completions".into()),
            model: Some("gpt-4o-mini".into()),
            temperature: Some(0.1),
            max_tokens: Some(64),
            ..Default::default()
        };
        let adapter = OpenAIAdapter::with_overrides(OPENAI_PROFILE, &overrides);
        let request = adapter.build_request("hi", &Credential::new("k"));

        assert_eq!(request.url, "http://localhost:8080/v1/chat/completions");
        assert_eq!(request.body["model"], "gpt-4o-mini");
        assert_eq!(request.body["max_tokens"], 64);
        assert_eq!(request.body["temperature"], serde_json::json!(0.1));
    }

    #[test]
    fn test_extract_text() {
        let adapter = OpenAIAdapter::openai();
        let body = r#"{"id":"x","choices":[{"index":0,"message":{"role":"assistant","content":"hello"},"finish_reason":"stop"}]}"#;
        assert_eq!(adapter.extract_text(body).unwrap(), "hello");
    }

    #[test]
    fn test_extract_text_malformed() {
        let adapter = OpenAIAdapter::openai();
        for body in [
            r#"{"choices":[]}"#,
            r#"{"choices":[{"message":{"role":"assistant","content":null}}]}"#,
            r#"{"content":[{"text":"wrong schema"}]}"#,
            "",
        ] {
            let err = adapter.extract_text(body).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::MalformedResponse, "body: {}", body);
        }
    }
}
