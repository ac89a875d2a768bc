// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

// Anthropic LLM Provider Adapter
//
// Anti-Corruption Layer for the Anthropic Messages API

use crate::domain::classifier::ErrorClassifier;
use crate::domain::config::{ContentFormat, ProviderOverrides};
use crate::domain::credential::Credential;
use crate::domain::error::ConversationError;
use crate::domain::llm::{ProviderAdapter, RequestDescriptor};
use crate::domain::provider::ProviderId;
use serde::{Deserialize, Serialize};

pub const ANTHROPIC_ENDPOINT: &str = "https://api.anthropic.com/v1/messages";
pub const ANTHROPIC_MODEL: &str = "claude-3-sonnet-20240229";
pub const ANTHROPIC_VERSION: &str = "2023-06-01";
pub const ANTHROPIC_MAX_TOKENS: u32 = 1024;

pub struct AnthropicAdapter {
    endpoint: String,
    model: String,
    version: String,
    max_tokens: u32,
    temperature: Option<f64>,
    content_format: ContentFormat,
}

#[derive(Serialize)]
struct AnthropicRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    messages: Vec<AnthropicMessage<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f64>,
}

#[derive(Serialize)]
struct AnthropicMessage<'a> {
    role: &'static str,
    content: AnthropicContent<'a>,
}

#[derive(Serialize)]
#[serde(untagged)]
enum AnthropicContent<'a> {
    Plain(&'a str),
    Blocks(Vec<AnthropicTextBlock<'a>>),
}

#[derive(Serialize)]
struct AnthropicTextBlock<'a> {
    #[serde(rename = "type")]
    block_type: &'static str,
    text: &'a str,
}

#[derive(Deserialize)]
struct AnthropicResponse {
    content: Vec<AnthropicResponseBlock>,
}

#[derive(Deserialize)]
struct AnthropicResponseBlock {
    text: Option<String>,
}

impl AnthropicAdapter {
    pub fn new() -> Self {
        Self {
            endpoint: ANTHROPIC_ENDPOINT.to_string(),
            model: ANTHROPIC_MODEL.to_string(),
            version: ANTHROPIC_VERSION.to_string(),
            max_tokens: ANTHROPIC_MAX_TOKENS,
            temperature: None,
            content_format: ContentFormat::Plain,
        }
    }

    pub fn with_overrides(overrides: &ProviderOverrides) -> Self {
        let mut adapter = Self::new();
        if let Some(endpoint) = &overrides.endpoint {
            adapter.endpoint = endpoint.clone();
        }
        if let Some(model) = &overrides.model {
            adapter.model = model.clone();
        }
        if let Some(version) = &overrides.anthropic_version {
            adapter.version = version.clone();
        }
        if let Some(max_tokens) = overrides.max_tokens {
            adapter.max_tokens = max_tokens;
        }
        if overrides.temperature.is_some() {
            adapter.temperature = overrides.temperature;
        }
        if let Some(format) = overrides.content_format {
            adapter.content_format = format;
        }
        adapter
    }
}

impl Default for AnthropicAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl ProviderAdapter for AnthropicAdapter {
    fn provider_id(&self) -> ProviderId {
        ProviderId::Anthropic
    }

    fn model(&self) -> &str {
        &self.model
    }

    fn build_request(&self, text: &str, credential: &Credential) -> RequestDescriptor {
        let content = match self.content_format {
            ContentFormat::Plain => AnthropicContent::Plain(text),
            ContentFormat::Blocks => AnthropicContent::Blocks(vec![AnthropicTextBlock {
                block_type: "text",
                text,
            }]),
        };

        let request = AnthropicRequest {
            model: &self.model,
            max_tokens: self.max_tokens,
            messages: vec![AnthropicMessage {
                role: "user",
                content,
            }],
            temperature: self.temperature,
        };

        RequestDescriptor::post(&self.endpoint, serde_json::json!(request))
            .with_header("x-api-key", credential.expose())
            .with_header("anthropic-version", &self.version)
    }

    fn extract_text(&self, body: &str) -> Result<String, ConversationError> {
        let response: AnthropicResponse = ErrorClassifier::parse_body(ProviderId::Anthropic, body)?;

        response
            .content
            .into_iter()
            .next()
            .ok_or_else(|| ErrorClassifier::malformed(ProviderId::Anthropic, "response contained no content blocks"))?
            .text
            .ok_or_else(|| ErrorClassifier::malformed(ProviderId::Anthropic, "first content block has no text"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::error::ErrorKind;
    use serde_json::json;

    #[test]
    fn test_build_request_plain() {
        let adapter = AnthropicAdapter::new();
        let request = adapter.build_request("hi", &Credential::new("sk-ant-1"));

        assert_eq!(request.url, ANTHROPIC_ENDPOINT);
        assert_eq!(request.header("x-api-key"), Some("sk-ant-1"));
        assert_eq!(request.header("anthropic-version"), Some("2023-06-01"));
        assert_eq!(request.header("Authorization"), None);
        assert_eq!(
            request.body,
            json!({
                "model": ANTHROPIC_MODEL,
                "max_tokens": 1024,
                "messages": [{"role": "user", "content": "hi"}]
            })
        );
    }

    #[test]
    fn test_build_request_blocks() {
        let adapter = AnthropicAdapter::with_overrides(&ProviderOverrides {
            content_format: Some(ContentFormat::Blocks),
            max_tokens: Some(256),
            ..Default::default()
        });
        let request = adapter.build_request("hi", &Credential::new("k"));

        assert_eq!(
            request.body["messages"][0]["content"],
            json!([{"type": "text", "text": "hi"}])
        );
        assert_eq!(request.body["max_tokens"], 256);
    }

    #[test]
    fn test_extract_text() {
        let adapter = AnthropicAdapter::new();
        let body = r#"{"id":"msg_1","type":"message","role":"assistant","content":[{"type":"text","text":"hello"}],"stop_reason":"end_turn"}"#;
        assert_eq!(adapter.extract_text(body).unwrap(), "hello");
    }

    #[test]
    fn test_extract_text_malformed() {
        let adapter = AnthropicAdapter::new();
        for body in [
            r#"{"content":[]}"#,
            r#"{"content":[{"type":"tool_use","id":"t1"}]}"#,
            r#"{"choices":[{"message":{"content":"wrong schema"}}]}"#,
        ] {
            let err = adapter.extract_text(body).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::MalformedResponse, "body: {}", body);
        }
    }
}
