// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! Llm
//!
//! Provider adapter and transport ports.
//!
//! # Architecture
//!
//! - **Layer:** Domain Layer
//! - **Purpose:** Anti-corruption layer between the uniform `send` contract and
//!   each vendor's request/response schema

// Adapters live in infrastructure/llm/. Transports (the thing that actually
// performs HTTP) are injected, so adapters stay pure request builders and
// response parsers and can be exercised without a network.

use crate::domain::classifier::ErrorClassifier;
use crate::domain::credential::Credential;
use crate::domain::error::ConversationError;
use crate::domain::provider::ProviderId;
use async_trait::async_trait;
use serde::Serialize;
use std::fmt;
use tracing::debug;

/// Header names whose values are never printed
const SECRET_HEADERS: [&str; 3] = ["authorization", "x-api-key", "api-key"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum HttpMethod {
    Post,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Post => "POST",
        }
    }
}

/// Everything a transport needs to perform one provider call
#[derive(Clone, PartialEq)]
pub struct RequestDescriptor {
    pub method: HttpMethod,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: serde_json::Value,
}

impl RequestDescriptor {
    pub fn post(url: impl Into<String>, body: serde_json::Value) -> Self {
        Self {
            method: HttpMethod::Post,
            url: url.into(),
            headers: vec![("Content-Type".to_string(), "application/json".to_string())],
            body,
        }
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Case-insensitive header lookup
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

impl fmt::Debug for RequestDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let headers: Vec<(&str, &str)> = self
            .headers
            .iter()
            .map(|(k, v)| {
                let lower = k.to_ascii_lowercase();
                if SECRET_HEADERS.contains(&lower.as_str()) {
                    (k.as_str(), "***")
                } else {
                    (k.as_str(), v.as_str())
                }
            })
            .collect();
        f.debug_struct("RequestDescriptor")
            .field("method", &self.method)
            .field("url", &self.url)
            .field("headers", &headers)
            .field("body", &self.body)
            .finish()
    }
}

/// Raw outcome of a transport call, for any HTTP status
#[derive(Debug, Clone, PartialEq)]
pub struct TransportResponse {
    pub status: u16,
    /// Reason phrase (e.g. "Service Unavailable"); may be empty
    pub status_text: String,
    pub body: String,
}

impl TransportResponse {
    pub fn new(status: u16, status_text: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            status,
            status_text: status_text.into(),
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Failure to obtain any HTTP response at all
#[derive(Debug, Clone, thiserror::Error)]
pub enum TransportError {
    #[error("request could not be sent: {0}")]
    Send(String),

    #[error("response body could not be read: {0}")]
    Body(String),
}

/// Port performing the actual network call
#[async_trait]
pub trait Transport: Send + Sync {
    async fn call(&self, request: &RequestDescriptor) -> Result<TransportResponse, TransportError>;
}

/// Translation between the uniform `send` contract and one provider's schema
#[async_trait]
pub trait ProviderAdapter: Send + Sync {
    fn provider_id(&self) -> ProviderId;

    /// Model name sent with every request
    fn model(&self) -> &str;

    fn build_request(&self, text: &str, credential: &Credential) -> RequestDescriptor;

    /// Pull the assistant text out of a successful response body
    fn extract_text(&self, body: &str) -> Result<String, ConversationError>;

    /// `None` for 2xx statuses
    fn classify_status(
        &self,
        status: u16,
        status_text: &str,
        body: &str,
    ) -> Option<ConversationError> {
        ErrorClassifier::classify_status(self.provider_id(), status, status_text, body)
    }

    /// One complete turn: build, call, classify, extract
    async fn send(
        &self,
        transport: &dyn Transport,
        text: &str,
        credential: &Credential,
    ) -> Result<String, ConversationError> {
        let provider = self.provider_id();
        let request = self.build_request(text, credential);
        debug!(
            "Dispatching {} {} for provider {}",
            request.method.as_str(),
            request.url,
            provider
        );

        let response = transport
            .call(&request)
            .await
            .map_err(|e| ErrorClassifier::classify_transport(provider, &e))?;

        debug!("Provider {} answered HTTP {}", provider, response.status);

        if let Some(err) = self.classify_status(response.status, &response.status_text, &response.body) {
            return Err(err);
        }

        self.extract_text(&response.body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_descriptor_debug_redacts_secrets() {
        let request = RequestDescriptor::post("https://example.test", json!({}))
            .with_header("Authorization", "Bearer sk-secret")
            .with_header("x-api-key", "sk-other")
            .with_header("anthropic-version", "2023-06-01");

        let rendered = format!("{:?}", request);
        assert!(!rendered.contains("sk-secret"));
        assert!(!rendered.contains("sk-other"));
        assert!(rendered.contains("2023-06-01"));
    }

    #[test]
    fn test_header_lookup_is_case_insensitive() {
        let request = RequestDescriptor::post("https://example.test", json!({}));
        assert_eq!(request.header("content-type"), Some("application/json"));
        assert_eq!(request.header("authorization"), None);
    }

    #[test]
    fn test_response_success_range() {
        assert!(TransportResponse::new(200, "OK", "").is_success());
        assert!(TransportResponse::new(204, "", "").is_success());
        assert!(!TransportResponse::new(403, "Forbidden", "").is_success());
    }
}
