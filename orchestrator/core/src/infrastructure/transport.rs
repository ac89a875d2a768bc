// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Reqwest Transport
//!
//! Performs the HTTP call described by a [`RequestDescriptor`].
//!
//! # Architecture
//!
//! - **Layer:** Infrastructure
//! - **Purpose:** The only component in the crate that touches the network
//! - **Integration:** ProviderAdapter::send → ReqwestTransport → provider API (optionally via relay)

use crate::domain::llm::{HttpMethod, RequestDescriptor, Transport, TransportError, TransportResponse};
use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

#[derive(Clone)]
pub struct ReqwestTransport {
    client: Client,
    relay_prefix: Option<String>,
}

impl ReqwestTransport {
    pub fn new() -> Self {
        Self {
            client: Client::new(),
            relay_prefix: None,
        }
    }

    /// Route every request through `prefix` (e.g. a CORS relay), which is
    /// prepended verbatim to the provider endpoint
    pub fn with_relay_prefix(prefix: impl Into<String>) -> Self {
        let prefix = prefix.into();
        Self {
            client: Client::new(),
            relay_prefix: (!prefix.trim().is_empty()).then_some(prefix),
        }
    }

    /// Build from an optional prefix as found in configuration
    pub fn from_relay_prefix(prefix: Option<&str>) -> Self {
        match prefix {
            Some(prefix) => Self::with_relay_prefix(prefix),
            None => Self::new(),
        }
    }

    pub fn relay_prefix(&self) -> Option<&str> {
        self.relay_prefix.as_deref()
    }

    /// Final URL a descriptor is sent to
    pub fn target_url(&self, request: &RequestDescriptor) -> String {
        match &self.relay_prefix {
            Some(prefix) => format!("{}{}", prefix, request.url),
            None => request.url.clone(),
        }
    }
}

impl Default for ReqwestTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn call(&self, request: &RequestDescriptor) -> Result<TransportResponse, TransportError> {
        let url = self.target_url(request);

        let mut builder = match request.method {
            HttpMethod::Post => self.client.post(&url),
        };
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }

        let response = builder
            .json(&request.body)
            .send()
            .await
            .map_err(|e| TransportError::Send(e.to_string()))?;

        let status = response.status();
        debug!("{} {} -> {}", request.method.as_str(), url, status);

        let body = response
            .text()
            .await
            .map_err(|e| TransportError::Body(e.to_string()))?;

        Ok(TransportResponse::new(
            status.as_u16(),
            status.canonical_reason().unwrap_or_default(),
            body,
        ))
    }
}
