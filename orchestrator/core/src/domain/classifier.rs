// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Error Classifier
//!
//! Normalizes transport, HTTP and parse failures into [`ConversationError`]
//! without knowing anything about a particular vendor's schema beyond the
//! common `{"error": {"message": ...}}` family of error bodies.
//!
//! # Rules
//!
//! | Condition | Kind |
//! |---|---|
//! | transport failed, no status | `ProviderRequestFailed` (status `None`) |
//! | 2xx | none |
//! | 401 | `UnauthorizedCredential` |
//! | 403 | `AccessRestricted` |
//! | other non-2xx | `ProviderRequestFailed` (provider message, else status text) |
//! | 2xx without the expected text | `MalformedResponse` |

use crate::domain::error::{ConversationError, ACCESS_RESTRICTED_HINT};
use crate::domain::llm::TransportError;
use crate::domain::provider::ProviderId;
use serde::de::DeserializeOwned;
use serde_json::Value;

pub struct ErrorClassifier;

impl ErrorClassifier {
    pub fn classify_status(
        provider: ProviderId,
        status: u16,
        status_text: &str,
        body: &str,
    ) -> Option<ConversationError> {
        match status {
            200..=299 => None,
            401 => Some(ConversationError::UnauthorizedCredential { provider }),
            403 => Some(ConversationError::AccessRestricted {
                provider,
                hint: ACCESS_RESTRICTED_HINT.to_string(),
            }),
            _ => {
                let message = Self::provider_message(body).unwrap_or_else(|| {
                    if status_text.trim().is_empty() {
                        format!("HTTP {}", status)
                    } else {
                        status_text.trim().to_string()
                    }
                });
                Some(ConversationError::ProviderRequestFailed {
                    provider,
                    status: Some(status),
                    message,
                })
            }
        }
    }

    pub fn classify_transport(provider: ProviderId, error: &TransportError) -> ConversationError {
        ConversationError::ProviderRequestFailed {
            provider,
            status: None,
            message: error.to_string(),
        }
    }

    /// Error message a provider embedded in its error body, if any
    pub fn provider_message(body: &str) -> Option<String> {
        let value: Value = serde_json::from_str(body).ok()?;
        let candidates = [
            value.pointer("/error/message"),
            value.get("error"),
            value.get("message"),
            value.get("detail"),
        ];
        let found = candidates
            .into_iter()
            .flatten()
            .filter_map(Value::as_str)
            .map(str::trim)
            .find(|s| !s.is_empty())
            .map(str::to_string);
        found
    }

    /// Deserialize a successful body into the provider's response schema
    pub fn parse_body<T: DeserializeOwned>(provider: ProviderId, body: &str) -> Result<T, ConversationError> {
        serde_json::from_str(body).map_err(|e| Self::malformed(provider, format!("unexpected response shape: {}", e)))
    }

    pub fn malformed(provider: ProviderId, detail: impl Into<String>) -> ConversationError {
        ConversationError::MalformedResponse {
            provider,
            detail: detail.into(),
        }
    }
}
