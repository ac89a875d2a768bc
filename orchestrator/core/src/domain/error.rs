// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Conversation error taxonomy
//!
//! Every failure a turn can produce, regardless of which provider raised it.
//! Callers render these; the core only guarantees a stable [`ErrorKind`] and a
//! message.

use crate::domain::provider::ProviderId;
use serde::{Deserialize, Serialize};

/// Remediation shown when a provider (or a relay in front of it) answers 403
pub const ACCESS_RESTRICTED_HINT: &str = "Access to the provider endpoint was refused. \
If requests are routed through a relay, request access from its operator or route calls directly; \
otherwise check that your account is allowed to use this model.";

/// Stable classification of a [`ConversationError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    MissingCredential,
    UnknownProvider,
    UnauthorizedCredential,
    AccessRestricted,
    ProviderRequestFailed,
    MalformedResponse,
}

/// Errors raised by provider adapters and orchestrators
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConversationError {
    #[error("Please add your {} API key first", .provider.display_name())]
    MissingCredential { provider: ProviderId },

    #[error("Unknown provider: '{id}'")]
    UnknownProvider { id: String },

    #[error("{} rejected the API key (HTTP 401)", .provider.display_name())]
    UnauthorizedCredential { provider: ProviderId },

    #[error("{} access restricted (HTTP 403): {hint}", .provider.display_name())]
    AccessRestricted { provider: ProviderId, hint: String },

    #[error("Failed to get response from {}: {message}", .provider.display_name())]
    ProviderRequestFailed {
        provider: ProviderId,
        /// `None` when the transport failed before any HTTP status was seen
        status: Option<u16>,
        message: String,
    },

    #[error("Malformed response from {}: {detail}", .provider.display_name())]
    MalformedResponse { provider: ProviderId, detail: String },
}

impl ConversationError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ConversationError::MissingCredential { .. } => ErrorKind::MissingCredential,
            ConversationError::UnknownProvider { .. } => ErrorKind::UnknownProvider,
            ConversationError::UnauthorizedCredential { .. } => ErrorKind::UnauthorizedCredential,
            ConversationError::AccessRestricted { .. } => ErrorKind::AccessRestricted,
            ConversationError::ProviderRequestFailed { .. } => ErrorKind::ProviderRequestFailed,
            ConversationError::MalformedResponse { .. } => ErrorKind::MalformedResponse,
        }
    }

    /// Provider the error concerns, if it concerns a known one
    pub fn provider(&self) -> Option<ProviderId> {
        match self {
            ConversationError::UnknownProvider { .. } => None,
            ConversationError::MissingCredential { provider }
            | ConversationError::UnauthorizedCredential { provider }
            | ConversationError::AccessRestricted { provider, .. }
            | ConversationError::ProviderRequestFailed { provider, .. }
            | ConversationError::MalformedResponse { provider, .. } => Some(*provider),
        }
    }

    /// True for kinds that are detected before any network call
    pub fn is_precondition(&self) -> bool {
        matches!(
            self.kind(),
            ErrorKind::MissingCredential | ErrorKind::UnknownProvider
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_and_provider() {
        let err = ConversationError::AccessRestricted {
            provider: ProviderId::Grok,
            hint: ACCESS_RESTRICTED_HINT.to_string(),
        };
        assert_eq!(err.kind(), ErrorKind::AccessRestricted);
        assert_eq!(err.provider(), Some(ProviderId::Grok));
        assert!(!err.is_precondition());

        let err = ConversationError::UnknownProvider { id: "foo".into() };
        assert_eq!(err.provider(), None);
        assert!(err.is_precondition());
    }

    #[test]
    fn test_messages() {
        let err = ConversationError::MissingCredential {
            provider: ProviderId::Anthropic,
        };
        assert_eq!(err.to_string(), "Please add your Anthropic API key first");

        let err = ConversationError::ProviderRequestFailed {
            provider: ProviderId::Grok,
            status: Some(500),
            message: "model overloaded".into(),
        };
        assert_eq!(
            err.to_string(),
            "Failed to get response from Grok: model overloaded"
        );
    }

    #[test]
    fn test_kind_serializes_snake_case() {
        let json = serde_json::to_string(&ErrorKind::MalformedResponse).unwrap();
        assert_eq!(json, "\"malformed_response\"");
    }
}
