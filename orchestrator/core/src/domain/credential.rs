// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

// Credentials and the SecretStore port
//
// The core only ever reads credentials. Where they live (memory, env, a file,
// an OS keychain) is decided by whoever implements SecretStore.

use crate::domain::provider::ProviderId;
use std::fmt;

/// Opaque API secret for exactly one provider
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    pub fn new(secret: impl Into<String>) -> Self {
        Self(secret.into())
    }

    /// Raw secret, for building auth headers only
    pub fn expose(&self) -> &str {
        &self.0
    }

    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(***)")
    }
}

impl From<&str> for Credential {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for Credential {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

/// Errors raised when persisting a credential
#[derive(Debug, thiserror::Error)]
pub enum SecretStoreError {
    #[error("Secret store is read-only")]
    ReadOnly,

    #[error("Secret store I/O failed: {0}")]
    Io(String),
}

/// Port for credential lookup and storage
///
/// `get` must treat blank secrets as absent.
pub trait SecretStore: Send + Sync {
    fn get(&self, provider: ProviderId) -> Option<Credential>;

    fn set(&self, provider: ProviderId, credential: Credential) -> Result<(), SecretStoreError>;

    /// Whether a usable credential exists for `provider`
    fn contains(&self, provider: ProviderId) -> bool {
        self.get(provider).is_some()
    }
}
