// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Secret Store Implementations
//!
//! Concrete [`SecretStore`]s: process memory, environment variables, a JSON
//! file in the user's home directory, and a layered store combining them.
//!
//! # Architecture
//!
//! - **Layer:** Infrastructure
//! - **Purpose:** Credential lookup and persistence for the orchestrators
//! - **Integration:** CLI `keys` command → FileSecretStore → `~/.duet/credentials.json`

use crate::domain::credential::{Credential, SecretStore, SecretStoreError};
use crate::domain::provider::ProviderId;
use anyhow::{Context, Result};
use parking_lot::RwLock;
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, warn};

// ============================================================================
// In-memory
// ============================================================================

/// Credentials held for the lifetime of the process
#[derive(Default)]
pub struct InMemorySecretStore {
    secrets: RwLock<HashMap<ProviderId, Credential>>,
}

impl InMemorySecretStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-populated with `(provider, secret)` pairs
    pub fn with_credentials<I, C>(entries: I) -> Self
    where
        I: IntoIterator<Item = (ProviderId, C)>,
        C: Into<Credential>,
    {
        let secrets = entries.into_iter().map(|(id, c)| (id, c.into())).collect();
        Self {
            secrets: RwLock::new(secrets),
        }
    }
}

impl SecretStore for InMemorySecretStore {
    fn get(&self, provider: ProviderId) -> Option<Credential> {
        self.secrets
            .read()
            .get(&provider)
            .filter(|c| !c.is_blank())
            .cloned()
    }

    fn set(&self, provider: ProviderId, credential: Credential) -> Result<(), SecretStoreError> {
        self.secrets.write().insert(provider, credential);
        Ok(())
    }
}

// ============================================================================
// Environment
// ============================================================================

/// Read-only store backed by the conventional `*_API_KEY` variables
#[derive(Debug, Default, Clone, Copy)]
pub struct EnvSecretStore;

impl EnvSecretStore {
    pub fn new() -> Self {
        Self
    }

    pub fn variable_for(provider: ProviderId) -> &'static str {
        match provider {
            ProviderId::OpenAI => "OPENAI_API_KEY",
            ProviderId::Anthropic => "ANTHROPIC_API_KEY",
            ProviderId::Perplexity => "PERPLEXITY_API_KEY",
            ProviderId::Grok => "XAI_API_KEY",
            ProviderId::Groq => "GROQ_API_KEY",
        }
    }
}

impl SecretStore for EnvSecretStore {
    fn get(&self, provider: ProviderId) -> Option<Credential> {
        std::env::var(Self::variable_for(provider))
            .ok()
            .map(Credential::new)
            .filter(|c| !c.is_blank())
    }

    fn set(&self, _provider: ProviderId, _credential: Credential) -> Result<(), SecretStoreError> {
        Err(SecretStoreError::ReadOnly)
    }
}

// ============================================================================
// JSON file
// ============================================================================

/// Store persisting a `{ "<provider id>": "<key>" }` JSON object
///
/// The file is re-read on every lookup so keys written by another process
/// are picked up without restarting.
pub struct FileSecretStore {
    path: PathBuf,
    write_lock: RwLock<()>,
}

impl FileSecretStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: RwLock::new(()),
        }
    }

    /// `~/.duet/credentials.json`
    pub fn default_path() -> PathBuf {
        let home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
        home.join(".duet").join("credentials.json")
    }

    pub fn at_default_path() -> Self {
        Self::new(Self::default_path())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Every stored entry, blank ones included
    pub fn load(&self) -> Result<BTreeMap<ProviderId, String>> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }

        let content = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read credentials file: {:?}", self.path))?;
        if content.trim().is_empty() {
            return Ok(BTreeMap::new());
        }

        let entries = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse credentials file: {:?}", self.path))?;
        Ok(entries)
    }

    fn save(&self, entries: &BTreeMap<ProviderId, String>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).context("Failed to create credentials directory")?;
            }
        }

        let content = serde_json::to_string_pretty(entries).context("Failed to serialize credentials")?;
        write_private(&self.path, content.as_bytes())
    }
}

/// Write `contents` to a file readable only by the owner
///
/// A new file is created with mode 0600; an existing one keeps its inode and
/// is narrowed to 0600 before the keys are written.
#[cfg(unix)]
fn write_private(path: &Path, contents: &[u8]) -> Result<()> {
    use std::io::Write;
    use std::os::unix::fs::{OpenOptionsExt, PermissionsExt};

    let file = fs::OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .mode(0o600)
        .open(path)
        .with_context(|| format!("Failed to write credentials file: {:?}", path))?;
    file.set_permissions(fs::Permissions::from_mode(0o600))
        .with_context(|| format!("Failed to restrict permissions on {:?}", path))?;

    let mut writer = std::io::BufWriter::new(file);
    writer
        .write_all(contents)
        .with_context(|| format!("Failed to write credentials file: {:?}", path))?;
    let file = writer
        .into_inner()
        .map_err(|e| anyhow::anyhow!("Failed to flush credentials file: {}", e))?;
    file.sync_all()
        .with_context(|| format!("Failed to sync credentials file: {:?}", path))
}

#[cfg(not(unix))]
fn write_private(path: &Path, contents: &[u8]) -> Result<()> {
    fs::write(path, contents).with_context(|| format!("Failed to write credentials file: {:?}", path))
}

impl SecretStore for FileSecretStore {
    fn get(&self, provider: ProviderId) -> Option<Credential> {
        let _guard = self.write_lock.read();
        match self.load() {
            Ok(entries) => entries
                .get(&provider)
                .map(|s| Credential::new(s.as_str()))
                .filter(|c| !c.is_blank()),
            Err(e) => {
                warn!("Ignoring unreadable credentials file: {:#}", e);
                None
            }
        }
    }

    fn set(&self, provider: ProviderId, credential: Credential) -> Result<(), SecretStoreError> {
        let _guard = self.write_lock.write();
        let mut entries = self.load().map_err(|e| SecretStoreError::Io(format!("{:#}", e)))?;
        entries.insert(provider, credential.expose().to_string());
        self.save(&entries)
            .map_err(|e| SecretStoreError::Io(format!("{:#}", e)))?;
        debug!("Stored credential for {} in {:?}", provider, self.path);
        Ok(())
    }
}

// ============================================================================
// Layered
// ============================================================================

/// Reads through stores in order; writes go to the first one
pub struct LayeredSecretStore {
    layers: Vec<Arc<dyn SecretStore>>,
}

impl LayeredSecretStore {
    pub fn new(layers: Vec<Arc<dyn SecretStore>>) -> Self {
        Self { layers }
    }
}

impl SecretStore for LayeredSecretStore {
    fn get(&self, provider: ProviderId) -> Option<Credential> {
        self.layers.iter().find_map(|layer| layer.get(provider))
    }

    fn set(&self, provider: ProviderId, credential: Credential) -> Result<(), SecretStoreError> {
        match self.layers.first() {
            Some(layer) => layer.set(provider, credential),
            None => Err(SecretStoreError::ReadOnly),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_in_memory_treats_blank_as_absent() {
        let store = InMemorySecretStore::with_credentials([(ProviderId::OpenAI, "  ")]);
        assert!(store.get(ProviderId::OpenAI).is_none());

        store.set(ProviderId::OpenAI, Credential::new("sk-1")).unwrap();
        assert_eq!(store.get(ProviderId::OpenAI).unwrap().expose(), "sk-1");
        assert!(!store.contains(ProviderId::Groq));
    }

    #[test]
    fn test_env_store_is_read_only() {
        let store = EnvSecretStore::new();
        assert!(matches!(
            store.set(ProviderId::Groq, Credential::new("k")),
            Err(SecretStoreError::ReadOnly)
        ));
        assert_eq!(EnvSecretStore::variable_for(ProviderId::Grok), "XAI_API_KEY");
    }

    #[test]
    fn test_file_store_roundtrip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("credentials.json");
        let store = FileSecretStore::new(&path);

        assert!(store.get(ProviderId::Anthropic).is_none());

        store.set(ProviderId::Anthropic, Credential::new("sk-ant")).unwrap();
        store.set(ProviderId::Groq, Credential::new("gsk")).unwrap();

        let reopened = FileSecretStore::new(&path);
        assert_eq!(reopened.get(ProviderId::Anthropic).unwrap().expose(), "sk-ant");
        assert_eq!(reopened.get(ProviderId::Groq).unwrap().expose(), "gsk");

        let raw: serde_json::Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(raw["anthropic"], "sk-ant");
    }

    #[cfg(unix)]
    #[test]
    fn test_new_file_is_created_owner_only() {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().unwrap();
        let path = dir.path().join("credentials.json");

        write_private(&path, b"{}").unwrap();
        let mode = fs::metadata(&path).unwrap().permissions().mode() & 0o777;
        assert_eq!(mode, 0o600);

        let store = FileSecretStore::new(dir.path().join("fresh.json"));
        store.set(ProviderId::OpenAI, Credential::new("sk-1")).unwrap();
        let mode = fs::metadata(store.path()).unwrap().permissions().mode() & 0o777;
        assert_eq!(mode, 0o600);
    }

    #[cfg(unix)]
    #[test]
    fn test_existing_file_is_narrowed_to_owner_only() {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().unwrap();
        let path = dir.path().join("credentials.json");
        fs::write(&path, "{}").unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o644)).unwrap();

        let store = FileSecretStore::new(&path);
        store.set(ProviderId::Groq, Credential::new("gsk")).unwrap();

        let mode = fs::metadata(&path).unwrap().permissions().mode() & 0o777;
        assert_eq!(mode, 0o600);
        assert_eq!(store.get(ProviderId::Groq).unwrap().expose(), "gsk");
    }

    #[test]
    fn test_file_store_ignores_garbage() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("credentials.json");
        fs::write(&path, "not json").unwrap();

        let store = FileSecretStore::new(&path);
        assert!(store.get(ProviderId::OpenAI).is_none());
        assert!(matches!(
            store.set(ProviderId::OpenAI, Credential::new("k")),
            Err(SecretStoreError::Io(_))
        ));
    }

    #[test]
    fn test_layered_reads_in_order_and_writes_first() {
        let front = Arc::new(InMemorySecretStore::new());
        let back = Arc::new(InMemorySecretStore::with_credentials([
            (ProviderId::OpenAI, "from-back"),
            (ProviderId::Groq, "groq-back"),
        ]));
        let layers: Vec<Arc<dyn SecretStore>> = vec![front.clone(), back.clone()];
        let layered = LayeredSecretStore::new(layers);

        assert_eq!(layered.get(ProviderId::OpenAI).unwrap().expose(), "from-back");

        layered.set(ProviderId::OpenAI, Credential::new("from-front")).unwrap();
        assert_eq!(layered.get(ProviderId::OpenAI).unwrap().expose(), "from-front");
        assert_eq!(front.get(ProviderId::OpenAI).unwrap().expose(), "from-front");
        assert_eq!(back.get(ProviderId::OpenAI).unwrap().expose(), "from-back");

        let empty = LayeredSecretStore::new(vec![]);
        assert!(empty.get(ProviderId::Groq).is_none());
        assert!(empty.set(ProviderId::Groq, Credential::new("k")).is_err());
    }
}
