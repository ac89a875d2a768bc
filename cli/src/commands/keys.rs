// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! API key management commands
//!
//! Commands: set, list

use anyhow::{Context, Result};
use clap::Subcommand;
use colored::Colorize;
use std::path::PathBuf;

use duet_core::domain::credential::{Credential, SecretStore};
use duet_core::domain::notifier::{NoticeKind, Notifier};
use duet_core::domain::provider::ProviderId;
use duet_core::infrastructure::secret_store::EnvSecretStore;

use crate::console::{mask_key, ConsoleNotifier};
use crate::context::AppContext;

#[derive(Subcommand)]
pub enum KeysCommand {
    /// Store the API key for a provider
    Set {
        /// Provider id (openai, anthropic, perplexity, grok, groq)
        #[arg(value_name = "PROVIDER")]
        provider: String,

        /// Key value (prompted without echo when omitted)
        #[arg(value_name = "KEY")]
        key: Option<String>,
    },

    /// Show which providers have a key and where it comes from
    List,
}

pub async fn handle_command(command: KeysCommand, config_path: Option<PathBuf>) -> Result<()> {
    let ctx = AppContext::load(config_path)?;

    match command {
        KeysCommand::Set { provider, key } => set(&ctx, &provider, key),
        KeysCommand::List => list(&ctx),
    }
}

fn set(ctx: &AppContext, raw_provider: &str, key: Option<String>) -> Result<()> {
    let provider: ProviderId = raw_provider.parse()?;

    let key = match key {
        Some(key) => key,
        None => dialoguer::Password::new()
            .with_prompt(format!("{} API key", provider.display_name()))
            .interact()
            .context("Failed to read API key")?,
    };

    let credential = Credential::new(key.trim());
    if credential.is_blank() {
        anyhow::bail!("API key cannot be empty");
    }

    ctx.key_file
        .set(provider, credential)
        .with_context(|| format!("Failed to store key in {:?}", ctx.key_file.path()))?;

    ConsoleNotifier::new().show(
        NoticeKind::Info,
        "Saved",
        &format!("{} API key stored", provider.display_name()),
    );
    Ok(())
}

fn list(ctx: &AppContext) -> Result<()> {
    let stored = ctx.key_file.load()?;
    let env = EnvSecretStore::new();

    println!(
        "{} {}",
        "Key file:".bold(),
        ctx.key_file.path().display()
    );
    for id in ProviderId::ALL {
        let file_key = stored.get(&id).filter(|k| !k.trim().is_empty());
        let status = match (file_key, env.get(id)) {
            (Some(key), _) => format!("{} (key file)", mask_key(key)).green(),
            (None, Some(credential)) => format!(
                "{} (${})",
                mask_key(credential.expose()),
                EnvSecretStore::variable_for(id)
            )
            .green(),
            (None, None) => "not set".red(),
        };
        println!("  {:<12} {}", id.as_str().bold(), status);
    }

    Ok(())
}
