// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Configuration management commands
//!
//! Commands: show, validate, generate

use anyhow::{Context, Result};
use clap::Subcommand;
use colored::Colorize;
use std::path::PathBuf;

use duet_core::domain::config::{ContentFormat, DuetConfigManifest, ProviderOverrides};
use duet_core::domain::provider::ProviderId;

#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration
    Show {
        /// Show config file paths checked
        #[arg(long)]
        paths: bool,
    },

    /// Validate configuration file
    Validate {
        /// Path to config file (default: discover)
        #[arg(value_name = "FILE")]
        file: Option<PathBuf>,
    },

    /// Generate sample configuration
    Generate {
        /// Output path (default: ./duet-config.yaml)
        #[arg(short, long, default_value = "./duet-config.yaml")]
        output: PathBuf,

        /// Include provider override examples
        #[arg(long)]
        examples: bool,
    },
}

pub async fn handle_command(command: ConfigCommand, config_override: Option<PathBuf>) -> Result<()> {
    match command {
        ConfigCommand::Show { paths } => show(config_override, paths).await,
        ConfigCommand::Validate { file } => validate(file.or(config_override)).await,
        ConfigCommand::Generate { output, examples } => generate(output, examples).await,
    }
}

async fn show(config_override: Option<PathBuf>, show_paths: bool) -> Result<()> {
    let config = DuetConfigManifest::load_or_default(config_override.clone())
        .context("Failed to load configuration")?;

    if show_paths {
        println!("{}", "Configuration discovery paths:".bold());
        if let Some(path) = &config_override {
            println!("  1. --config flag: {}", path.display());
        } else {
            println!("  1. --config flag: {}", "(not set)".dimmed());
        }
        println!(
            "  2. DUET_CONFIG_PATH: {}",
            std::env::var("DUET_CONFIG_PATH")
                .unwrap_or_else(|_| "(not set)".to_string())
                .dimmed()
        );
        println!("  3. ./duet-config.yaml");
        println!("  4. ~/.duet/config.yaml");
        println!("  5. /etc/duet/config.yaml");
        println!();
    }

    println!("{}", "Current configuration:".bold());
    println!();

    println!("{}", "Chat:".bold());
    println!("  Default provider: {}", config.spec.chat.default_provider);
    println!();

    let dual = &config.spec.dual_agent;
    println!("{}", "Dual agent:".bold());
    println!("  Agent A: {}", dual.agent_a);
    println!("  Agent B: {}", dual.agent_b);
    println!("  Rounds: {}", dual.total_rounds);
    println!();

    println!("{}", "Routing:".bold());
    println!(
        "  Relay prefix: {}",
        config
            .spec
            .routing
            .relay_prefix
            .as_deref()
            .unwrap_or("(direct)")
    );
    println!();

    if !config.spec.providers.is_empty() {
        println!("{}", "Provider overrides:".bold());
        for (id, overrides) in &config.spec.providers {
            println!("  {}", id.as_str().bold());
            if let Some(endpoint) = &overrides.endpoint {
                println!("    Endpoint: {}", endpoint);
            }
            if let Some(model) = &overrides.model {
                println!("    Model: {}", model);
            }
            if let Some(temperature) = overrides.temperature {
                println!("    Temperature: {}", temperature);
            }
            if let Some(max_tokens) = overrides.max_tokens {
                println!("    Max tokens: {}", max_tokens);
            }
        }
        println!();
    }

    Ok(())
}

async fn validate(config_path: Option<PathBuf>) -> Result<()> {
    println!("Validating configuration...");

    let config = DuetConfigManifest::load_or_default(config_path)
        .context("Failed to load configuration")?;

    config
        .validate()
        .context("Configuration validation failed")?;

    println!("{}", "✓ Configuration is valid".green());

    Ok(())
}

/// Default manifest, optionally with override examples filled in
pub fn sample_manifest(with_examples: bool) -> DuetConfigManifest {
    let mut manifest = DuetConfigManifest::default();
    if with_examples {
        manifest.spec.providers.insert(
            ProviderId::OpenAI,
            ProviderOverrides {
                model: Some("gpt-4o-mini".to_string()),
                temperature: Some(0.7),
                ..Default::default()
            },
        );
        manifest.spec.providers.insert(
            ProviderId::Anthropic,
            ProviderOverrides {
                max_tokens: Some(2048),
                content_format: Some(ContentFormat::Blocks),
                ..Default::default()
            },
        );
    }
    manifest
}

async fn generate(output: PathBuf, with_examples: bool) -> Result<()> {
    let sample = serde_yaml::to_string(&sample_manifest(with_examples))
        .context("Failed to serialize configuration")?;

    std::fs::write(&output, sample)
        .with_context(|| format!("Failed to write config to {:?}", output))?;

    println!(
        "{}",
        format!("✓ Configuration generated: {}", output.display()).green()
    );

    Ok(())
}
