// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! # Duet CLI
//!
//! The `duet` binary talks to OpenAI, Anthropic, Perplexity, Grok and Groq
//! through the duet-core orchestrators.
//!
//! ## Commands
//!
//! - `duet providers` - List providers, models and credential status
//! - `duet chat [--provider ID]` - Interactive single-provider chat
//! - `duet converse [--agent-a ID] [--agent-b ID] [--rounds N]` - Two agents converse
//! - `duet keys set|list` - Manage stored API keys
//! - `duet config show|validate|generate` - Configuration management

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use std::path::PathBuf;

use duet_cli::commands::{self, ChatArgs, ConfigCommand, ConverseArgs, KeysCommand};

/// Duet - one interface for many LLM providers
#[derive(Parser)]
#[command(name = "duet")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Path to configuration file (overrides discovery)
    #[arg(
        short,
        long,
        global = true,
        env = "DUET_CONFIG_PATH",
        value_name = "FILE"
    )]
    config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true, env = "DUET_LOG_LEVEL", default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// List known providers
    #[command(name = "providers")]
    Providers,

    /// Chat with one provider
    #[command(name = "chat")]
    Chat(ChatArgs),

    /// Let two providers talk to each other
    #[command(name = "converse")]
    Converse(ConverseArgs),

    /// Manage API keys
    #[command(name = "keys")]
    Keys {
        #[command(subcommand)]
        command: KeysCommand,
    },

    /// Configuration management
    #[command(name = "config")]
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // A missing .env file is fine
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    init_logging(&cli.log_level)?;

    match cli.command {
        Some(Commands::Providers) => commands::providers::execute(cli.config).await,
        Some(Commands::Chat(args)) => commands::chat::execute(args, cli.config).await,
        Some(Commands::Converse(args)) => commands::converse::execute(args, cli.config).await,
        Some(Commands::Keys { command }) => commands::keys::handle_command(command, cli.config).await,
        Some(Commands::Config { command }) => {
            commands::config::handle_command(command, cli.config).await
        }
        None => {
            // No command provided - show help
            eprintln!("{}", "No command specified. Use --help for usage.".yellow());
            std::process::exit(1);
        }
    }
}

/// Initialize tracing subscriber for logging
fn init_logging(level: &str) -> Result<()> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .or_else(|_| tracing_subscriber::EnvFilter::try_new(level))
        .context("Failed to create log filter")?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .init();

    Ok(())
}
