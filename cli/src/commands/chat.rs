// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! `duet chat` - interactive single-provider conversation
//!
//! Lines starting with `/` are commands: `/provider ID`, `/reset`, `/quit`.

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use std::path::PathBuf;
use tokio::io::{AsyncBufReadExt, BufReader};

use duet_core::application::{ConversationOrchestrator, SubmitOutcome};
use duet_core::domain::provider::ProviderId;

use crate::console::print_message;
use crate::context::AppContext;

#[derive(Args)]
pub struct ChatArgs {
    /// Provider to start with (default: chat.default_provider from config)
    #[arg(short, long, value_name = "ID")]
    pub provider: Option<String>,
}

/// One line of user input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatInput {
    Message(String),
    SwitchProvider(String),
    Reset,
    Quit,
    Help,
    Unknown(String),
}

pub fn parse_input(line: &str) -> ChatInput {
    let trimmed = line.trim();
    let Some(command) = trimmed.strip_prefix('/') else {
        return ChatInput::Message(line.to_string());
    };

    let mut parts = command.splitn(2, char::is_whitespace);
    let name = parts.next().unwrap_or_default();
    let argument = parts.next().map(str::trim).unwrap_or_default();

    match name {
        "quit" | "exit" => ChatInput::Quit,
        "reset" => ChatInput::Reset,
        "help" => ChatInput::Help,
        "provider" => ChatInput::SwitchProvider(argument.to_string()),
        other => ChatInput::Unknown(other.to_string()),
    }
}

pub async fn execute(args: ChatArgs, config_path: Option<PathBuf>) -> Result<()> {
    let ctx = AppContext::load(config_path)?;

    let provider = match &args.provider {
        Some(raw) => raw.parse::<ProviderId>()?,
        None => ctx.config.spec.chat.default_provider,
    };
    let chat = ConversationOrchestrator::new(ctx.services(), provider);

    println!(
        "{} {} {}",
        "Chatting with".bold(),
        provider.display_name().bold(),
        "(/help for commands)".dimmed()
    );

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await.context("Failed to read stdin")? {
        match parse_input(&line) {
            ChatInput::Message(text) => match chat.submit(&text).await {
                Ok(SubmitOutcome::Replied(message)) => print_message(&message),
                Ok(SubmitOutcome::Rejected(_)) => {}
                // Already shown by the notifier
                Err(_) => {}
            },
            ChatInput::SwitchProvider(raw) => match chat.select_provider_named(&raw) {
                Ok(id) => println!("{} {}", "Now chatting with".bold(), id.display_name().bold()),
                Err(e) => eprintln!("{}", e.to_string().red()),
            },
            ChatInput::Reset => match chat.reset() {
                Ok(()) => println!("{}", "Conversation cleared".dimmed()),
                Err(e) => eprintln!("{}", e.to_string().yellow()),
            },
            ChatInput::Quit => break,
            ChatInput::Help => {
                println!("  /provider ID   switch provider ({})", provider_ids());
                println!("  /reset         clear the conversation");
                println!("  /quit          leave");
            }
            ChatInput::Unknown(name) => {
                eprintln!("{}", format!("Unknown command: /{}", name).yellow());
            }
        }
    }

    Ok(())
}

fn provider_ids() -> String {
    ProviderId::ALL
        .iter()
        .map(|id| id.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_commands() {
        assert_eq!(parse_input("/quit"), ChatInput::Quit);
        assert_eq!(parse_input("  /reset "), ChatInput::Reset);
        assert_eq!(
            parse_input("/provider  groq "),
            ChatInput::SwitchProvider("groq".into())
        );
        assert_eq!(parse_input("/provider"), ChatInput::SwitchProvider(String::new()));
        assert_eq!(parse_input("/nope"), ChatInput::Unknown("nope".into()));
    }

    #[test]
    fn test_parse_plain_message_is_kept_verbatim() {
        assert_eq!(
            parse_input("what is 2/3?"),
            ChatInput::Message("what is 2/3?".into())
        );
        assert_eq!(parse_input(""), ChatInput::Message(String::new()));
    }
}
