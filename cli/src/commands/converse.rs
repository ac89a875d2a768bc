// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! `duet converse` - two providers talk to each other
//!
//! Messages are printed as they are appended, by following the session's
//! events while the run is in flight.

use anyhow::Result;
use clap::Args;
use colored::Colorize;
use std::path::PathBuf;

use duet_core::application::{DualAgentOrchestrator, StartOutcome};
use duet_core::domain::config::DualAgentConfig;
use duet_core::domain::events::ConversationEvent;
use duet_core::domain::provider::ProviderId;

use crate::console::print_message;
use crate::context::AppContext;

#[derive(Args)]
pub struct ConverseArgs {
    /// Agent that opens the conversation
    #[arg(long, value_name = "ID")]
    pub agent_a: Option<String>,

    /// Agent that answers first
    #[arg(long, value_name = "ID")]
    pub agent_b: Option<String>,

    /// Number of rounds (each round is one reply from B and one from A)
    #[arg(short, long, value_name = "N")]
    pub rounds: Option<u32>,
}

/// Dual-agent settings with command-line values layered over the config
pub fn resolve_settings(args: &ConverseArgs, base: &DualAgentConfig) -> Result<DualAgentConfig> {
    let mut settings = base.clone();
    if let Some(raw) = &args.agent_a {
        settings.agent_a = raw.parse::<ProviderId>()?;
    }
    if let Some(raw) = &args.agent_b {
        settings.agent_b = raw.parse::<ProviderId>()?;
    }
    if let Some(rounds) = args.rounds {
        settings.total_rounds = rounds;
    }
    Ok(settings)
}

pub async fn execute(args: ConverseArgs, config_path: Option<PathBuf>) -> Result<()> {
    let ctx = AppContext::load(config_path)?;
    let settings = resolve_settings(&args, &ctx.config.spec.dual_agent)?;

    println!(
        "{} {} {} {} {}",
        "Conversation:".bold(),
        settings.agent_a.display_name().bold(),
        "and".dimmed(),
        settings.agent_b.display_name().bold(),
        format!("({} rounds)", settings.total_rounds).dimmed()
    );

    let duet = DualAgentOrchestrator::new(ctx.services(), settings);

    let mut receiver = ctx.events.subscribe_session(duet.session_id());
    let printer = tokio::spawn(async move {
        while let Ok(event) = receiver.recv().await {
            match event {
                ConversationEvent::MessageAppended { message, .. } => print_message(&message),
                ConversationEvent::RoundCompleted { round, total_rounds, .. } => {
                    println!("{}", format!("-- round {}/{} --", round, total_rounds).dimmed());
                }
                ConversationEvent::PendingChanged { pending: false, .. } => break,
                _ => {}
            }
        }
    });

    let outcome = duet.start().await;

    match &outcome {
        Ok(StartOutcome::Completed { .. }) | Err(_) => {
            let _ = printer.await;
        }
        Ok(StartOutcome::Rejected(reason)) => {
            printer.abort();
            anyhow::bail!("Conversation not started: {}", reason);
        }
    }

    let rounds = duet.rounds_completed();
    match outcome {
        Ok(_) => println!("{}", format!("✓ {} rounds completed", rounds).green()),
        // The error itself was already shown by the notifier
        Err(_) => {
            eprintln!(
                "{}",
                format!("Stopped after {} completed rounds", rounds).yellow()
            );
            std::process::exit(1);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(agent_a: Option<&str>, agent_b: Option<&str>, rounds: Option<u32>) -> ConverseArgs {
        ConverseArgs {
            agent_a: agent_a.map(str::to_string),
            agent_b: agent_b.map(str::to_string),
            rounds,
        }
    }

    #[test]
    fn test_config_values_are_defaults() {
        let base = DualAgentConfig::default();
        let settings = resolve_settings(&args(None, None, None), &base).unwrap();
        assert_eq!(settings.agent_a, ProviderId::OpenAI);
        assert_eq!(settings.agent_b, ProviderId::Anthropic);
        assert_eq!(settings.total_rounds, 3);
    }

    #[test]
    fn test_flags_override_config() {
        let base = DualAgentConfig::default();
        let settings = resolve_settings(&args(Some("groq"), Some("Grok"), Some(5)), &base).unwrap();
        assert_eq!(settings.agent_a, ProviderId::Groq);
        assert_eq!(settings.agent_b, ProviderId::Grok);
        assert_eq!(settings.total_rounds, 5);
        assert_eq!(settings.instruction_template, base.instruction_template);
    }

    #[test]
    fn test_unknown_agent_is_an_error() {
        let base = DualAgentConfig::default();
        assert!(resolve_settings(&args(Some("gemini"), None, None), &base).is_err());
    }
}
