// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Terminal rendering: notices on stderr, transcript lines on stdout

use colored::Colorize;
use duet_core::domain::notifier::{NoticeKind, Notifier};
use duet_core::domain::transcript::{Message, Speaker};

/// Notifier printing to stderr
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleNotifier;

impl ConsoleNotifier {
    pub fn new() -> Self {
        Self
    }
}

impl Notifier for ConsoleNotifier {
    fn show(&self, kind: NoticeKind, title: &str, message: &str) {
        match kind {
            NoticeKind::Info => eprintln!("{} {}", format!("{}:", title).green().bold(), message),
            NoticeKind::Error => eprintln!("{} {}", format!("{}:", title).red().bold(), message),
        }
    }
}

/// Speaker label shown in front of a transcript line
pub fn speaker_label(message: &Message) -> String {
    match (message.speaker, message.provider) {
        (Speaker::User, _) => "you".to_string(),
        (Speaker::Assistant, Some(provider)) => provider.display_name().to_string(),
        (Speaker::Assistant, None) => "assistant".to_string(),
    }
}

pub fn print_message(message: &Message) {
    let label = format!("{}>", speaker_label(message));
    let label = match message.speaker {
        Speaker::User => label.cyan().bold(),
        Speaker::Assistant => label.magenta().bold(),
    };
    println!("{} {}", label, message.text);
}

/// Last four characters of a key, the rest masked
pub fn mask_key(key: &str) -> String {
    let chars: Vec<char> = key.trim().chars().collect();
    if chars.len() <= 4 {
        return "*".repeat(chars.len());
    }
    let visible: String = chars[chars.len() - 4..].iter().collect();
    format!("{}{}", "*".repeat(chars.len() - 4), visible)
}
