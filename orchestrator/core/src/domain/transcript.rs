// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Messages and the append-only transcript

use crate::domain::provider::ProviderId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Speaker {
    User,
    Assistant,
}

/// One entry of a conversation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub text: String,
    pub speaker: Speaker,
    /// Set for assistant-authored messages, `None` for the user's own
    pub provider: Option<ProviderId>,
    pub created_at: DateTime<Utc>,
}

impl Message {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            speaker: Speaker::User,
            provider: None,
            created_at: Utc::now(),
        }
    }

    pub fn assistant(provider: ProviderId, text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            speaker: Speaker::Assistant,
            provider: Some(provider),
            created_at: Utc::now(),
        }
    }

    pub fn is_user(&self) -> bool {
        self.speaker == Speaker::User
    }
}

/// Ordered record of a session
///
/// Entries can only be appended. Starting over means replacing the whole
/// transcript, never editing it.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Transcript {
    messages: Vec<Message>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    /// Transcript holding a single seed message
    pub fn seeded(seed: Message) -> Self {
        Self {
            messages: vec![seed],
        }
    }

    pub fn push(&mut self, message: Message) {
        self.messages.push(message);
    }

    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Message> {
        self.messages.iter()
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Provider tags in order; `None` marks user messages
    pub fn provider_tags(&self) -> Vec<Option<ProviderId>> {
        self.messages.iter().map(|m| m.provider).collect()
    }
}

impl<'a> IntoIterator for &'a Transcript {
    type Item = &'a Message;
    type IntoIter = std::slice::Iter<'a, Message>;

    fn into_iter(self) -> Self::IntoIter {
        self.messages.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_append_preserves_order() {
        let mut transcript = Transcript::new();
        transcript.push(Message::user("hi"));
        transcript.push(Message::assistant(ProviderId::OpenAI, "hello"));

        assert_eq!(transcript.len(), 2);
        assert!(transcript.messages()[0].is_user());
        assert_eq!(transcript.last().unwrap().text, "hello");
        assert_eq!(
            transcript.provider_tags(),
            vec![None, Some(ProviderId::OpenAI)]
        );
    }

    #[test]
    fn test_seeded() {
        let transcript = Transcript::seeded(Message::assistant(ProviderId::Grok, "seed"));
        assert_eq!(transcript.len(), 1);
        assert_eq!(transcript.last().unwrap().provider, Some(ProviderId::Grok));
    }
}
