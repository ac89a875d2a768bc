// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

use crate::domain::error::ErrorKind;
use crate::domain::provider::ProviderId;
use crate::domain::transcript::Message;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Identity of one orchestrator session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(pub Uuid);

impl SessionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// State changes published by the orchestrators
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ConversationEvent {
    MessageAppended {
        session_id: SessionId,
        /// Zero-based position in the transcript
        index: usize,
        message: Message,
    },
    PendingChanged {
        session_id: SessionId,
        pending: bool,
        changed_at: DateTime<Utc>,
    },
    TurnFailed {
        session_id: SessionId,
        provider: Option<ProviderId>,
        kind: ErrorKind,
        message: String,
        failed_at: DateTime<Utc>,
    },
    RoundCompleted {
        session_id: SessionId,
        round: u32,
        total_rounds: u32,
        completed_at: DateTime<Utc>,
    },
    TranscriptReset {
        session_id: SessionId,
        reset_at: DateTime<Utc>,
    },
}

impl ConversationEvent {
    pub fn session_id(&self) -> SessionId {
        match self {
            ConversationEvent::MessageAppended { session_id, .. }
            | ConversationEvent::PendingChanged { session_id, .. }
            | ConversationEvent::TurnFailed { session_id, .. }
            | ConversationEvent::RoundCompleted { session_id, .. }
            | ConversationEvent::TranscriptReset { session_id, .. } => *session_id,
        }
    }
}
