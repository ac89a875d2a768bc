// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Single-turn Conversation Orchestrator
//!
//! Owns one linear transcript between the user and a selectable provider.
//!
//! # Turn lifecycle
//!
//! ```text
//! submit(text)
//!   ├─ pending or blank text ─────────────► Rejected (nothing changes)
//!   ├─ pending = true, append User message
//!   ├─ credential missing ────────────────► Err(MissingCredential)
//!   ├─ adapter.send ── failure ───────────► Err(..), no Assistant message
//!   └─ append Assistant message ──────────► Replied
//!   (pending = false on every exit path)
//! ```

use crate::application::session::{PendingGuard, Rejection, SessionServices};
use crate::domain::error::ConversationError;
use crate::domain::events::{ConversationEvent, SessionId};
use crate::domain::provider::ProviderId;
use crate::domain::transcript::{Message, Transcript};
use chrono::Utc;
use parking_lot::Mutex;
use serde::Serialize;
use tracing::info;

/// Result of a `submit` that did not fail
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    /// The assistant message appended for this turn
    Replied(Message),
    Rejected(Rejection),
}

/// Point-in-time copy of the orchestrator state
#[derive(Debug, Clone, Serialize)]
pub struct ChatSnapshot {
    pub session_id: SessionId,
    pub transcript: Transcript,
    pub pending: bool,
    pub selected_provider: ProviderId,
}

struct ChatState {
    transcript: Transcript,
    pending: bool,
    selected_provider: ProviderId,
}

fn clear_pending(state: &mut ChatState) {
    state.pending = false;
}

pub struct ConversationOrchestrator {
    session_id: SessionId,
    services: SessionServices,
    state: Mutex<ChatState>,
}

impl ConversationOrchestrator {
    pub fn new(services: SessionServices, provider: ProviderId) -> Self {
        Self {
            session_id: SessionId::new(),
            services,
            state: Mutex::new(ChatState {
                transcript: Transcript::new(),
                pending: false,
                selected_provider: provider,
            }),
        }
    }

    pub fn session_id(&self) -> SessionId {
        self.session_id
    }

    /// Send `text` to the selected provider and record both sides of the turn
    ///
    /// Surrounding whitespace is trimmed before the text is stored or sent.
    /// Failures are reported to the notifier and also returned.
    pub async fn submit(&self, text: &str) -> Result<SubmitOutcome, ConversationError> {
        let text = text.trim();
        let (provider, user_message, index) = {
            let mut state = self.state.lock();
            if state.pending {
                return Ok(SubmitOutcome::Rejected(Rejection::TurnInFlight));
            }
            if text.is_empty() {
                return Ok(SubmitOutcome::Rejected(Rejection::EmptyMessage));
            }

            state.pending = true;
            let message = Message::user(text);
            state.transcript.push(message.clone());
            (state.selected_provider, message, state.transcript.len() - 1)
        };
        let _pending = PendingGuard::new(&self.state, clear_pending, &self.services, self.session_id);

        self.services.publish_pending(self.session_id, true);
        self.services
            .publish_appended(self.session_id, index, &user_message);
        info!(
            "Turn started: provider={}, transcript_len={}",
            provider,
            index + 1
        );

        let reply = match self.services.run_turn(provider, text).await {
            Ok(reply) => reply,
            Err(e) => {
                self.services.report_failure(self.session_id, &e);
                return Err(e);
            }
        };

        let assistant = Message::assistant(provider, reply);
        let index = {
            let mut state = self.state.lock();
            state.transcript.push(assistant.clone());
            state.transcript.len() - 1
        };
        self.services
            .publish_appended(self.session_id, index, &assistant);
        info!("Turn completed: provider={}", provider);

        Ok(SubmitOutcome::Replied(assistant))
    }

    /// Takes effect on the next `submit`; earlier messages keep their tags
    pub fn select_provider(&self, provider: ProviderId) {
        let mut state = self.state.lock();
        if state.selected_provider != provider {
            info!("Selected provider: {} -> {}", state.selected_provider, provider);
            state.selected_provider = provider;
        }
    }

    /// Select by raw identifier such as `"anthropic"`
    pub fn select_provider_named(&self, raw: &str) -> Result<ProviderId, ConversationError> {
        let provider = self.services.registry.resolve(raw)?.provider_id();
        self.select_provider(provider);
        Ok(provider)
    }

    pub fn selected_provider(&self) -> ProviderId {
        self.state.lock().selected_provider
    }

    /// Discard the transcript; rejected while a turn is in flight
    pub fn reset(&self) -> Result<(), Rejection> {
        {
            let mut state = self.state.lock();
            if state.pending {
                return Err(Rejection::TurnInFlight);
            }
            state.transcript = Transcript::new();
        }
        self.services.events.publish(ConversationEvent::TranscriptReset {
            session_id: self.session_id,
            reset_at: Utc::now(),
        });
        Ok(())
    }

    pub fn is_pending(&self) -> bool {
        self.state.lock().pending
    }

    pub fn transcript(&self) -> Transcript {
        self.state.lock().transcript.clone()
    }

    pub fn snapshot(&self) -> ChatSnapshot {
        let state = self.state.lock();
        ChatSnapshot {
            session_id: self.session_id,
            transcript: state.transcript.clone(),
            pending: state.pending,
            selected_provider: state.selected_provider,
        }
    }
}
