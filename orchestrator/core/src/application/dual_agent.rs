// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Dual-Agent Orchestrator
//!
//! Two provider-backed agents talk to each other for a fixed number of rounds.
//! The transcript is seeded with the opening prompt attributed to agent A;
//! each round agent B answers the latest message, then agent A answers B.
//! A fully successful run leaves `1 + 2 * total_rounds` messages.

use crate::application::session::{PendingGuard, Rejection, SessionServices};
use crate::domain::config::DualAgentConfig;
use crate::domain::error::ConversationError;
use crate::domain::events::{ConversationEvent, SessionId};
use crate::domain::provider::ProviderId;
use crate::domain::transcript::{Message, Transcript};
use chrono::Utc;
use parking_lot::Mutex;
use serde::Serialize;
use tracing::info;

/// Result of a `start` that did not fail
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartOutcome {
    Completed { rounds: u32 },
    Rejected(Rejection),
}

#[derive(Debug, Clone, Serialize)]
pub struct DualAgentSnapshot {
    pub session_id: SessionId,
    pub transcript: Transcript,
    pub pending: bool,
    pub agent_a: ProviderId,
    pub agent_b: ProviderId,
    pub rounds_completed: u32,
    pub total_rounds: u32,
}

struct DualAgentState {
    transcript: Transcript,
    pending: bool,
    agent_a: ProviderId,
    agent_b: ProviderId,
    rounds_completed: u32,
    total_rounds: u32,
}

fn clear_pending(state: &mut DualAgentState) {
    state.pending = false;
}

pub struct DualAgentOrchestrator {
    session_id: SessionId,
    services: SessionServices,
    config: DualAgentConfig,
    state: Mutex<DualAgentState>,
}

impl DualAgentOrchestrator {
    /// Agents, round count and texts come from `config`
    pub fn new(services: SessionServices, config: DualAgentConfig) -> Self {
        let state = DualAgentState {
            transcript: Transcript::new(),
            pending: false,
            agent_a: config.agent_a,
            agent_b: config.agent_b,
            rounds_completed: 0,
            total_rounds: config.total_rounds,
        };
        Self {
            session_id: SessionId::new(),
            services,
            config,
            state: Mutex::new(state),
        }
    }

    pub fn session_id(&self) -> SessionId {
        self.session_id
    }

    /// Run the whole conversation
    ///
    /// The first failure stops the run; messages appended before it stay in
    /// the transcript.
    pub async fn start(&self) -> Result<StartOutcome, ConversationError> {
        let (agent_a, agent_b, total_rounds, seed) = {
            let mut state = self.state.lock();
            if state.pending {
                return Ok(StartOutcome::Rejected(Rejection::TurnInFlight));
            }
            if state.agent_a == state.agent_b {
                return Ok(StartOutcome::Rejected(Rejection::IdenticalAgents));
            }
            if state.total_rounds == 0 {
                return Ok(StartOutcome::Rejected(Rejection::NoRounds));
            }

            let seed = Message::assistant(state.agent_a, self.config.opening_prompt.clone());
            state.transcript = Transcript::seeded(seed.clone());
            state.rounds_completed = 0;
            state.pending = true;
            (state.agent_a, state.agent_b, state.total_rounds, seed)
        };
        let _pending = PendingGuard::new(&self.state, clear_pending, &self.services, self.session_id);

        self.services.publish_pending(self.session_id, true);
        self.services.events.publish(ConversationEvent::TranscriptReset {
            session_id: self.session_id,
            reset_at: Utc::now(),
        });
        self.services.publish_appended(self.session_id, 0, &seed);
        info!(
            "Dual-agent conversation started: agent_a={}, agent_b={}, rounds={}",
            agent_a, agent_b, total_rounds
        );

        let mut latest = seed.text;
        for round in 1..=total_rounds {
            for agent in [agent_b, agent_a] {
                latest = self.take_turn(agent, &latest).await?;
            }

            self.state.lock().rounds_completed = round;
            self.services.events.publish(ConversationEvent::RoundCompleted {
                session_id: self.session_id,
                round,
                total_rounds,
                completed_at: Utc::now(),
            });
            info!("Round {}/{} completed", round, total_rounds);
        }

        Ok(StartOutcome::Completed {
            rounds: total_rounds,
        })
    }

    /// Ask `agent` to answer `previous`, append and return its reply
    async fn take_turn(&self, agent: ProviderId, previous: &str) -> Result<String, ConversationError> {
        let instruction = self.config.render_instruction(previous);

        let reply = match self.services.run_turn(agent, &instruction).await {
            Ok(reply) => reply,
            Err(e) => {
                self.services.report_failure(self.session_id, &e);
                return Err(e);
            }
        };

        let message = Message::assistant(agent, reply.clone());
        let index = {
            let mut state = self.state.lock();
            state.transcript.push(message.clone());
            state.transcript.len() - 1
        };
        self.services.publish_appended(self.session_id, index, &message);

        Ok(reply)
    }

    /// Change both agents for the next `start`; ignored while running
    pub fn set_agents(&self, agent_a: ProviderId, agent_b: ProviderId) -> Result<(), Rejection> {
        let mut state = self.state.lock();
        if state.pending {
            return Err(Rejection::TurnInFlight);
        }
        state.agent_a = agent_a;
        state.agent_b = agent_b;
        Ok(())
    }

    pub fn set_total_rounds(&self, rounds: u32) -> Result<(), Rejection> {
        let mut state = self.state.lock();
        if state.pending {
            return Err(Rejection::TurnInFlight);
        }
        if rounds == 0 {
            return Err(Rejection::NoRounds);
        }
        state.total_rounds = rounds;
        Ok(())
    }

    /// Discard the transcript; rejected while a run is in flight
    pub fn reset(&self) -> Result<(), Rejection> {
        {
            let mut state = self.state.lock();
            if state.pending {
                return Err(Rejection::TurnInFlight);
            }
            state.transcript = Transcript::new();
            state.rounds_completed = 0;
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

    pub fn rounds_completed(&self) -> u32 {
        self.state.lock().rounds_completed
    }

    pub fn transcript(&self) -> Transcript {
        self.state.lock().transcript.clone()
    }

    pub fn snapshot(&self) -> DualAgentSnapshot {
        let state = self.state.lock();
        DualAgentSnapshot {
            session_id: self.session_id,
            transcript: state.transcript.clone(),
            pending: state.pending,
            agent_a: state.agent_a,
            agent_b: state.agent_b,
            rounds_completed: state.rounds_completed,
            total_rounds: state.total_rounds,
        }
    }
}
