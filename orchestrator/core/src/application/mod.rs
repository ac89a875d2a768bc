// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

pub mod chat;
pub mod dual_agent;
pub mod session;

pub use chat::{ChatSnapshot, ConversationOrchestrator, SubmitOutcome};
pub use dual_agent::{DualAgentOrchestrator, DualAgentSnapshot, StartOutcome};
pub use session::{Rejection, SessionServices, ERROR_NOTICE_TITLE};
