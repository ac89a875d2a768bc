// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! Duet Core
//!
//! Talk to OpenAI, Anthropic, Perplexity, Grok and Groq through one call
//! contract, either one turn at a time or as two agents conversing.
//!
//! # Architecture
//!
//! - **Layer:** Core System
//! - **Purpose:** Provider adapters, error classification and the two
//!   conversation orchestrators. Credentials, notifications and HTTP are
//!   injected through the `SecretStore`, `Notifier` and `Transport` ports.

pub mod application;
pub mod domain;
pub mod infrastructure;

pub use domain::*;
