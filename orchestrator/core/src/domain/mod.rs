// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! Domain
//!
//! Provider identity, credentials, transcripts, errors and the ports the
//! orchestrators depend on.
//!
//! # Architecture
//!
//! - **Layer:** Domain Layer
//! - **Purpose:** Vendor-neutral conversation model

pub mod classifier;
pub mod config;
pub mod credential;
pub mod error;
pub mod events;
pub mod llm;
pub mod notifier;
pub mod provider;
pub mod transcript;
