// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Command implementations for the Duet CLI

pub mod chat;
pub mod config;
pub mod converse;
pub mod keys;
pub mod providers;

pub use self::chat::ChatArgs;
pub use self::config::ConfigCommand;
pub use self::converse::ConverseArgs;
pub use self::keys::KeysCommand;
