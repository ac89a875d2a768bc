// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

// Notifier port - how the core tells the user something happened.
// Rendering (toast, terminal line, log entry) belongs to the implementation.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeKind {
    Info,
    Error,
}

pub trait Notifier: Send + Sync {
    fn show(&self, kind: NoticeKind, title: &str, message: &str);
}
