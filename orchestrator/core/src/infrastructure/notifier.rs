// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

// Headless Notifier - forwards notices to the tracing subscriber

use crate::domain::notifier::{NoticeKind, Notifier};
use tracing::{error, info};

#[derive(Debug, Default, Clone, Copy)]
pub struct TracingNotifier;

impl TracingNotifier {
    pub fn new() -> Self {
        Self
    }
}

impl Notifier for TracingNotifier {
    fn show(&self, kind: NoticeKind, title: &str, message: &str) {
        match kind {
            NoticeKind::Info => info!(title = %title, "{}", message),
            NoticeKind::Error => error!(title = %title, "{}", message),
        }
    }
}
