// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

pub mod event_bus;
pub mod llm;
pub mod notifier;
pub mod secret_store;
pub mod transport;

pub use event_bus::EventBus;
pub use notifier::TracingNotifier;
pub use secret_store::{EnvSecretStore, FileSecretStore, InMemorySecretStore, LayeredSecretStore};
pub use transport::ReqwestTransport;
