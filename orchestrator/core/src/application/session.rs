// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Session plumbing shared by both orchestrators
//!
//! [`SessionServices`] bundles the injected collaborators and runs a single
//! provider turn. `PendingGuard` clears an orchestrator's `pending` flag
//! when dropped, so every exit path (success, error, cancelled future)
//! leaves the session idle.

use crate::domain::credential::SecretStore;
use crate::domain::error::ConversationError;
use crate::domain::events::{ConversationEvent, SessionId};
use crate::domain::llm::Transport;
use crate::domain::notifier::{NoticeKind, Notifier};
use crate::domain::provider::ProviderId;
use crate::domain::transcript::Message;
use crate::infrastructure::event_bus::EventBus;
use crate::infrastructure::llm::ProviderRegistry;
use chrono::Utc;
use parking_lot::Mutex;
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, warn};

/// Title of every error notice
pub const ERROR_NOTICE_TITLE: &str = "Error";

/// Why an operation was a no-op
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, thiserror::Error)]
#[serde(rename_all = "snake_case")]
pub enum Rejection {
    #[error("A response is still pending")]
    TurnInFlight,

    #[error("Message is empty")]
    EmptyMessage,

    #[error("Both agents use the same provider")]
    IdenticalAgents,

    #[error("At least one round is required")]
    NoRounds,
}

/// Collaborators injected into an orchestrator
#[derive(Clone)]
pub struct SessionServices {
    pub registry: Arc<ProviderRegistry>,
    pub transport: Arc<dyn Transport>,
    pub secrets: Arc<dyn SecretStore>,
    pub notifier: Arc<dyn Notifier>,
    pub events: EventBus,
}

impl SessionServices {
    pub fn new(
        registry: Arc<ProviderRegistry>,
        transport: Arc<dyn Transport>,
        secrets: Arc<dyn SecretStore>,
        notifier: Arc<dyn Notifier>,
        events: EventBus,
    ) -> Self {
        Self {
            registry,
            transport,
            secrets,
            notifier,
            events,
        }
    }

    /// One request/response exchange with `provider`
    ///
    /// The credential is read fresh on every call; nothing reaches the
    /// transport when it is missing.
    pub(crate) async fn run_turn(&self, provider: ProviderId, text: &str) -> Result<String, ConversationError> {
        let credential = self
            .secrets
            .get(provider)
            .ok_or(ConversationError::MissingCredential { provider })?;

        let adapter = self
            .registry
            .get(provider)
            .ok_or_else(|| ConversationError::UnknownProvider {
                id: provider.to_string(),
            })?;

        debug!("Sending {} chars to {} ({})", text.len(), provider, adapter.model());
        adapter.send(self.transport.as_ref(), text, &credential).await
    }

    /// Surface a failed turn to the notifier and event subscribers
    pub(crate) fn report_failure(&self, session_id: SessionId, error: &ConversationError) {
        warn!("Turn failed ({:?}): {}", error.kind(), error);
        self.notifier
            .show(NoticeKind::Error, ERROR_NOTICE_TITLE, &error.to_string());
        self.events.publish(ConversationEvent::TurnFailed {
            session_id,
            provider: error.provider(),
            kind: error.kind(),
            message: error.to_string(),
            failed_at: Utc::now(),
        });
    }

    pub(crate) fn publish_appended(&self, session_id: SessionId, index: usize, message: &Message) {
        self.events.publish(ConversationEvent::MessageAppended {
            session_id,
            index,
            message: message.clone(),
        });
    }

    pub(crate) fn publish_pending(&self, session_id: SessionId, pending: bool) {
        self.events.publish(ConversationEvent::PendingChanged {
            session_id,
            pending,
            changed_at: Utc::now(),
        });
    }
}

/// Resets `pending` on drop
///
/// Must be created only after `pending` was set while holding the lock.
pub(crate) struct PendingGuard<'a, S> {
    state: &'a Mutex<S>,
    clear: fn(&mut S),
    services: &'a SessionServices,
    session_id: SessionId,
}

impl<'a, S> PendingGuard<'a, S> {
    pub(crate) fn new(
        state: &'a Mutex<S>,
        clear: fn(&mut S),
        services: &'a SessionServices,
        session_id: SessionId,
    ) -> Self {
        Self {
            state,
            clear,
            services,
            session_id,
        }
    }
}

impl<S> Drop for PendingGuard<'_, S> {
    fn drop(&mut self) {
        (self.clear)(&mut *self.state.lock());
        self.services.publish_pending(self.session_id, false);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::error::ErrorKind;
    use crate::domain::llm::{RequestDescriptor, TransportError, TransportResponse};
    use crate::infrastructure::notifier::TracingNotifier;
    use crate::infrastructure::secret_store::InMemorySecretStore;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingTransport {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl Transport for CountingTransport {
        async fn call(&self, _request: &RequestDescriptor) -> Result<TransportResponse, TransportError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(TransportResponse::new(
                200,
                "OK",
                r#"{"choices":[{"message":{"content":"pong"}}]}"#,
            ))
        }
    }

    fn services(secrets: InMemorySecretStore) -> (SessionServices, Arc<CountingTransport>) {
        let transport = Arc::new(CountingTransport {
            calls: AtomicUsize::new(0),
        });
        let services = SessionServices::new(
            Arc::new(ProviderRegistry::with_defaults()),
            transport.clone(),
            Arc::new(secrets),
            Arc::new(TracingNotifier::new()),
            EventBus::new(16),
        );
        (services, transport)
    }

    #[test]
    fn test_run_turn_requires_credential_before_sending() {
        let (services, transport) = services(InMemorySecretStore::new());

        let err = tokio_test::block_on(services.run_turn(ProviderId::OpenAI, "ping")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingCredential);
        assert_eq!(transport.calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_run_turn_returns_reply() {
        let secrets = InMemorySecretStore::with_credentials([(ProviderId::OpenAI, "sk-test")]);
        let (services, transport) = services(secrets);

        let reply = tokio_test::block_on(services.run_turn(ProviderId::OpenAI, "ping")).unwrap();
        assert_eq!(reply, "pong");
        assert_eq!(transport.calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_guard_clears_pending_and_publishes() {
        let (services, _) = services(InMemorySecretStore::new());
        let session_id = SessionId::new();
        let mut receiver = services.events.subscribe();
        let state = Mutex::new(true);

        {
            let _guard = PendingGuard::new(&state, |pending: &mut bool| *pending = false, &services, session_id);
            assert!(*state.lock());
        }

        assert!(!*state.lock());
        match receiver.try_recv().unwrap() {
            ConversationEvent::PendingChanged { pending, .. } => assert!(!pending),
            other => panic!("unexpected event: {:?}", other),
        }
    }
}
