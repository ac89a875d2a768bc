// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

// Test doubles shared by the orchestrator integration tests

#![allow(dead_code)]

use async_trait::async_trait;
use duet_core::application::SessionServices;
use duet_core::domain::credential::SecretStore;
use duet_core::domain::llm::{RequestDescriptor, Transport, TransportError, TransportResponse};
use duet_core::domain::notifier::{NoticeKind, Notifier};
use duet_core::domain::provider::ProviderId;
use duet_core::infrastructure::event_bus::EventBus;
use duet_core::infrastructure::llm::ProviderRegistry;
use duet_core::infrastructure::secret_store::InMemorySecretStore;
use serde_json::json;
use std::sync::{Arc, Mutex};
use tokio::sync::Semaphore;

type Responder = dyn Fn(&RequestDescriptor, usize) -> Result<TransportResponse, TransportError> + Send + Sync;

/// Transport answering from a closure and recording every request
pub struct ScriptedTransport {
    responder: Box<Responder>,
    requests: Mutex<Vec<RequestDescriptor>>,
    gate: Option<Arc<Semaphore>>,
}

impl ScriptedTransport {
    pub fn new<F>(responder: F) -> Self
    where
        F: Fn(&RequestDescriptor, usize) -> Result<TransportResponse, TransportError> + Send + Sync + 'static,
    {
        Self {
            responder: Box::new(responder),
            requests: Mutex::new(Vec::new()),
            gate: None,
        }
    }

    /// Always answers `status` with `body`
    pub fn fixed(status: u16, status_text: &'static str, body: impl Into<String>) -> Self {
        let body = body.into();
        Self::new(move |_, _| Ok(TransportResponse::new(status, status_text, body.clone())))
    }

    /// Answers every call in the matching provider's schema with "reply N"
    pub fn echo_by_provider() -> Self {
        Self::new(|request, n| {
            let text = format!("reply {}", n + 1);
            let body = if request.url.contains("anthropic") {
                anthropic_body(&text)
            } else {
                chat_completion_body(&text)
            };
            Ok(TransportResponse::new(200, "OK", body))
        })
    }

    /// Every call waits for a permit on the returned semaphore
    pub fn gated(mut self) -> (Self, Arc<Semaphore>) {
        let gate = Arc::new(Semaphore::new(0));
        self.gate = Some(gate.clone());
        (self, gate)
    }

    pub fn requests(&self) -> Vec<RequestDescriptor> {
        self.requests.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn call(&self, request: &RequestDescriptor) -> Result<TransportResponse, TransportError> {
        let n = {
            let mut requests = self.requests.lock().unwrap();
            requests.push(request.clone());
            requests.len() - 1
        };

        if let Some(gate) = &self.gate {
            let permit = gate.acquire().await.map_err(|e| TransportError::Send(e.to_string()))?;
            permit.forget();
        }

        (self.responder)(request, n)
    }
}

/// Notifier keeping every notice it was shown
#[derive(Default)]
pub struct RecordingNotifier {
    notices: Mutex<Vec<(NoticeKind, String, String)>>,
}

impl RecordingNotifier {
    pub fn notices(&self) -> Vec<(NoticeKind, String, String)> {
        self.notices.lock().unwrap().clone()
    }

    pub fn errors(&self) -> Vec<String> {
        self.notices()
            .into_iter()
            .filter(|(kind, _, _)| *kind == NoticeKind::Error)
            .map(|(_, _, message)| message)
            .collect()
    }
}

impl Notifier for RecordingNotifier {
    fn show(&self, kind: NoticeKind, title: &str, message: &str) {
        self.notices
            .lock()
            .unwrap()
            .push((kind, title.to_string(), message.to_string()));
    }
}

pub fn chat_completion_body(text: &str) -> String {
    json!({
        "id": "chatcmpl-1",
        "object": "chat.completion",
        "choices": [{"index": 0, "message": {"role": "assistant", "content": text}, "finish_reason": "stop"}]
    })
    .to_string()
}

pub fn anthropic_body(text: &str) -> String {
    json!({
        "id": "msg_1",
        "type": "message",
        "role": "assistant",
        "content": [{"type": "text", "text": text}],
        "stop_reason": "end_turn"
    })
    .to_string()
}

/// Wired collaborators plus handles on the doubles
pub struct Harness {
    pub services: SessionServices,
    pub transport: Arc<ScriptedTransport>,
    pub notifier: Arc<RecordingNotifier>,
    pub secrets: Arc<InMemorySecretStore>,
    pub events: EventBus,
}

impl Harness {
    pub fn new(transport: ScriptedTransport, keys: &[ProviderId]) -> Self {
        let transport = Arc::new(transport);
        let notifier = Arc::new(RecordingNotifier::default());
        let secrets = Arc::new(InMemorySecretStore::with_credentials(
            keys.iter().map(|id| (*id, format!("key-{}", id))),
        ));
        let events = EventBus::new(100);
        let secret_store: Arc<dyn SecretStore> = secrets.clone();

        let services = SessionServices::new(
            Arc::new(ProviderRegistry::with_defaults()),
            transport.clone(),
            secret_store,
            notifier.clone(),
            events.clone(),
        );

        Self {
            services,
            transport,
            notifier,
            secrets,
            events,
        }
    }
}
