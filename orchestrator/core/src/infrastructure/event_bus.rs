// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

// Event Bus Implementation - Pub/Sub for Conversation Events
//
// In-memory event streaming using tokio broadcast channels. Orchestrators
// publish every state change here; a UI or the CLI subscribes to render it.
// Events are not persisted.

use crate::domain::events::{ConversationEvent, SessionId};
use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::{debug, warn};

/// Event bus for publishing and subscribing to conversation events
#[derive(Clone)]
pub struct EventBus {
    sender: Arc<broadcast::Sender<ConversationEvent>>,
}

impl EventBus {
    /// Create a new event bus with specified channel capacity
    /// Capacity determines how many events can be buffered before dropping old ones
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self {
            sender: Arc::new(sender),
        }
    }

    /// Create event bus with default capacity (1000)
    pub fn with_default_capacity() -> Self {
        Self::new(1000)
    }

    /// Publish an event to all subscribers
    pub fn publish(&self, event: ConversationEvent) {
        debug!("Publishing event: {:?}", event);

        // send() only fails when nobody is subscribed
        if self.sender.send(event).is_err() {
            debug!("No subscribers listening to event");
        }
    }

    /// Subscribe to all conversation events
    pub fn subscribe(&self) -> EventReceiver {
        EventReceiver {
            receiver: self.sender.subscribe(),
        }
    }

    /// Subscribe and filter for a single orchestrator session
    pub fn subscribe_session(&self, session_id: SessionId) -> SessionEventReceiver {
        SessionEventReceiver {
            receiver: self.sender.subscribe(),
            session_id,
        }
    }

    /// Get the number of active subscribers
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::with_default_capacity()
    }
}

fn map_recv_error(e: broadcast::error::RecvError) -> EventBusError {
    match e {
        broadcast::error::RecvError::Closed => EventBusError::Closed,
        broadcast::error::RecvError::Lagged(n) => {
            warn!("Event receiver lagged by {} events", n);
            EventBusError::Lagged(n)
        }
    }
}

fn map_try_recv_error(e: broadcast::error::TryRecvError) -> EventBusError {
    match e {
        broadcast::error::TryRecvError::Empty => EventBusError::Empty,
        broadcast::error::TryRecvError::Closed => EventBusError::Closed,
        broadcast::error::TryRecvError::Lagged(n) => {
            warn!("Event receiver lagged by {} events", n);
            EventBusError::Lagged(n)
        }
    }
}

/// Receiver for all conversation events
pub struct EventReceiver {
    receiver: broadcast::Receiver<ConversationEvent>,
}

impl EventReceiver {
    /// Receive the next event (waits until one is available)
    pub async fn recv(&mut self) -> Result<ConversationEvent, EventBusError> {
        self.receiver.recv().await.map_err(map_recv_error)
    }

    /// Try to receive an event without blocking
    pub fn try_recv(&mut self) -> Result<ConversationEvent, EventBusError> {
        self.receiver.try_recv().map_err(map_try_recv_error)
    }
}

/// Receiver for one session's events (filtered)
pub struct SessionEventReceiver {
    receiver: broadcast::Receiver<ConversationEvent>,
    session_id: SessionId,
}

impl SessionEventReceiver {
    /// Receive the next event for the subscribed session
    pub async fn recv(&mut self) -> Result<ConversationEvent, EventBusError> {
        loop {
            let event = self.receiver.recv().await.map_err(map_recv_error)?;
            if event.session_id() == self.session_id {
                return Ok(event);
            }
        }
    }

    /// Drain without blocking; `Empty` once nothing for this session is buffered
    pub fn try_recv(&mut self) -> Result<ConversationEvent, EventBusError> {
        loop {
            let event = self.receiver.try_recv().map_err(map_try_recv_error)?;
            if event.session_id() == self.session_id {
                return Ok(event);
            }
        }
    }
}

/// Errors that can occur when receiving events
#[derive(Debug, thiserror::Error)]
pub enum EventBusError {
    #[error("Event bus is closed")]
    Closed,

    #[error("No events available")]
    Empty,

    #[error("Receiver lagged by {0} events (events were dropped)")]
    Lagged(u64),
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn pending(session_id: SessionId, pending: bool) -> ConversationEvent {
        ConversationEvent::PendingChanged {
            session_id,
            pending,
            changed_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_event_bus_publish_subscribe() {
        let event_bus = EventBus::new(10);
        let mut receiver = event_bus.subscribe();
        let session_id = SessionId::new();

        event_bus.publish(pending(session_id, true));

        match receiver.recv().await.unwrap() {
            ConversationEvent::PendingChanged { session_id: id, pending, .. } => {
                assert_eq!(id, session_id);
                assert!(pending);
            }
            other => panic!("Wrong event type received: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_session_event_filtering() {
        let event_bus = EventBus::new(10);
        let session_id = SessionId::new();
        let other_session_id = SessionId::new();

        let mut receiver = event_bus.subscribe_session(session_id);

        event_bus.publish(ConversationEvent::TranscriptReset {
            session_id: other_session_id,
            reset_at: Utc::now(),
        });
        event_bus.publish(ConversationEvent::TranscriptReset {
            session_id,
            reset_at: Utc::now(),
        });

        let received = receiver.recv().await.unwrap();
        assert_eq!(received.session_id(), session_id);
        assert!(matches!(receiver.try_recv(), Err(EventBusError::Empty)));
    }

    #[tokio::test]
    async fn test_multiple_subscribers() {
        let event_bus = EventBus::new(10);
        let mut receiver1 = event_bus.subscribe();
        let mut receiver2 = event_bus.subscribe();

        assert_eq!(event_bus.subscriber_count(), 2);

        event_bus.publish(pending(SessionId::new(), false));

        // Both receivers should get the event
        let _ = receiver1.recv().await.unwrap();
        let _ = receiver2.recv().await.unwrap();
    }

    #[test]
    fn test_publish_without_subscribers_is_silent() {
        let event_bus = EventBus::default();
        event_bus.publish(pending(SessionId::new(), true));
        assert_eq!(event_bus.subscriber_count(), 0);
    }

    #[test]
    fn test_event_serializes_with_type_tag() {
        let json = serde_json::to_value(pending(SessionId::new(), true)).unwrap();
        assert_eq!(json["type"], "pending_changed");
        assert_eq!(json["pending"], true);
    }
}
