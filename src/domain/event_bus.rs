//! Per-connection outbound queues for presence events.
//!
//! [`EventBus`] owns one bounded [`tokio::sync::mpsc`] queue per live
//! connection. The WebSocket task for a connection drains its receiver;
//! the presence service pushes [`Delivery`] values into the matching
//! senders. Delivery is fire-and-forget: a full or closed queue drops the
//! event for that recipient and never blocks the caller.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{RwLock, mpsc};

use super::presence_registry::Delivery;
use super::{ConnectionId, PresenceEvent};

/// Fan-out hub from connection identifiers to their outbound queues.
#[derive(Debug, Clone)]
pub struct EventBus {
    queues: Arc<RwLock<HashMap<ConnectionId, mpsc::Sender<PresenceEvent>>>>,
    capacity: usize,
}

impl EventBus {
    /// Creates an empty bus whose queues hold up to `capacity` events each
    /// (at least one).
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            queues: Arc::new(RwLock::new(HashMap::new())),
            capacity: capacity.max(1),
        }
    }

    /// Opens the outbound queue for a connection and returns its receiver.
    ///
    /// Registering an identifier twice replaces the earlier queue.
    pub async fn register(&self, connection_id: ConnectionId) -> mpsc::Receiver<PresenceEvent> {
        let (sender, receiver) = mpsc::channel(self.capacity);
        self.queues.write().await.insert(connection_id, sender);
        receiver
    }

    /// Closes the outbound queue for a connection.
    ///
    /// Returns `true` if a queue was registered.
    pub async fn unregister(&self, connection_id: ConnectionId) -> bool {
        self.queues.write().await.remove(&connection_id).is_some()
    }

    /// Enqueues the event for every recipient that still has a queue.
    ///
    /// Returns the number of recipients that accepted the event.
    pub async fn deliver(&self, delivery: Delivery) -> usize {
        let queues = self.queues.read().await;
        let mut accepted = 0;
        for recipient in &delivery.recipients {
            let Some(sender) = queues.get(recipient) else {
                tracing::debug!(connection_id = %recipient, "no outbound queue for recipient");
                continue;
            };
            match sender.try_send(delivery.event.clone()) {
                Ok(()) => accepted += 1,
                Err(mpsc::error::TrySendError::Full(event)) => {
                    tracing::warn!(
                        connection_id = %recipient,
                        event = event.event_name(),
                        "outbound queue full, event dropped"
                    );
                }
                Err(mpsc::error::TrySendError::Closed(_)) => {
                    tracing::debug!(connection_id = %recipient, "outbound queue closed");
                }
            }
        }
        accepted
    }

    /// Returns the number of open queues.
    pub async fn connection_count(&self) -> usize {
        self.queues.read().await.len()
    }
}
