//! Presence service: applies join/update/disconnect and fans out events.

use tokio::sync::{Mutex, mpsc};

use crate::domain::presence_event::SocketRef;
use crate::domain::{
    ConnectionId, Delivery, EventBus, MemberSummary, Position, PresenceEvent, PresenceRegistry, RoomId,
    RoomSummary,
};
use crate::error::RelayError;

/// Orchestration layer for all presence operations.
///
/// Owns the [`PresenceRegistry`] exclusively and the [`EventBus`] used to
/// reach connections. Every mutation follows the pattern: acquire the
/// registry lock, mutate, enqueue the resulting deliveries, release. Since
/// enqueueing never waits on a slow client, holding the lock across it
/// keeps per-room delivery order identical to mutation order.
#[derive(Debug)]
pub struct PresenceService {
    registry: Mutex<PresenceRegistry>,
    event_bus: EventBus,
}

/// Point-in-time counters for the health endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PresenceStats {
    /// Open WebSocket connections.
    pub connections: usize,
    /// Connections that joined a room.
    pub joined: usize,
    /// Non-empty rooms.
    pub rooms: usize,
}

impl PresenceService {
    /// Creates a service with an empty registry.
    #[must_use]
    pub fn new(event_bus: EventBus) -> Self {
        Self {
            registry: Mutex::new(PresenceRegistry::new()),
            event_bus,
        }
    }

    /// Opens the outbound queue for a freshly accepted connection and
    /// queues the `connected` event carrying its identifier.
    ///
    /// The connection stays unregistered in the presence registry until
    /// it joins a room.
    pub async fn connect(&self, connection_id: ConnectionId) -> mpsc::Receiver<PresenceEvent> {
        let receiver = self.event_bus.register(connection_id).await;
        self.event_bus
            .deliver(Delivery::to_one(
                connection_id,
                PresenceEvent::Connected(SocketRef {
                    socket_id: connection_id,
                }),
            ))
            .await;
        tracing::info!(%connection_id, "client connected");
        receiver
    }

    /// Joins `connection_id` to `room_id` and sends it the room snapshot.
    pub async fn join_room(
        &self,
        connection_id: ConnectionId,
        room_id: RoomId,
        username: Option<String>,
    ) {
        let mut registry = self.registry.lock().await;
        let deliveries = registry.join(connection_id, room_id.clone(), username);
        for delivery in deliveries {
            self.event_bus.deliver(delivery).await;
        }

        let display_name = registry
            .get(connection_id)
            .map(|state| state.display_name.as_str())
            .unwrap_or_default();
        tracing::info!(%connection_id, %room_id, display_name, "joined room");
    }

    /// Stores a new position and broadcasts it to the connection's room.
    ///
    /// Returns `false` without side effects when the connection has not
    /// joined a room.
    pub async fn update_location(&self, connection_id: ConnectionId, position: Position) -> bool {
        let mut registry = self.registry.lock().await;
        let Some(delivery) = registry.update_location(connection_id, position) else {
            tracing::debug!(%connection_id, "location update before join ignored");
            return false;
        };
        let reached = self.event_bus.deliver(delivery).await;
        tracing::trace!(%connection_id, reached, "location broadcast");
        true
    }

    /// Removes a connection and notifies its former room.
    ///
    /// Safe to call more than once; returns `true` only for the call that
    /// actually removed a joined connection.
    pub async fn disconnect(&self, connection_id: ConnectionId) -> bool {
        let mut registry = self.registry.lock().await;
        let was_joined = registry.get(connection_id).is_some();
        if let Some(delivery) = registry.disconnect(connection_id) {
            self.event_bus.deliver(delivery).await;
        }
        drop(registry);

        self.event_bus.unregister(connection_id).await;
        if was_joined {
            tracing::info!(%connection_id, "client disconnected");
        }
        was_joined
    }

    /// Returns counts for every non-empty room.
    pub async fn rooms(&self) -> Vec<RoomSummary> {
        self.registry.lock().await.room_summaries()
    }

    /// Returns the members of a room in join order.
    ///
    /// # Errors
    ///
    /// Returns [`RelayError::RoomNotFound`] if nobody is in the room.
    pub async fn room_members(&self, room_id: &RoomId) -> Result<Vec<MemberSummary>, RelayError> {
        let members = self.registry.lock().await.member_summaries(room_id);
        if members.is_empty() {
            return Err(RelayError::RoomNotFound(room_id.to_string()));
        }
        Ok(members)
    }

    /// Returns connection, membership and room counters.
    pub async fn stats(&self) -> PresenceStats {
        let (joined, rooms) = {
            let registry = self.registry.lock().await;
            (registry.len(), registry.room_count())
        };
        PresenceStats {
            connections: self.event_bus.connection_count().await,
            joined,
            rooms,
        }
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::domain::presence_event::LocatedUser;

    fn room(name: &str) -> RoomId {
        let Ok(room) = RoomId::try_from(name) else {
            panic!("valid room id");
        };
        room
    }

    async fn next(rx: &mut mpsc::Receiver<PresenceEvent>) -> PresenceEvent {
        let Some(event) = rx.recv().await else {
            panic!("queue closed");
        };
        event
    }

    /// Connects and consumes the `connected` greeting.
    async fn open(service: &PresenceService, id: ConnectionId) -> mpsc::Receiver<PresenceEvent> {
        let mut rx = service.connect(id).await;
        assert_eq!(
            next(&mut rx).await,
            PresenceEvent::Connected(SocketRef { socket_id: id })
        );
        rx
    }

    #[tokio::test]
    async fn trip_scenario() {
        let service = PresenceService::new(EventBus::new(16));
        let (c1, c2, c3) = (ConnectionId::new(), ConnectionId::new(), ConnectionId::new());
        let mut rx1 = open(&service, c1).await;
        let mut rx2 = open(&service, c2).await;
        let mut rx3 = open(&service, c3).await;

        service
            .join_room(c1, room("trip-A"), Some("Raj".to_string()))
            .await;
        assert_eq!(next(&mut rx1).await, PresenceEvent::ExistingUsers(vec![]));

        service
            .join_room(c2, room("trip-A"), Some("Veer".to_string()))
            .await;
        assert_eq!(next(&mut rx2).await, PresenceEvent::ExistingUsers(vec![]));

        assert!(
            service
                .update_location(c1, Position::new(17.38, 78.48))
                .await
        );
        let raj = LocatedUser::new(c1, "Raj", Position::new(17.38, 78.48));
        assert_eq!(
            next(&mut rx1).await,
            PresenceEvent::LocationUpdate(raj.clone())
        );
        assert_eq!(
            next(&mut rx2).await,
            PresenceEvent::LocationUpdate(raj.clone())
        );

        service.join_room(c3, room("trip-A"), None).await;
        assert_eq!(
            next(&mut rx3).await,
            PresenceEvent::ExistingUsers(vec![raj])
        );

        assert!(service.disconnect(c1).await);
        let gone = PresenceEvent::UserDisconnected(SocketRef { socket_id: c1 });
        assert_eq!(next(&mut rx2).await, gone);
        assert_eq!(next(&mut rx3).await, gone);
        assert_eq!(rx1.recv().await, None);

        assert!(rx2.try_recv().is_err());
        assert!(rx3.try_recv().is_err());
    }

    #[tokio::test]
    async fn update_before_join_is_silent() {
        let service = PresenceService::new(EventBus::new(4));
        let c1 = ConnectionId::new();
        let mut rx = open(&service, c1).await;
        assert!(!service.update_location(c1, Position::new(1.0, 2.0)).await);
        assert!(rx.try_recv().is_err());
        assert_eq!(service.stats().await.joined, 0);
    }

    #[tokio::test]
    async fn disconnect_is_idempotent() {
        let service = PresenceService::new(EventBus::new(4));
        let (c1, c2) = (ConnectionId::new(), ConnectionId::new());
        let _rx1 = open(&service, c1).await;
        let mut rx2 = open(&service, c2).await;
        service.join_room(c1, room("trip-A"), None).await;
        service.join_room(c2, room("trip-A"), None).await;
        let _ = next(&mut rx2).await;

        assert!(service.disconnect(c1).await);
        assert!(!service.disconnect(c1).await);
        assert_eq!(
            next(&mut rx2).await,
            PresenceEvent::UserDisconnected(SocketRef { socket_id: c1 })
        );
        assert!(rx2.try_recv().is_err());
    }

    #[tokio::test]
    async fn disconnect_before_join_releases_queue() {
        let service = PresenceService::new(EventBus::new(4));
        let c1 = ConnectionId::new();
        let _rx = open(&service, c1).await;
        assert_eq!(service.stats().await.connections, 1);
        assert!(!service.disconnect(c1).await);
        assert_eq!(service.stats().await.connections, 0);
    }

    #[tokio::test]
    async fn room_members_of_empty_room_is_not_found() {
        let service = PresenceService::new(EventBus::new(4));
        let result = service.room_members(&room("ghost")).await;
        assert!(matches!(result, Err(RelayError::RoomNotFound(_))));
    }

    #[tokio::test]
    async fn stats_track_rooms() {
        let service = PresenceService::new(EventBus::new(4));
        let (c1, c2) = (ConnectionId::new(), ConnectionId::new());
        let _rx1 = open(&service, c1).await;
        let _rx2 = open(&service, c2).await;
        service.join_room(c1, room("a"), None).await;
        service.join_room(c2, room("b"), None).await;
        assert_eq!(
            service.stats().await,
            PresenceStats {
                connections: 2,
                joined: 2,
                rooms: 2,
            }
        );
        assert_eq!(service.rooms().await.len(), 2);
    }
}
