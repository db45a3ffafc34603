//! Outbound presence events.
//!
//! Every registry mutation yields zero or more [`PresenceEvent`]s, each
//! addressed to a set of connections. Events serialize directly into the
//! wire frame `{"event": <name>, "data": <payload>}`.

use serde::{Deserialize, Serialize};

use super::{ConnectionId, Position};

/// A connection with a known position, as clients see it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocatedUser {
    /// Connection the position belongs to.
    pub socket_id: ConnectionId,
    /// Latitude.
    pub lat: f64,
    /// Longitude.
    pub lng: f64,
    /// Display name.
    pub username: String,
}

impl LocatedUser {
    /// Builds the payload from a connection, its name and position.
    #[must_use]
    pub fn new(socket_id: ConnectionId, username: &str, position: Position) -> Self {
        Self {
            socket_id,
            lat: position.latitude,
            lng: position.longitude,
            username: username.to_string(),
        }
    }
}

/// Payload that names a single connection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SocketRef {
    /// Connection being referred to.
    pub socket_id: ConnectionId,
}

/// Server-to-client event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "camelCase")]
pub enum PresenceEvent {
    /// Tells a freshly accepted connection its own identifier.
    Connected(SocketRef),

    /// Snapshot of located room members, sent to a joining connection only.
    ExistingUsers(Vec<LocatedUser>),

    /// A member reported a new position; sent to the whole room.
    LocationUpdate(LocatedUser),

    /// A member left the room; sent to the remaining members.
    UserDisconnected(SocketRef),
}

impl PresenceEvent {
    /// Returns the wire event name.
    #[must_use]
    pub const fn event_name(&self) -> &'static str {
        match self {
            Self::Connected(_) => "connected",
            Self::ExistingUsers(_) => "existingUsers",
            Self::LocationUpdate(_) => "locationUpdate",
            Self::UserDisconnected(_) => "userDisconnected",
        }
    }
}
