//! Per-connection presence record.

use chrono::{DateTime, Utc};

use super::{ConnectionId, RoomId};

/// Latest reported coordinates of a connection.
///
/// No range validation is applied; out-of-bounds values are relayed as-is.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Position {
    /// Latitude in decimal degrees.
    pub latitude: f64,
    /// Longitude in decimal degrees.
    pub longitude: f64,
}

impl Position {
    /// Creates a position from a latitude/longitude pair.
    #[must_use]
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

/// State the registry keeps for every joined connection.
///
/// Created (or overwritten) by `joinRoom`; `position` stays `None` until the
/// first accepted `updateLocation`.
#[derive(Debug, Clone)]
pub struct UserState {
    /// Name shown next to the marker on other clients' maps.
    pub display_name: String,

    /// Room this connection currently belongs to.
    pub room_id: RoomId,

    /// Last known position, if any.
    pub position: Option<Position>,

    /// Registry-wide join counter value, used to order room snapshots.
    pub join_seq: u64,

    /// When the connection (re-)joined its room.
    pub joined_at: DateTime<Utc>,

    /// When the position was last updated.
    pub updated_at: Option<DateTime<Utc>>,
}

impl UserState {
    /// Creates a fresh entry with no known position.
    ///
    /// An absent or empty `username` falls back to
    /// [`ConnectionId::fallback_display_name`].
    #[must_use]
    pub fn new(
        connection_id: ConnectionId,
        room_id: RoomId,
        username: Option<String>,
        join_seq: u64,
    ) -> Self {
        let display_name = username
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| connection_id.fallback_display_name());
        Self {
            display_name,
            room_id,
            position: None,
            join_seq,
            joined_at: Utc::now(),
            updated_at: None,
        }
    }

    /// Records a new position.
    pub fn set_position(&mut self, position: Position) {
        self.position = Some(position);
        self.updated_at = Some(Utc::now());
    }
}

/// Read-only view of a room member, used by the HTTP room endpoints.
#[derive(Debug, Clone)]
pub struct MemberSummary {
    /// Connection identifier.
    pub connection_id: ConnectionId,
    /// Display name.
    pub display_name: String,
    /// Last known position.
    pub position: Option<Position>,
    /// Join timestamp.
    pub joined_at: DateTime<Utc>,
}

impl MemberSummary {
    /// Builds a summary from a registry entry.
    #[must_use]
    pub fn from_state(connection_id: ConnectionId, state: &UserState) -> Self {
        Self {
            connection_id,
            display_name: state.display_name.clone(),
            position: state.position,
            joined_at: state.joined_at,
        }
    }
}
