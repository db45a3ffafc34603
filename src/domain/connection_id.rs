//! Type-safe connection identifier.
//!
//! [`ConnectionId`] is a newtype wrapper around [`uuid::Uuid`] (v4) assigned
//! by the WebSocket transport when a client connects. It is the unit of
//! identity for presence and broadcast targeting and is never reused.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Number of leading identifier characters used in the fallback name.
const FALLBACK_NAME_PREFIX_LEN: usize = 4;

/// Unique identifier for a live client connection.
///
/// Serialized as the plain hyphenated UUID string, which is what clients
/// see as `socketId` on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConnectionId(uuid::Uuid);

impl ConnectionId {
    /// Creates a new random `ConnectionId` (UUID v4).
    #[must_use]
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4())
    }

    /// Creates a `ConnectionId` from an existing [`uuid::Uuid`].
    #[must_use]
    pub const fn from_uuid(uuid: uuid::Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the inner [`uuid::Uuid`].
    #[must_use]
    pub const fn as_uuid(&self) -> &uuid::Uuid {
        &self.0
    }

    /// Display name used when a client joins without a username:
    /// `"User-"` followed by the first four characters of the identifier.
    #[must_use]
    pub fn fallback_display_name(&self) -> String {
        let id = self.0.to_string();
        let prefix: String = id.chars().take(FALLBACK_NAME_PREFIX_LEN).collect();
        format!("User-{prefix}")
    }
}

impl Default for ConnectionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<uuid::Uuid> for ConnectionId {
    fn from(uuid: uuid::Uuid) -> Self {
        Self(uuid)
    }
}
