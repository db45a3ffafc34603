//! Room identifier chosen by clients.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::RelayError;

/// Name of a room, an arbitrary non-empty string picked by clients.
///
/// Deserialization goes through [`TryFrom<String>`], so a `joinRoom` frame
/// with an empty `roomId` is rejected at the protocol boundary.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RoomId(String);

impl RoomId {
    /// Returns the room name as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for RoomId {
    type Error = RelayError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        if value.is_empty() {
            return Err(RelayError::InvalidRoomId(value));
        }
        Ok(Self(value))
    }
}

impl TryFrom<&str> for RoomId {
    type Error = RelayError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::try_from(value.to_owned())
    }
}

impl From<RoomId> for String {
    fn from(id: RoomId) -> Self {
        id.0
    }
}

impl fmt::Display for RoomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
