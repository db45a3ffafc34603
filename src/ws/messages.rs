//! WebSocket wire format.
//!
//! Every text frame carries one named event: `{"event": <name>, "data": <payload>}`.
//! Client frames decode into [`ClientMessage`]; server frames are the
//! serialized [`PresenceEvent`]s.

use serde::{Deserialize, Deserializer};

use crate::domain::{Position, PresenceEvent, RoomId};
use crate::error::RelayError;

/// Events a client can send.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "camelCase")]
pub enum ClientMessage {
    /// Register into a room.
    JoinRoom(JoinRoom),
    /// Report the current position.
    UpdateLocation(LocationReport),
}

/// `joinRoom` payload.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JoinRoom {
    /// Room to join; must be a non-empty string.
    pub room_id: RoomId,
    /// Optional display name; absent, `null` or non-string selects the fallback.
    #[serde(default, deserialize_with = "string_or_none")]
    pub username: Option<String>,
}

/// `updateLocation` payload.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct LocationReport {
    /// Latitude.
    pub lat: f64,
    /// Longitude.
    pub lng: f64,
}

impl From<LocationReport> for Position {
    fn from(report: LocationReport) -> Self {
        Self::new(report.lat, report.lng)
    }
}

/// Accepts any JSON value, keeping it only when it is a string.
fn string_or_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(name) => Some(name),
        _ => None,
    })
}

/// Decodes a client text frame.
///
/// # Errors
///
/// Returns [`RelayError::MalformedFrame`] if the frame is not JSON, names
/// an unknown event, or a required field is missing or mistyped.
pub fn decode(text: &str) -> Result<ClientMessage, RelayError> {
    Ok(serde_json::from_str(text)?)
}

/// Encodes a server event as a text frame.
///
/// # Errors
///
/// Returns [`RelayError::MalformedFrame`] if serialization fails.
pub fn encode(event: &PresenceEvent) -> Result<String, RelayError> {
    Ok(serde_json::to_string(event)?)
}
