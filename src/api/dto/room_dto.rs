//! Room-related DTOs for the list and detail endpoints.

use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::{MemberSummary, RoomSummary};

/// One entry of `GET /rooms`.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RoomSummaryDto {
    /// Room name.
    pub room_id: String,
    /// Number of joined connections.
    pub members: usize,
    /// Number of joined connections with a known position.
    pub located: usize,
}

impl From<RoomSummary> for RoomSummaryDto {
    fn from(summary: RoomSummary) -> Self {
        Self {
            room_id: summary.room_id.into(),
            members: summary.members,
            located: summary.located,
        }
    }
}

/// Response body for `GET /rooms`.
#[derive(Debug, Serialize, ToSchema)]
pub struct RoomListResponse {
    /// Non-empty rooms sorted by name.
    pub rooms: Vec<RoomSummaryDto>,
    /// Number of rooms.
    pub total: usize,
}

/// A room member as reported by `GET /rooms/{room_id}`.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MemberDto {
    /// Connection identifier, as carried in WebSocket events.
    pub socket_id: uuid::Uuid,
    /// Display name.
    pub username: String,
    /// Latitude, absent until the first location update.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lat: Option<f64>,
    /// Longitude, absent until the first location update.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lng: Option<f64>,
    /// When the member joined the room.
    pub joined_at: DateTime<Utc>,
}

impl From<MemberSummary> for MemberDto {
    fn from(member: MemberSummary) -> Self {
        Self {
            socket_id: *member.connection_id.as_uuid(),
            username: member.display_name,
            lat: member.position.map(|p| p.latitude),
            lng: member.position.map(|p| p.longitude),
            joined_at: member.joined_at,
        }
    }
}

/// Response body for `GET /rooms/{room_id}`.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RoomDetailResponse {
    /// Room name.
    pub room_id: String,
    /// Members in join order.
    pub members: Vec<MemberDto>,
}
