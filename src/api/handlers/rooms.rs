//! Room inspection handlers: list rooms, get room members.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};

use crate::api::dto::{MemberDto, RoomDetailResponse, RoomListResponse, RoomSummaryDto};
use crate::app_state::AppState;
use crate::domain::RoomId;
use crate::error::{ErrorResponse, RelayError};

/// `GET /rooms`: List every non-empty room with member counts.
#[utoipa::path(
    get,
    path = "/api/v1/rooms",
    tag = "Rooms",
    summary = "List rooms",
    description = "Returns every room that currently has at least one joined connection.",
    responses(
        (status = 200, description = "Room list", body = RoomListResponse),
    )
)]
pub async fn list_rooms(State(state): State<AppState>) -> impl IntoResponse {
    let rooms: Vec<RoomSummaryDto> = state
        .presence_service
        .rooms()
        .await
        .into_iter()
        .map(RoomSummaryDto::from)
        .collect();
    let total = rooms.len();
    (StatusCode::OK, Json(RoomListResponse { rooms, total }))
}

/// `GET /rooms/{room_id}`: Members of one room.
///
/// # Errors
///
/// Returns [`RelayError::RoomNotFound`] when nobody is in the room.
#[utoipa::path(
    get,
    path = "/api/v1/rooms/{room_id}",
    tag = "Rooms",
    summary = "Get room members",
    description = "Returns the members of a room in join order, with positions where known.",
    params(
        ("room_id" = String, Path, description = "Room name"),
    ),
    responses(
        (status = 200, description = "Room members", body = RoomDetailResponse),
        (status = 404, description = "Room has no members", body = ErrorResponse),
    )
)]
pub async fn get_room(
    State(state): State<AppState>,
    Path(room_id): Path<String>,
) -> Result<impl IntoResponse, RelayError> {
    let room_id = RoomId::try_from(room_id)?;
    let members = state
        .presence_service
        .room_members(&room_id)
        .await?
        .into_iter()
        .map(MemberDto::from)
        .collect();

    Ok((
        StatusCode::OK,
        Json(RoomDetailResponse {
            room_id: room_id.into(),
            members,
        }),
    ))
}

/// Room routes, mounted under `/api/v1`.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/rooms", get(list_rooms))
        .route("/rooms/{room_id}", get(get_room))
}
