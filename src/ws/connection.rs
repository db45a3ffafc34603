//! Per-connection WebSocket loop.
//!
//! Reads client frames and dispatches them to the [`PresenceService`],
//! while forwarding events from the connection's outbound queue.

use std::sync::Arc;

use axum::extract::ws::{Message, WebSocket};
use futures_util::{SinkExt, StreamExt};
use tokio::sync::mpsc;

use super::messages::{ClientMessage, decode, encode};
use crate::domain::{ConnectionId, PresenceEvent};
use crate::service::PresenceService;

/// Runs the read/write loop for a single WebSocket connection.
///
/// - Decodes client frames and applies them to the registry.
/// - Writes events from `outbound` to the socket.
///
/// The loop ends on a close frame, a read or write error, or when the
/// outbound queue is closed. The connection is always disconnected from
/// the registry afterwards.
pub async fn run_connection(
    socket: WebSocket,
    connection_id: ConnectionId,
    mut outbound: mpsc::Receiver<PresenceEvent>,
    service: Arc<PresenceService>,
) {
    let (mut ws_tx, mut ws_rx) = socket.split();

    loop {
        tokio::select! {
            // Incoming frame from client
            msg = ws_rx.next() => {
                match msg {
                    Some(Ok(Message::Text(text))) => {
                        handle_text_message(connection_id, text.as_str(), &service).await;
                    }
                    Some(Ok(Message::Close(_))) | None => break,
                    Some(Err(err)) => {
                        tracing::debug!(%connection_id, error = %err, "ws read failed");
                        break;
                    }
                    _ => {}
                }
            }
            // Event addressed to this connection
            event = outbound.recv() => {
                let Some(event) = event else {
                    break;
                };
                match encode(&event) {
                    Ok(json) => {
                        if ws_tx.send(Message::text(json)).await.is_err() {
                            break;
                        }
                    }
                    Err(err) => {
                        tracing::warn!(%connection_id, error = %err, "failed to encode event");
                    }
                }
            }
        }
    }

    service.disconnect(connection_id).await;
    tracing::debug!(%connection_id, "ws connection closed");
}

/// Applies one client frame. Malformed frames are logged and dropped.
async fn handle_text_message(connection_id: ConnectionId, text: &str, service: &PresenceService) {
    match decode(text) {
        Ok(ClientMessage::JoinRoom(join)) => {
            service
                .join_room(connection_id, join.room_id, join.username)
                .await;
        }
        Ok(ClientMessage::UpdateLocation(report)) => {
            service
                .update_location(connection_id, report.into())
                .await;
        }
        Err(err) => {
            tracing::warn!(%connection_id, error = %err, "dropping client frame");
        }
    }
}
