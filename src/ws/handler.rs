//! Axum WebSocket upgrade handler.

use std::sync::Arc;

use axum::extract::State;
use axum::extract::ws::WebSocketUpgrade;
use axum::response::IntoResponse;

use super::connection::run_connection;
use crate::app_state::AppState;
use crate::domain::ConnectionId;

/// `GET /ws`: Upgrade HTTP connection to WebSocket.
///
/// Each upgraded socket gets a fresh [`ConnectionId`] and its own outbound
/// queue before the read/write loop starts.
pub async fn ws_handler(ws: WebSocketUpgrade, State(state): State<AppState>) -> impl IntoResponse {
    let service = Arc::clone(&state.presence_service);

    ws.on_upgrade(move |socket| async move {
        let connection_id = ConnectionId::new();
        let outbound = service.connect(connection_id).await;
        run_connection(socket, connection_id, outbound, service).await;
    })
}
