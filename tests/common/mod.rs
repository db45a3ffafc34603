//! Shared helpers for the integration tests: an in-process server and a
//! small WebSocket client.

#![allow(dead_code, clippy::panic, clippy::indexing_slicing)]

use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use serde_json::Value;
use tokio::net::{TcpListener, TcpStream};
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};

use waypoint_relay::app_state::AppState;
use waypoint_relay::domain::EventBus;
use waypoint_relay::router::build_app;
use waypoint_relay::service::PresenceService;

/// How long to wait for an expected frame.
const RECV_TIMEOUT: Duration = Duration::from_secs(2);

/// How long a client must stay silent to count as "received nothing".
const QUIET_PERIOD: Duration = Duration::from_millis(200);

/// Builds the application router with a fresh registry.
pub fn app() -> axum::Router {
    let presence_service = Arc::new(PresenceService::new(EventBus::new(64)));
    build_app(
        AppState { presence_service },
        Path::new(concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/public")),
    )
}

/// Starts the relay on an ephemeral port and returns its address.
pub async fn spawn_server() -> SocketAddr {
    let Ok(listener) = TcpListener::bind("127.0.0.1:0").await else {
        panic!("bind ephemeral port");
    };
    let Ok(addr) = listener.local_addr() else {
        panic!("local addr");
    };
    tokio::spawn(async move {
        let _ = axum::serve(listener, app()).await;
    });
    addr
}

/// A connected test client that knows its own `socketId`.
pub struct Client {
    stream: WebSocketStream<MaybeTlsStream<TcpStream>>,
    /// Identifier announced by the server in the `connected` event.
    pub id: String,
}

impl Client {
    /// Opens `/ws` and reads the `connected` greeting.
    pub async fn connect(addr: SocketAddr) -> Self {
        let Ok((stream, _)) = connect_async(format!("ws://{addr}/ws")).await else {
            panic!("ws connect to {addr}");
        };
        let mut client = Self {
            stream,
            id: String::new(),
        };
        let greeting = client.recv().await;
        assert_eq!(greeting["event"], "connected");
        let Some(id) = greeting["data"]["socketId"].as_str() else {
            panic!("connected event without socketId: {greeting}");
        };
        client.id = id.to_string();
        client
    }

    /// Sends one named event.
    pub async fn emit(&mut self, event: &str, data: Value) {
        let frame = serde_json::json!({ "event": event, "data": data });
        self.send_raw(&frame.to_string()).await;
    }

    /// Sends an arbitrary text frame.
    pub async fn send_raw(&mut self, text: &str) {
        if self.stream.send(Message::text(text)).await.is_err() {
            panic!("ws send failed");
        }
    }

    /// Receives the next text frame as JSON.
    pub async fn recv(&mut self) -> Value {
        loop {
            let Ok(next) = tokio::time::timeout(RECV_TIMEOUT, self.stream.next()).await else {
                panic!("timed out waiting for a frame");
            };
            let Some(Ok(msg)) = next else {
                panic!("ws stream ended");
            };
            if let Message::Text(text) = msg {
                let Ok(value) = serde_json::from_str(text.as_str()) else {
                    panic!("server sent invalid JSON: {text}");
                };
                return value;
            }
        }
    }

    /// Asserts that no text frame arrives within the quiet period.
    pub async fn assert_silent(&mut self) {
        if let Ok(Some(Ok(Message::Text(text)))) =
            tokio::time::timeout(QUIET_PERIOD, self.stream.next()).await
        {
            panic!("unexpected frame: {text}");
        }
    }

    /// Closes the socket.
    pub async fn close(mut self) {
        let _ = self.stream.close(None).await;
    }
}
