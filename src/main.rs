//! waypoint-relay server entry point.
//!
//! Starts the Axum HTTP server with the WebSocket relay, REST endpoints
//! and static front end.

use std::sync::Arc;

use anyhow::Context;
use tracing_subscriber::EnvFilter;

use waypoint_relay::app_state::AppState;
use waypoint_relay::config::{LogFormat, RelayConfig};
use waypoint_relay::domain::EventBus;
use waypoint_relay::router::build_app;
use waypoint_relay::service::PresenceService;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    let config = RelayConfig::from_env().context("loading configuration")?;

    // Initialize tracing
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    match config.log_format {
        LogFormat::Pretty => tracing_subscriber::fmt().with_env_filter(filter).init(),
        LogFormat::Json => tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .init(),
    }
    tracing::info!(addr = %config.listen_addr, "starting waypoint-relay");

    // Build domain + service layer
    let event_bus = EventBus::new(config.outbound_queue_capacity);
    let presence_service = Arc::new(PresenceService::new(event_bus));

    let app = build_app(AppState { presence_service }, &config.static_dir);

    // Start server
    let listener = tokio::net::TcpListener::bind(config.listen_addr)
        .await
        .with_context(|| format!("binding {}", config.listen_addr))?;
    tracing::info!(
        addr = %config.listen_addr,
        static_dir = %config.static_dir.display(),
        "server listening"
    );

    axum::serve(listener, app).await?;

    Ok(())
}
