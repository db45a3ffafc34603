//! Shared application state injected into all Axum handlers.

use std::sync::Arc;

use crate::service::PresenceService;

/// Shared application state available to all handlers via Axum's
/// `State` extractor.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Presence service owning the registry and outbound queues.
    pub presence_service: Arc<PresenceService>,
}
