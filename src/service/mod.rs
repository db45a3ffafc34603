//! Service layer: presence orchestration.
//!
//! Sits between the transport (WebSocket and REST handlers) and the domain
//! registry, serializing access and dispatching outbound events.

pub mod presence_service;

pub use presence_service::{PresenceService, PresenceStats};
