//! # waypoint-relay
//!
//! Real-time location-sharing relay. Clients connect over WebSocket, join a
//! named room and stream their position; every member of the room receives
//! every update, and departures retract the member's marker.
//!
//! ## Architecture
//!
//! ```text
//! Clients (WebSocket, HTTP)
//!     │
//!     ├── WS Handler (ws/)          joinRoom / updateLocation
//!     ├── REST Handlers (api/)      health, room inspection
//!     │
//!     ├── PresenceService (service/)
//!     │
//!     ├── PresenceRegistry (domain/)   connection → user state, room index
//!     └── EventBus (domain/)           per-connection outbound queues
//! ```

pub mod api;
pub mod app_state;
pub mod config;
pub mod domain;
pub mod error;
pub mod router;
pub mod service;
pub mod ws;
