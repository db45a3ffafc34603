//! WebSocket layer: upgrade handler, connection loop, wire format.
//!
//! The WebSocket endpoint at `/ws` is the transport for the presence
//! protocol: clients send `joinRoom` / `updateLocation` and receive
//! `connected`, `existingUsers`, `locationUpdate` and `userDisconnected`.

pub mod connection;
pub mod handler;
pub mod messages;
