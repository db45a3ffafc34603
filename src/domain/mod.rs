//! Domain layer: identities, presence state, events and fan-out.
//!
//! This module contains the relay's domain model: connection and room
//! identifiers, the per-connection user state, the presence registry that
//! tracks room membership, the outbound events it produces, and the event
//! bus that carries those events to each connection's queue.

pub mod connection_id;
pub mod event_bus;
pub mod presence_event;
pub mod presence_registry;
pub mod room_id;
pub mod user_state;

pub use connection_id::ConnectionId;
pub use event_bus::EventBus;
pub use presence_event::PresenceEvent;
pub use presence_registry::{Delivery, PresenceRegistry, RoomSummary};
pub use room_id::RoomId;
pub use user_state::{MemberSummary, Position, UserState};
