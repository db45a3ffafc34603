//! Connection → user state table with a secondary room index.
//!
//! [`PresenceRegistry`] is the authoritative in-memory record of who is in
//! which room and where they were last seen. It is a plain synchronous
//! structure: every mutation returns the [`Delivery`] values it implies and
//! the caller (see [`crate::service::PresenceService`]) is responsible for
//! serializing access and handing deliveries to the event bus.

use std::collections::{BTreeMap, HashMap};

use super::presence_event::{LocatedUser, SocketRef};
use super::user_state::MemberSummary;
use super::{ConnectionId, Position, PresenceEvent, RoomId, UserState};

/// One outbound event and the connections it is addressed to.
#[derive(Debug, Clone, PartialEq)]
pub struct Delivery {
    /// Target connections.
    pub recipients: Vec<ConnectionId>,
    /// Event to deliver to each of them.
    pub event: PresenceEvent,
}

impl Delivery {
    /// Addresses an event to a single connection.
    #[must_use]
    pub fn to_one(recipient: ConnectionId, event: PresenceEvent) -> Self {
        Self {
            recipients: vec![recipient],
            event,
        }
    }
}

/// Member counts for one non-empty room.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoomSummary {
    /// Room name.
    pub room_id: RoomId,
    /// Number of joined connections.
    pub members: usize,
    /// Number of joined connections with a known position.
    pub located: usize,
}

/// Central store for presence state.
///
/// Room membership is derived from `users` but indexed in `rooms`
/// (keyed by join sequence) so fan-out never scans the whole table.
/// Both maps are updated together by every mutation; empty rooms are
/// dropped from the index.
#[derive(Debug, Default)]
pub struct PresenceRegistry {
    users: HashMap<ConnectionId, UserState>,
    rooms: HashMap<RoomId, BTreeMap<u64, ConnectionId>>,
    next_join_seq: u64,
}

impl PresenceRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Places `connection_id` in `room_id`, replacing any previous state.
    ///
    /// Returns the `existingUsers` snapshot for the joiner, preceded by a
    /// `userDisconnected` for the previous room when the connection moves
    /// between rooms and someone is left behind there.
    pub fn join(
        &mut self,
        connection_id: ConnectionId,
        room_id: RoomId,
        username: Option<String>,
    ) -> Vec<Delivery> {
        let mut deliveries = Vec::with_capacity(2);

        if let Some(previous) = self.remove_user(connection_id)
            && previous.room_id != room_id
        {
            let remaining = self.room_members(&previous.room_id);
            if !remaining.is_empty() {
                deliveries.push(Delivery {
                    recipients: remaining,
                    event: PresenceEvent::UserDisconnected(SocketRef {
                        socket_id: connection_id,
                    }),
                });
            }
        }

        let join_seq = self.next_join_seq;
        self.next_join_seq = self.next_join_seq.saturating_add(1);

        let state = UserState::new(connection_id, room_id.clone(), username, join_seq);
        self.rooms
            .entry(room_id.clone())
            .or_default()
            .insert(join_seq, connection_id);
        self.users.insert(connection_id, state);

        let snapshot = self.located_members(&room_id, connection_id);
        deliveries.push(Delivery::to_one(
            connection_id,
            PresenceEvent::ExistingUsers(snapshot),
        ));
        deliveries
    }

    /// Records a new position for a joined connection.
    ///
    /// Returns `None` (and changes nothing) when the connection has not
    /// joined a room. Otherwise the `locationUpdate` goes to every room
    /// member, the sender included.
    pub fn update_location(
        &mut self,
        connection_id: ConnectionId,
        position: Position,
    ) -> Option<Delivery> {
        let state = self.users.get_mut(&connection_id)?;
        state.set_position(position);

        let payload = LocatedUser::new(connection_id, &state.display_name, position);
        let room_id = state.room_id.clone();
        Some(Delivery {
            recipients: self.room_members(&room_id),
            event: PresenceEvent::LocationUpdate(payload),
        })
    }

    /// Removes a connection from the registry.
    ///
    /// Idempotent: returns `None` when the connection was never joined or
    /// was already removed, and when nobody is left in its former room.
    pub fn disconnect(&mut self, connection_id: ConnectionId) -> Option<Delivery> {
        let previous = self.remove_user(connection_id)?;
        let remaining = self.room_members(&previous.room_id);
        if remaining.is_empty() {
            return None;
        }
        Some(Delivery {
            recipients: remaining,
            event: PresenceEvent::UserDisconnected(SocketRef {
                socket_id: connection_id,
            }),
        })
    }

    /// Returns the state of a joined connection.
    #[must_use]
    pub fn get(&self, connection_id: ConnectionId) -> Option<&UserState> {
        self.users.get(&connection_id)
    }

    /// Returns the connections in a room, in join order.
    #[must_use]
    pub fn room_members(&self, room_id: &RoomId) -> Vec<ConnectionId> {
        self.rooms
            .get(room_id)
            .map(|members| members.values().copied().collect())
            .unwrap_or_default()
    }

    /// Returns member summaries for a room, in join order.
    #[must_use]
    pub fn member_summaries(&self, room_id: &RoomId) -> Vec<MemberSummary> {
        self.rooms
            .get(room_id)
            .into_iter()
            .flat_map(|members| members.values())
            .filter_map(|id| {
                self.users
                    .get(id)
                    .map(|state| MemberSummary::from_state(*id, state))
            })
            .collect()
    }

    /// Returns counts for every non-empty room, sorted by room name.
    #[must_use]
    pub fn room_summaries(&self) -> Vec<RoomSummary> {
        let mut summaries: Vec<RoomSummary> = self
            .rooms
            .iter()
            .map(|(room_id, members)| RoomSummary {
                room_id: room_id.clone(),
                members: members.len(),
                located: members
                    .values()
                    .filter(|id| {
                        self.users
                            .get(*id)
                            .is_some_and(|state| state.position.is_some())
                    })
                    .count(),
            })
            .collect();
        summaries.sort_by(|a, b| a.room_id.cmp(&b.room_id));
        summaries
    }

    /// Returns the number of joined connections.
    #[must_use]
    pub fn len(&self) -> usize {
        self.users.len()
    }

    /// Returns `true` if no connection has joined a room.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }

    /// Returns the number of non-empty rooms.
    #[must_use]
    pub fn room_count(&self) -> usize {
        self.rooms.len()
    }

    /// Located members of `room_id` other than `exclude`, in join order.
    fn located_members(&self, room_id: &RoomId, exclude: ConnectionId) -> Vec<LocatedUser> {
        self.rooms
            .get(room_id)
            .into_iter()
            .flat_map(|members| members.values())
            .filter(|id| **id != exclude)
            .filter_map(|id| {
                let state = self.users.get(id)?;
                let position = state.position?;
                Some(LocatedUser::new(*id, &state.display_name, position))
            })
            .collect()
    }

    /// Drops a connection from both maps, returning its former state.
    fn remove_user(&mut self, connection_id: ConnectionId) -> Option<UserState> {
        let state = self.users.remove(&connection_id)?;
        if let Some(members) = self.rooms.get_mut(&state.room_id) {
            members.remove(&state.join_seq);
            if members.is_empty() {
                self.rooms.remove(&state.room_id);
            }
        }
        Some(state)
    }
}
