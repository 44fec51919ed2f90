use dashmap::DashMap;
use huddle_core::{PeerId, RoomId};
use std::sync::Arc;
use tracing::info;

/// Room membership. A peer is a member of at most one room; rooms exist
/// while they have members.
#[derive(Clone, Default)]
pub struct RoomRegistry {
    rooms: Arc<DashMap<RoomId, Vec<PeerId>>>,
    memberships: Arc<DashMap<PeerId, RoomId>>,
}

impl RoomRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `peer_id` to `room` and returns the members that were already
    /// there. Callers remove the peer from any previous room first.
    pub fn join(&self, room: &RoomId, peer_id: &PeerId) -> Vec<PeerId> {
        let existing = {
            let mut members = self.rooms.entry(room.clone()).or_insert_with(|| {
                info!("Creating new room: {}", room);
                Vec::new()
            });
            let existing: Vec<PeerId> =
                members.iter().filter(|m| *m != peer_id).cloned().collect();
            if !members.contains(peer_id) {
                members.push(peer_id.clone());
            }
            existing
        };

        self.memberships.insert(peer_id.clone(), room.clone());
        existing
    }

    /// Removes `peer_id` from its room. Returns the room and the members
    /// left in it, or `None` if the peer was in no room.
    pub fn leave(&self, peer_id: &PeerId) -> Option<(RoomId, Vec<PeerId>)> {
        let (_, room) = self.memberships.remove(peer_id)?;

        let remaining = match self.rooms.get_mut(&room) {
            Some(mut members) => {
                members.retain(|m| m != peer_id);
                members.clone()
            }
            None => Vec::new(),
        };

        if remaining.is_empty()
            && self
                .rooms
                .remove_if(&room, |_, members| members.is_empty())
                .is_some()
        {
            info!("Room {} is empty, removed", room);
        }

        Some((room, remaining))
    }

    pub fn room_of(&self, peer_id: &PeerId) -> Option<RoomId> {
        self.memberships.get(peer_id).map(|room| room.clone())
    }

    pub fn members(&self, room: &RoomId) -> Vec<PeerId> {
        self.rooms
            .get(room)
            .map(|members| members.clone())
            .unwrap_or_default()
    }

    pub fn room_count(&self) -> usize {
        self.rooms.len()
    }
}
