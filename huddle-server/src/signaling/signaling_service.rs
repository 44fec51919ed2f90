use crate::error::ServerError;
use crate::room::RoomRegistry;
use axum::extract::ws::Message;
use dashmap::DashMap;
use huddle_core::{PeerId, RoomId, SignalMessage};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

struct SignalingInner {
    peers: DashMap<PeerId, mpsc::UnboundedSender<Message>>,
    rooms: RoomRegistry,
}

/// Routes signaling messages between connected participants.
#[derive(Clone)]
pub struct SignalingService {
    inner: Arc<SignalingInner>,
}

impl Default for SignalingService {
    fn default() -> Self {
        Self::new()
    }
}

impl SignalingService {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(SignalingInner {
                peers: DashMap::new(),
                rooms: RoomRegistry::new(),
            }),
        }
    }

    pub fn rooms(&self) -> &RoomRegistry {
        &self.inner.rooms
    }

    pub fn peer_count(&self) -> usize {
        self.inner.peers.len()
    }

    pub fn add_peer(&self, peer_id: PeerId, tx: mpsc::UnboundedSender<Message>) {
        self.inner.peers.insert(peer_id, tx);
    }

    /// Drops the peer's socket and tells its room it is gone.
    pub fn remove_peer(&self, peer_id: &PeerId) {
        self.inner.peers.remove(peer_id);
        self.leave_room(peer_id, "disconnected");
    }

    pub fn send_signal(&self, peer_id: &PeerId, msg: SignalMessage) -> Result<(), ServerError> {
        let json = serde_json::to_string(&msg)?;
        let peer = self
            .inner
            .peers
            .get(peer_id)
            .ok_or_else(|| ServerError::UnknownPeer(peer_id.clone()))?;

        peer.send(Message::Text(json.into()))
            .map_err(|_| ServerError::Closed(peer_id.clone()))
    }

    /// Acts on a message received from `from`. Errors are meant to be
    /// reported back to the sender.
    pub fn handle_message(&self, from: &PeerId, msg: SignalMessage) -> Result<(), ServerError> {
        match msg {
            SignalMessage::Join { room } => self.join_room(from, room),
            SignalMessage::Leave => {
                self.leave_room(from, "left");
                Ok(())
            }
            SignalMessage::Offer { .. } => self.relay(from, msg, "Offer"),
            SignalMessage::Answer { .. } => self.relay(from, msg, "Answer"),
            SignalMessage::IceCandidate { .. } => self.relay(from, msg, "IceCandidate"),
            SignalMessage::Welcome { .. } => Err(ServerError::Unexpected("Welcome")),
            SignalMessage::Created { .. } => Err(ServerError::Unexpected("Created")),
            SignalMessage::Joined { .. } => Err(ServerError::Unexpected("Joined")),
            SignalMessage::PeerJoined { .. } => Err(ServerError::Unexpected("PeerJoined")),
            SignalMessage::PeerLeft { .. } => Err(ServerError::Unexpected("PeerLeft")),
            SignalMessage::Error { .. } => Err(ServerError::Unexpected("Error")),
        }
    }

    fn join_room(&self, peer_id: &PeerId, room: RoomId) -> Result<(), ServerError> {
        if let Some(current) = self.inner.rooms.room_of(peer_id) {
            if current == room {
                debug!("Peer {} is already in room {}", peer_id, room);
                return Ok(());
            }
            self.leave_room(peer_id, "switched rooms");
        }

        let existing = self.inner.rooms.join(&room, peer_id);
        info!(
            "Peer {} joined room '{}' ({} already there)",
            peer_id,
            room,
            existing.len()
        );

        if existing.is_empty() {
            return self.send_signal(peer_id, SignalMessage::Created { room });
        }

        self.send_signal(peer_id, SignalMessage::Joined { room })?;
        for member in existing {
            let msg = SignalMessage::PeerJoined {
                peer_id: peer_id.clone(),
            };
            if let Err(e) = self.send_signal(&member, msg) {
                warn!("Failed to announce {} to {}: {}", peer_id, member, e);
            }
        }
        Ok(())
    }

    fn leave_room(&self, peer_id: &PeerId, reason: &str) {
        let Some((room, remaining)) = self.inner.rooms.leave(peer_id) else {
            return;
        };
        info!("Peer {} left room '{}': {}", peer_id, room, reason);

        for member in remaining {
            let msg = SignalMessage::PeerLeft {
                peer_id: peer_id.clone(),
                reason: reason.to_owned(),
            };
            if let Err(e) = self.send_signal(&member, msg) {
                warn!("Failed to notify {} of departure: {}", member, e);
            }
        }
    }

    /// Forwards an offer, answer or candidate to its target, tagged with the sender.
    fn relay(
        &self,
        from: &PeerId,
        msg: SignalMessage,
        kind: &'static str,
    ) -> Result<(), ServerError> {
        let Some(target) = msg.peer_id().cloned() else {
            error!("{} without a target peer", kind);
            return Err(ServerError::Unexpected(kind));
        };

        let room = self
            .inner
            .rooms
            .room_of(from)
            .ok_or(ServerError::NoRoom(kind))?;
        if !self.inner.peers.contains_key(&target) {
            return Err(ServerError::UnknownPeer(target));
        }
        if self.inner.rooms.room_of(&target).as_ref() != Some(&room) {
            return Err(ServerError::NotInRoom(target));
        }

        debug!("Relaying {} from {} to {}", kind, from, target);
        self.send_signal(&target, msg.with_peer_id(from.clone()))
    }
}
