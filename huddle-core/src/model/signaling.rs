use crate::model::peer::PeerId;
use crate::model::room::RoomId;
use serde::{Deserialize, Serialize};

/// A STUN/TURN relay endpoint with its optional credential pair.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct IceServerConfig {
    pub urls: Vec<String>,
    pub username: Option<String>,
    pub credential: Option<String>,
}

impl IceServerConfig {
    pub fn stun(url: impl Into<String>) -> Self {
        Self {
            urls: vec![url.into()],
            username: None,
            credential: None,
        }
    }
}

/// Messages exchanged between a participant and the signaling server.
///
/// For `Offer`, `Answer` and `IceCandidate` the `peer_id` names the target
/// when a client sends the message and the sender when the server delivers it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "op", content = "d")]
pub enum SignalMessage {
    /// First message on a fresh connection: the id the server assigned.
    Welcome {
        peer_id: PeerId,
    },
    Join {
        room: RoomId,
    },
    Leave,
    /// The joiner is the first member of the room.
    Created {
        room: RoomId,
    },
    /// The joiner entered a room that already had members.
    Joined {
        room: RoomId,
    },
    PeerJoined {
        peer_id: PeerId,
    },
    PeerLeft {
        peer_id: PeerId,
        reason: String,
    },
    Offer {
        peer_id: PeerId,
        sdp: String,
    },
    Answer {
        peer_id: PeerId,
        sdp: String,
    },
    IceCandidate {
        peer_id: PeerId,
        candidate: String,
        sdp_mid: Option<String>,
        sdp_m_line_index: Option<u16>,
    },
    Error {
        message: String,
    },
}

impl SignalMessage {
    /// Peer id carried by relayed messages, if any.
    pub fn peer_id(&self) -> Option<&PeerId> {
        match self {
            SignalMessage::Offer { peer_id, .. }
            | SignalMessage::Answer { peer_id, .. }
            | SignalMessage::IceCandidate { peer_id, .. } => Some(peer_id),
            _ => None,
        }
    }

    /// Rewrites the peer id of a relayed message. Other messages are returned as-is.
    pub fn with_peer_id(self, peer_id: PeerId) -> Self {
        match self {
            SignalMessage::Offer { sdp, .. } => SignalMessage::Offer { peer_id, sdp },
            SignalMessage::Answer { sdp, .. } => SignalMessage::Answer { peer_id, sdp },
            SignalMessage::IceCandidate {
                candidate,
                sdp_mid,
                sdp_m_line_index,
                ..
            } => SignalMessage::IceCandidate {
                peer_id,
                candidate,
                sdp_mid,
                sdp_m_line_index,
            },
            other => other,
        }
    }
}
