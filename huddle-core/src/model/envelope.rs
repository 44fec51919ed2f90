use crate::model::media::IceCandidate;
use crate::model::peer::PeerId;
use crate::model::room::RoomId;
use crate::model::signaling::SignalMessage;

/// Inbound signaling events a participant reacts to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignalingEnvelope {
    RoomCreated { room: RoomId },
    SelfJoined { room: RoomId },
    PeerJoined { peer_id: PeerId },
    PeerLeft { peer_id: PeerId, reason: String },
    OfferReceived { peer_id: PeerId, sdp: String },
    AnswerReceived { peer_id: PeerId, sdp: String },
    IceCandidateReceived { peer_id: PeerId, candidate: IceCandidate },
}

impl SignalingEnvelope {
    /// Remote peer the event concerns, if any.
    pub fn peer_id(&self) -> Option<&PeerId> {
        match self {
            SignalingEnvelope::RoomCreated { .. } | SignalingEnvelope::SelfJoined { .. } => None,
            SignalingEnvelope::PeerJoined { peer_id }
            | SignalingEnvelope::PeerLeft { peer_id, .. }
            | SignalingEnvelope::OfferReceived { peer_id, .. }
            | SignalingEnvelope::AnswerReceived { peer_id, .. }
            | SignalingEnvelope::IceCandidateReceived { peer_id, .. } => Some(peer_id),
        }
    }
}

impl TryFrom<SignalMessage> for SignalingEnvelope {
    type Error = SignalMessage;

    /// Server-to-client messages map onto envelopes; anything else is handed back.
    fn try_from(msg: SignalMessage) -> Result<Self, Self::Error> {
        match msg {
            SignalMessage::Created { room } => Ok(SignalingEnvelope::RoomCreated { room }),
            SignalMessage::Joined { room } => Ok(SignalingEnvelope::SelfJoined { room }),
            SignalMessage::PeerJoined { peer_id } => Ok(SignalingEnvelope::PeerJoined { peer_id }),
            SignalMessage::PeerLeft { peer_id, reason } => {
                Ok(SignalingEnvelope::PeerLeft { peer_id, reason })
            }
            SignalMessage::Offer { peer_id, sdp } => {
                Ok(SignalingEnvelope::OfferReceived { peer_id, sdp })
            }
            SignalMessage::Answer { peer_id, sdp } => {
                Ok(SignalingEnvelope::AnswerReceived { peer_id, sdp })
            }
            SignalMessage::IceCandidate {
                peer_id,
                candidate,
                sdp_mid,
                sdp_m_line_index,
            } => Ok(SignalingEnvelope::IceCandidateReceived {
                peer_id,
                candidate: IceCandidate {
                    candidate,
                    sdp_mid,
                    sdp_m_line_index,
                },
            }),
            other => Err(other),
        }
    }
}
