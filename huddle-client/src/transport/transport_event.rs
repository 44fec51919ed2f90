use crate::media::FrameStream;
use huddle_core::{IceCandidate, PeerId};
use std::fmt;
use tokio::sync::mpsc;

/// Capacity of the channel carrying transport callbacks to the relay loop.
pub const TRANSPORT_EVENT_CAPACITY: usize = 256;

/// Identifies one connection instance. A peer that leaves and comes back
/// gets a connection with a new id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConnectionId(u64);

impl ConnectionId {
    pub fn new(id: u64) -> Self {
        Self(id)
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Events a connection raises from the transport's own tasks. They are
/// consumed by the relay loop, which is the only place that touches display state.
#[derive(Debug)]
pub enum TransportEvent {
    /// A local ICE candidate was gathered and must reach the remote peer.
    CandidateGenerated(PeerId, ConnectionId, IceCandidate),

    /// The remote peer started sending a media stream.
    StreamAdded(PeerId, ConnectionId, FrameStream),

    /// The connection failed and will not recover.
    ConnectionFailed(PeerId, ConnectionId),
}

impl TransportEvent {
    /// Peer and connection that raised the event.
    pub fn source(&self) -> (&PeerId, ConnectionId) {
        match self {
            TransportEvent::CandidateGenerated(peer_id, id, _)
            | TransportEvent::StreamAdded(peer_id, id, _)
            | TransportEvent::ConnectionFailed(peer_id, id) => (peer_id, *id),
        }
    }
}

pub fn transport_channel() -> (mpsc::Sender<TransportEvent>, mpsc::Receiver<TransportEvent>) {
    mpsc::channel(TRANSPORT_EVENT_CAPACITY)
}
