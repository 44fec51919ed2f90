use huddle_core::PeerId;
use thiserror::Error;

/// Failures reported by a media-transport backend.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("failed to build peer connection: {0}")]
    Setup(String),
    #[error("invalid session description: {0}")]
    InvalidDescription(String),
    #[error("invalid ICE candidate: {0}")]
    InvalidCandidate(String),
    #[error("peer connection is closed")]
    Closed,
    #[error("transport backend error: {0}")]
    Backend(String),
}

impl From<webrtc::Error> for TransportError {
    fn from(err: webrtc::Error) -> Self {
        TransportError::Backend(err.to_string())
    }
}

impl From<anyhow::Error> for TransportError {
    fn from(err: anyhow::Error) -> Self {
        TransportError::Setup(format!("{err:#}"))
    }
}

#[derive(Debug, Error)]
pub enum SignalingError {
    #[error("failed to connect to signaling server: {0}")]
    Connect(String),
    #[error("signaling channel closed")]
    Closed,
    #[error("failed to encode signal message: {0}")]
    Encode(#[from] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("failed to create connection for {peer_id}: {source}")]
    Create {
        peer_id: PeerId,
        #[source]
        source: TransportError,
    },
    #[error("failed to close connection for {peer_id}: {source}")]
    Close {
        peer_id: PeerId,
        #[source]
        source: TransportError,
    },
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DisplayError {
    #[error("no free render target (capacity {capacity})")]
    NoCapacity { capacity: usize },
}

/// Step of an offer/answer exchange that a transport failure interrupted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NegotiationStage {
    SetRemoteDescription,
    CreateOffer,
    CreateAnswer,
    SetLocalDescription,
    AddIceCandidate,
}

impl std::fmt::Display for NegotiationStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            NegotiationStage::SetRemoteDescription => "set remote description",
            NegotiationStage::CreateOffer => "create offer",
            NegotiationStage::CreateAnswer => "create answer",
            NegotiationStage::SetLocalDescription => "set local description",
            NegotiationStage::AddIceCandidate => "add ICE candidate",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Error)]
pub enum RelayError {
    #[error(transparent)]
    Registry(#[from] RegistryError),
    #[error("{stage} failed for {peer_id}: {source}")]
    Negotiation {
        peer_id: PeerId,
        stage: NegotiationStage,
        #[source]
        source: TransportError,
    },
    #[error("failed to forward signal to {peer_id}: {source}")]
    Forward {
        peer_id: PeerId,
        #[source]
        source: SignalingError,
    },
    #[error("cannot display stream from {peer_id}: {source}")]
    Display {
        peer_id: PeerId,
        #[source]
        source: DisplayError,
    },
}

impl RelayError {
    pub fn peer_id(&self) -> Option<&PeerId> {
        match self {
            RelayError::Registry(RegistryError::Create { peer_id, .. })
            | RelayError::Registry(RegistryError::Close { peer_id, .. })
            | RelayError::Negotiation { peer_id, .. }
            | RelayError::Forward { peer_id, .. }
            | RelayError::Display { peer_id, .. } => Some(peer_id),
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid value {value:?} for {name}")]
    InvalidValue { name: &'static str, value: String },
    #[error("signaling url must use ws:// or wss://, got {0:?}")]
    SignalingUrl(String),
    #[error("at least one remote render slot is required")]
    NoRemoteSlots,
    #[error("ICE server entry {0} has no urls")]
    EmptyIceServer(usize),
}
