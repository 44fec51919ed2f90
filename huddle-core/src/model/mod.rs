mod envelope;
mod media;
mod peer;
mod room;
mod signaling;

pub use envelope::SignalingEnvelope;
pub use media::{IceCandidate, SdpKind, SessionDescription};
pub use peer::PeerId;
pub use room::RoomId;
pub use signaling::{IceServerConfig, SignalMessage};
