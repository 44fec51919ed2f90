pub mod config;
pub mod display;
pub mod error;
pub mod media;
pub mod registry;
pub mod relay;
pub mod session;
pub mod signaling;
pub mod transport;

pub use config::CallConfig;
pub use display::{DisplaySurface, LoggingTarget, RenderTarget};
pub use error::{
    ConfigError, DisplayError, NegotiationStage, RegistryError, RelayError, SignalingError,
    TransportError,
};
pub use media::{FrameStream, LocalMedia, VideoFrame};
pub use registry::ConnectionRegistry;
pub use relay::SignalingRelay;
pub use session::CallSession;
pub use signaling::{SignalingOutput, WsSignaling};
pub use transport::{
    ConnectionId, MediaTransport, PeerConnection, TransportConfig, TransportEvent,
    WebRtcTransport, transport_channel,
};
