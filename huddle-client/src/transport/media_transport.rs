use crate::error::TransportError;
use crate::media::LocalMedia;
use crate::transport::{ConnectionId, TransportConfig, TransportEvent};
use async_trait::async_trait;
use huddle_core::{IceCandidate, PeerId, SessionDescription};
use std::sync::Arc;
use tokio::sync::mpsc;

/// The negotiated transport to one remote peer.
///
/// Every method completes asynchronously; callers await each step before
/// starting the next, so a remote description is always applied before the
/// answer that depends on it is created.
#[async_trait]
pub trait PeerConnection: Send + Sync {
    fn peer_id(&self) -> &PeerId;

    async fn create_offer(&self) -> Result<SessionDescription, TransportError>;

    async fn create_answer(&self) -> Result<SessionDescription, TransportError>;

    async fn set_local_description(
        &self,
        description: SessionDescription,
    ) -> Result<(), TransportError>;

    async fn set_remote_description(
        &self,
        description: SessionDescription,
    ) -> Result<(), TransportError>;

    async fn add_ice_candidate(&self, candidate: IceCandidate) -> Result<(), TransportError>;

    /// Starts sending the local stream over this connection.
    async fn add_local_media(&self, media: &LocalMedia) -> Result<(), TransportError>;

    async fn close(&self) -> Result<(), TransportError>;
}

/// Factory for peer connections.
#[async_trait]
pub trait MediaTransport: Send + Sync {
    /// Builds a connection to `peer_id`. Generated candidates, added remote
    /// streams and failures of the new connection are reported on `events`,
    /// tagged with `connection_id`.
    async fn create_connection(
        &self,
        peer_id: PeerId,
        connection_id: ConnectionId,
        config: &TransportConfig,
        events: mpsc::Sender<TransportEvent>,
    ) -> Result<Arc<dyn PeerConnection>, TransportError>;
}
