use crate::error::SignalingError;
use huddle_core::{IceCandidate, PeerId, SessionDescription};
use async_trait::async_trait;

/// Outbound half of the signaling channel.
///
/// The relay pushes every locally generated offer, answer and ICE candidate
/// through this trait, tagged with the remote peer it is meant for.
#[async_trait]
pub trait SignalingOutput: Send + Sync {
    /// Send an SDP offer or answer to `peer_id`.
    async fn send_session_description(
        &self,
        peer_id: PeerId,
        description: SessionDescription,
    ) -> Result<(), SignalingError>;

    /// Send a locally gathered ICE candidate to `peer_id`.
    async fn send_ice_candidate(
        &self,
        peer_id: PeerId,
        candidate: IceCandidate,
    ) -> Result<(), SignalingError>;
}
