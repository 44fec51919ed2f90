use crate::display::DisplaySurface;
use crate::error::{NegotiationStage, RelayError, TransportError};
use crate::registry::ConnectionRegistry;
use crate::signaling::SignalingOutput;
use crate::transport::TransportEvent;
use huddle_core::{PeerId, SessionDescription, SignalingEnvelope};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

/// Drives peer connections from inbound signaling events and sends the
/// locally produced descriptions and candidates back out.
///
/// All events, signaling and transport alike, are handled one at a time on
/// the task running [`SignalingRelay::run`].
pub struct SignalingRelay {
    registry: Arc<ConnectionRegistry>,
    signaling: Arc<dyn SignalingOutput>,
    display: Arc<DisplaySurface>,
    transport_rx: mpsc::Receiver<TransportEvent>,
}

impl SignalingRelay {
    /// `transport_rx` must be the receiving end of the channel whose sender
    /// the registry hands to new connections.
    pub fn new(
        registry: Arc<ConnectionRegistry>,
        transport_rx: mpsc::Receiver<TransportEvent>,
        signaling: Arc<dyn SignalingOutput>,
        display: Arc<DisplaySurface>,
    ) -> Self {
        Self {
            registry,
            signaling,
            display,
            transport_rx,
        }
    }

    pub fn registry(&self) -> &Arc<ConnectionRegistry> {
        &self.registry
    }

    pub fn display(&self) -> &Arc<DisplaySurface> {
        &self.display
    }

    /// Runs until the inbound channel closes, then closes every connection.
    pub async fn run(mut self, mut inbound: mpsc::Receiver<SignalingEnvelope>) {
        info!("Signaling relay started");

        loop {
            tokio::select! {
                envelope = inbound.recv() => {
                    match envelope {
                        Some(e) => {
                            if let Err(err) = self.handle_envelope(e).await {
                                error!("{}", err);
                            }
                        }
                        None => {
                            info!("Signaling channel closed. Ending call.");
                            break;
                        }
                    }
                }

                event = self.transport_rx.recv() => {
                    match event {
                        Some(e) => {
                            if let Err(err) = self.handle_transport_event(e).await {
                                warn!("{}", err);
                            }
                        }
                        None => {
                            warn!("Transport channel closed unexpectedly");
                            break;
                        }
                    }
                }
            }
        }

        self.close_all().await;
        info!("Signaling relay finished");
    }

    pub async fn handle_envelope(&self, envelope: SignalingEnvelope) -> Result<(), RelayError> {
        match envelope {
            SignalingEnvelope::RoomCreated { room } => {
                info!("Created room '{}', waiting for peers", room);
            }

            SignalingEnvelope::SelfJoined { room } => {
                info!("Joined room '{}'", room);
            }

            SignalingEnvelope::PeerJoined { peer_id } => {
                info!("Peer {} joined, sending offer", peer_id);
                let connection = self.registry.get_or_create(&peer_id).await?;

                let offer = connection
                    .create_offer()
                    .await
                    .map_err(failed_at(&peer_id, NegotiationStage::CreateOffer))?;
                connection
                    .set_local_description(offer.clone())
                    .await
                    .map_err(failed_at(&peer_id, NegotiationStage::SetLocalDescription))?;

                self.forward_description(peer_id, offer).await?;
            }

            SignalingEnvelope::OfferReceived { peer_id, sdp } => {
                info!("Offer received from {}", peer_id);
                let connection = self.registry.get_or_create(&peer_id).await?;

                connection
                    .set_remote_description(SessionDescription::offer(sdp))
                    .await
                    .map_err(failed_at(&peer_id, NegotiationStage::SetRemoteDescription))?;
                let answer = connection
                    .create_answer()
                    .await
                    .map_err(failed_at(&peer_id, NegotiationStage::CreateAnswer))?;
                connection
                    .set_local_description(answer.clone())
                    .await
                    .map_err(failed_at(&peer_id, NegotiationStage::SetLocalDescription))?;

                self.forward_description(peer_id, answer).await?;
            }

            SignalingEnvelope::AnswerReceived { peer_id, sdp } => {
                info!("Answer received from {}", peer_id);
                let connection = self.registry.get_or_create(&peer_id).await?;

                connection
                    .set_remote_description(SessionDescription::answer(sdp))
                    .await
                    .map_err(failed_at(&peer_id, NegotiationStage::SetRemoteDescription))?;
            }

            SignalingEnvelope::IceCandidateReceived { peer_id, candidate } => {
                debug!("ICE candidate received from {}", peer_id);
                let connection = self.registry.get_or_create(&peer_id).await?;

                connection
                    .add_ice_candidate(candidate)
                    .await
                    .map_err(failed_at(&peer_id, NegotiationStage::AddIceCandidate))?;
            }

            SignalingEnvelope::PeerLeft { peer_id, reason } => {
                self.evict(&peer_id, &reason).await?;
            }
        }

        Ok(())
    }

    /// Acts on an event from the connection currently registered for its
    /// peer. Events from evicted or replaced connections are dropped.
    pub async fn handle_transport_event(&self, event: TransportEvent) -> Result<(), RelayError> {
        let (peer_id, connection_id) = event.source();
        if !self.registry.is_current(peer_id, connection_id).await {
            debug!(
                "Dropping event from stale connection {} of {}",
                connection_id, peer_id
            );
            return Ok(());
        }

        match event {
            TransportEvent::CandidateGenerated(peer_id, _, candidate) => {
                self.signaling
                    .send_ice_candidate(peer_id.clone(), candidate)
                    .await
                    .map_err(|source| RelayError::Forward { peer_id, source })?;
            }

            TransportEvent::StreamAdded(peer_id, _, stream) => {
                let index = self
                    .display
                    .attach_remote(&peer_id, stream)
                    .await
                    .map_err(|source| RelayError::Display {
                        peer_id: peer_id.clone(),
                        source,
                    })?;
                debug!("Remote stream of {} uses slot {}", peer_id, index);
            }

            TransportEvent::ConnectionFailed(peer_id, _) => {
                warn!("Connection to {} failed", peer_id);
                self.evict(&peer_id, "connection failed").await?;
            }
        }

        Ok(())
    }

    /// Releases the peer's display slot and closes its connection.
    /// Returns `false` if the peer had no connection.
    pub async fn evict(&self, peer_id: &PeerId, reason: &str) -> Result<bool, RelayError> {
        let slot = self.display.release(peer_id).await;
        let removed = self.registry.remove(peer_id).await?;

        if removed || slot.is_some() {
            info!("Peer {} left: {}", peer_id, reason);
        } else {
            debug!("Ignoring departure of unknown peer {}", peer_id);
        }
        Ok(removed)
    }

    /// Session teardown: every connection is closed and every slot freed.
    pub async fn close_all(&self) -> usize {
        for peer_id in self.registry.peers().await {
            self.display.release(&peer_id).await;
        }
        self.registry.close_all().await
    }

    async fn forward_description(
        &self,
        peer_id: PeerId,
        description: SessionDescription,
    ) -> Result<(), RelayError> {
        debug!("Sending {} to {}", description.kind, peer_id);
        self.signaling
            .send_session_description(peer_id.clone(), description)
            .await
            .map_err(|source| RelayError::Forward { peer_id, source })
    }
}

fn failed_at(
    peer_id: &PeerId,
    stage: NegotiationStage,
) -> impl FnOnce(TransportError) -> RelayError + use<> {
    let peer_id = peer_id.clone();
    move |source| RelayError::Negotiation {
        peer_id,
        stage,
        source,
    }
}
