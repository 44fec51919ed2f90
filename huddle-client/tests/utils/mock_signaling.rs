use async_trait::async_trait;
use huddle_client::{SignalingError, SignalingOutput};
use huddle_core::{IceCandidate, PeerId, SdpKind, SessionDescription};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::{Mutex, mpsc};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutgoingSignal {
    Description {
        peer_id: PeerId,
        description: SessionDescription,
    },
    Candidate {
        peer_id: PeerId,
        candidate: IceCandidate,
    },
}

/// Mock SignalingOutput that captures all outgoing signals.
#[derive(Clone)]
pub struct MockSignalingOutput {
    /// Channel to send captured signals.
    tx: mpsc::UnboundedSender<OutgoingSignal>,
    /// All captured signals (for verification).
    signals: Arc<Mutex<Vec<OutgoingSignal>>>,
    /// When set, every send fails as if the socket were gone.
    closed: Arc<AtomicBool>,
}

impl MockSignalingOutput {
    /// Create a new MockSignalingOutput and its receiver channel.
    pub fn new() -> (Self, mpsc::UnboundedReceiver<OutgoingSignal>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let signaling = Self {
            tx,
            signals: Arc::new(Mutex::new(Vec::new())),
            closed: Arc::new(AtomicBool::new(false)),
        };
        (signaling, rx)
    }

    /// Create a MockSignalingOutput without a receiver (signals are only stored).
    pub fn new_stored_only() -> Self {
        Self::new().0
    }

    pub fn close(&self) {
        self.closed.store(true, Ordering::SeqCst);
    }

    pub async fn signals(&self) -> Vec<OutgoingSignal> {
        self.signals.lock().await.clone()
    }

    /// Get the SDP of the given kind sent to a specific peer (if any).
    pub async fn get_description_for(&self, peer_id: &PeerId, kind: SdpKind) -> Option<String> {
        self.signals.lock().await.iter().find_map(|s| match s {
            OutgoingSignal::Description {
                peer_id: id,
                description,
            } if id == peer_id && description.kind == kind => Some(description.sdp.clone()),
            _ => None,
        })
    }

    /// Get all ICE candidates sent to a specific peer.
    pub async fn get_ice_candidates_for(&self, peer_id: &PeerId) -> Vec<String> {
        self.signals
            .lock()
            .await
            .iter()
            .filter_map(|s| match s {
                OutgoingSignal::Candidate {
                    peer_id: id,
                    candidate,
                } if id == peer_id => Some(candidate.candidate.clone()),
                _ => None,
            })
            .collect()
    }

    async fn capture(&self, msg: OutgoingSignal) -> Result<(), SignalingError> {
        if self.closed.load(Ordering::SeqCst) {
            return Err(SignalingError::Closed);
        }
        self.signals.lock().await.push(msg.clone());
        let _ = self.tx.send(msg);
        Ok(())
    }
}

impl Default for MockSignalingOutput {
    fn default() -> Self {
        Self::new_stored_only()
    }
}

#[async_trait]
impl SignalingOutput for MockSignalingOutput {
    async fn send_session_description(
        &self,
        peer_id: PeerId,
        description: SessionDescription,
    ) -> Result<(), SignalingError> {
        tracing::debug!("[MockSignaling] send {} to {}", description.kind, peer_id);
        self.capture(OutgoingSignal::Description {
            peer_id,
            description,
        })
        .await
    }

    async fn send_ice_candidate(
        &self,
        peer_id: PeerId,
        candidate: IceCandidate,
    ) -> Result<(), SignalingError> {
        tracing::debug!("[MockSignaling] send ICE candidate to {}", peer_id);
        self.capture(OutgoingSignal::Candidate { peer_id, candidate })
            .await
    }
}
