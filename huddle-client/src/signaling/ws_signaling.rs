use crate::error::SignalingError;
use crate::signaling::SignalingOutput;
use async_trait::async_trait;
use futures::{Sink, SinkExt, Stream, StreamExt};
use huddle_core::{
    IceCandidate, PeerId, RoomId, SdpKind, SessionDescription, SignalMessage, SignalingEnvelope,
};
use std::fmt;
use tokio::sync::{mpsc, watch};
use tokio_tungstenite::tungstenite::Message;
use tracing::{debug, error, info, warn};

/// Inbound envelopes buffered before the socket reader waits for the relay.
pub const INBOUND_CAPACITY: usize = 100;

#[derive(Debug, PartialEq)]
enum Outbound {
    Signal(SignalMessage),
    Close,
}

/// WebSocket connection to a `huddle` signaling server.
///
/// Cloning is cheap; all clones share one socket.
#[derive(Clone)]
pub struct WsSignaling {
    outbound: mpsc::UnboundedSender<Outbound>,
    local_peer_id: watch::Receiver<Option<PeerId>>,
}

impl WsSignaling {
    /// Connects, joins `room`, and returns the stream of inbound events.
    /// The stream ends when the socket closes.
    pub async fn connect(
        url: &str,
        room: RoomId,
    ) -> Result<(Self, mpsc::Receiver<SignalingEnvelope>), SignalingError> {
        let (socket, _) = tokio_tungstenite::connect_async(url)
            .await
            .map_err(|e| SignalingError::Connect(e.to_string()))?;
        info!("Connected to signaling server at {}", url);

        let (sink, stream) = socket.split();
        let (out_tx, out_rx) = mpsc::unbounded_channel();
        let (env_tx, env_rx) = mpsc::channel(INBOUND_CAPACITY);
        let (id_tx, id_rx) = watch::channel(None);

        tokio::spawn(write_loop(sink, out_rx));
        tokio::spawn(read_loop(stream, env_tx, id_tx));

        let signaling = Self {
            outbound: out_tx,
            local_peer_id: id_rx,
        };
        info!("Joining room '{}'", room);
        signaling.send(SignalMessage::Join { room })?;

        Ok((signaling, env_rx))
    }

    /// Id the server assigned to this participant, once welcomed.
    pub fn local_peer_id(&self) -> Option<PeerId> {
        self.local_peer_id.borrow().clone()
    }

    pub fn leave(&self) -> Result<(), SignalingError> {
        self.send(SignalMessage::Leave)
    }

    /// Closes the socket. The inbound stream ends once the server acknowledges.
    pub fn disconnect(&self) {
        let _ = self.outbound.send(Outbound::Close);
    }

    /// Leaves the room, then closes the socket. A failed `Leave` is logged;
    /// the server still announces the departure when the socket drops.
    pub fn hang_up(&self) {
        if let Err(e) = self.leave() {
            warn!("Failed to send Leave: {}", e);
        }
        self.disconnect();
    }

    fn send(&self, msg: SignalMessage) -> Result<(), SignalingError> {
        self.outbound
            .send(Outbound::Signal(msg))
            .map_err(|_| SignalingError::Closed)
    }
}

#[async_trait]
impl SignalingOutput for WsSignaling {
    async fn send_session_description(
        &self,
        peer_id: PeerId,
        description: SessionDescription,
    ) -> Result<(), SignalingError> {
        let sdp = description.sdp;
        let msg = match description.kind {
            SdpKind::Offer => SignalMessage::Offer { peer_id, sdp },
            SdpKind::Answer => SignalMessage::Answer { peer_id, sdp },
        };
        self.send(msg)
    }

    async fn send_ice_candidate(
        &self,
        peer_id: PeerId,
        candidate: IceCandidate,
    ) -> Result<(), SignalingError> {
        self.send(SignalMessage::IceCandidate {
            peer_id,
            candidate: candidate.candidate,
            sdp_mid: candidate.sdp_mid,
            sdp_m_line_index: candidate.sdp_m_line_index,
        })
    }
}

async fn write_loop<S>(mut sink: S, mut outbound: mpsc::UnboundedReceiver<Outbound>)
where
    S: Sink<Message> + Unpin,
    S::Error: fmt::Display,
{
    while let Some(item) = outbound.recv().await {
        let message = match item {
            Outbound::Signal(msg) => match serde_json::to_string(&msg) {
                Ok(json) => Message::Text(json),
                Err(e) => {
                    error!("Failed to serialize signal message: {}", e);
                    continue;
                }
            },
            Outbound::Close => {
                let _ = sink.send(Message::Close(None)).await;
                break;
            }
        };

        if let Err(e) = sink.send(message).await {
            warn!("Failed to send signaling message: {}", e);
            break;
        }
    }
    debug!("Signaling write loop finished");
}

async fn read_loop<S, E>(
    mut stream: S,
    envelopes: mpsc::Sender<SignalingEnvelope>,
    local_peer_id: watch::Sender<Option<PeerId>>,
) where
    S: Stream<Item = Result<Message, E>> + Unpin,
    E: fmt::Display,
{
    while let Some(frame) = stream.next().await {
        let text = match frame {
            Ok(Message::Text(text)) => text,
            Ok(Message::Close(_)) => break,
            Ok(_) => continue,
            Err(e) => {
                warn!("Signaling connection error: {}", e);
                break;
            }
        };

        let msg = match serde_json::from_str::<SignalMessage>(&text) {
            Ok(msg) => msg,
            Err(e) => {
                warn!("Invalid SignalMessage from server: {}", e);
                continue;
            }
        };

        match msg {
            SignalMessage::Welcome { peer_id } => {
                info!("Signaling server assigned id {}", peer_id);
                local_peer_id.send_replace(Some(peer_id));
            }
            SignalMessage::Error { message } => warn!("Signaling server error: {}", message),
            other => match SignalingEnvelope::try_from(other) {
                Ok(envelope) => {
                    if envelopes.send(envelope).await.is_err() {
                        break;
                    }
                }
                Err(unexpected) => debug!("Ignoring unexpected signal {:?}", unexpected),
            },
        }
    }
    info!("Signaling connection closed");
}
