use crate::error::TransportError;
use crate::media::{FrameStream, LocalMedia, VideoFrame};
use crate::transport::{
    ConnectionId, MediaTransport, PeerConnection, TransportConfig, TransportEvent,
};
use anyhow::{Context, Result};
use async_trait::async_trait;
use huddle_core::{IceCandidate, IceServerConfig, PeerId, SdpKind, SessionDescription};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tokio::sync::{Mutex, broadcast, mpsc};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};
use webrtc::api::APIBuilder;
use webrtc::api::interceptor_registry::register_default_interceptors;
use webrtc::api::media_engine::{MIME_TYPE_VP8, MediaEngine};
use webrtc::ice_transport::ice_candidate::{RTCIceCandidate, RTCIceCandidateInit};
use webrtc::ice_transport::ice_server::RTCIceServer;
use webrtc::interceptor::registry::Registry;
use webrtc::media::Sample;
use webrtc::peer_connection::RTCPeerConnection;
use webrtc::peer_connection::configuration::RTCConfiguration;
use webrtc::peer_connection::peer_connection_state::RTCPeerConnectionState;
use webrtc::peer_connection::sdp::session_description::RTCSessionDescription;
use webrtc::rtp_transceiver::RTCRtpTransceiver;
use webrtc::rtp_transceiver::rtp_codec::{RTCRtpCodecCapability, RTPCodecType};
use webrtc::rtp_transceiver::rtp_receiver::RTCRtpReceiver;
use webrtc::track::track_local::TrackLocal;
use webrtc::track::track_local::track_local_static_sample::TrackLocalStaticSample;
use webrtc::track::track_remote::TrackRemote;

/// `MediaTransport` backed by the `webrtc` crate.
#[derive(Debug, Default, Clone)]
pub struct WebRtcTransport;

impl WebRtcTransport {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl MediaTransport for WebRtcTransport {
    async fn create_connection(
        &self,
        peer_id: PeerId,
        connection_id: ConnectionId,
        config: &TransportConfig,
        events: mpsc::Sender<TransportEvent>,
    ) -> Result<Arc<dyn PeerConnection>, TransportError> {
        let connection = WebRtcConnection::new(peer_id, connection_id, config, events).await?;
        Ok(Arc::new(connection))
    }
}

pub struct WebRtcConnection {
    peer_id: PeerId,
    peer_connection: Arc<RTCPeerConnection>,
    /// Tasks feeding local media into this connection; aborted on close.
    pumps: Mutex<Vec<JoinHandle<()>>>,
    closed: AtomicBool,
}

impl WebRtcConnection {
    /// Builds the connection and registers its callbacks. Callbacks only
    /// send `TransportEvent`s on `event_tx`; nothing else is touched from
    /// the transport's tasks.
    pub async fn new(
        peer_id: PeerId,
        connection_id: ConnectionId,
        config: &TransportConfig,
        event_tx: mpsc::Sender<TransportEvent>,
    ) -> Result<Self> {
        let mut m = MediaEngine::default();
        m.register_default_codecs()?;
        let registry = register_default_interceptors(Registry::new(), &mut m)?;

        let api = APIBuilder::new()
            .with_media_engine(m)
            .with_interceptor_registry(registry)
            .build();

        let rtc_config = RTCConfiguration {
            ice_servers: config.ice_servers.iter().map(to_rtc_ice_server).collect(),
            ..Default::default()
        };

        let peer_connection = Arc::new(
            api.new_peer_connection(rtc_config)
                .await
                .context("Failed to create peer connection")?,
        );

        let state_tx = event_tx.clone();
        let uid_state = peer_id.clone();
        peer_connection.on_peer_connection_state_change(Box::new(
            move |s: RTCPeerConnectionState| {
                let tx = state_tx.clone();
                let uid = uid_state.clone();

                Box::pin(async move {
                    info!(
                        "Peer connection {} state changed for {}: {:?}",
                        connection_id, uid, s
                    );
                    if s == RTCPeerConnectionState::Failed {
                        let _ = tx
                            .send(TransportEvent::ConnectionFailed(uid, connection_id))
                            .await;
                    }
                })
            },
        ));

        // Trickle ICE: every gathered candidate goes out through signaling.
        let ice_tx = event_tx.clone();
        let uid_ice = peer_id.clone();
        peer_connection.on_ice_candidate(Box::new(move |c: Option<RTCIceCandidate>| {
            let tx = ice_tx.clone();
            let uid = uid_ice.clone();

            Box::pin(async move {
                let Some(candidate) = c else { return };
                let Ok(init) = candidate.to_json() else {
                    return;
                };
                let candidate = IceCandidate {
                    candidate: init.candidate,
                    sdp_mid: init.sdp_mid,
                    sdp_m_line_index: init.sdp_mline_index,
                };
                let _ = tx
                    .send(TransportEvent::CandidateGenerated(uid, connection_id, candidate))
                    .await;
            })
        }));

        let track_tx = event_tx;
        let uid_track = peer_id.clone();
        peer_connection.on_track(Box::new(
            move |track: Arc<TrackRemote>,
                  _receiver: Arc<RTCRtpReceiver>,
                  _transceiver: Arc<RTCRtpTransceiver>| {
                let tx = track_tx.clone();
                let uid = uid_track.clone();

                Box::pin(async move {
                    if track.kind() != RTPCodecType::Video {
                        debug!("Ignoring non-video track {} from {}", track.id(), uid);
                        return;
                    }

                    let (frames_tx, stream) =
                        FrameStream::channel(track.stream_id(), Some(uid.clone()));
                    if tx
                        .send(TransportEvent::StreamAdded(uid, connection_id, stream))
                        .await
                        .is_err()
                    {
                        return;
                    }
                    tokio::spawn(forward_remote_track(track, frames_tx));
                })
            },
        ));

        Ok(Self {
            peer_id,
            peer_connection,
            pumps: Mutex::new(Vec::new()),
            closed: AtomicBool::new(false),
        })
    }

    fn ensure_open(&self) -> Result<(), TransportError> {
        if self.closed.load(Ordering::SeqCst) {
            return Err(TransportError::Closed);
        }
        Ok(())
    }
}

#[async_trait]
impl PeerConnection for WebRtcConnection {
    fn peer_id(&self) -> &PeerId {
        &self.peer_id
    }

    async fn create_offer(&self) -> Result<SessionDescription, TransportError> {
        self.ensure_open()?;
        let offer = self.peer_connection.create_offer(None).await?;
        Ok(SessionDescription::offer(offer.sdp))
    }

    async fn create_answer(&self) -> Result<SessionDescription, TransportError> {
        self.ensure_open()?;
        let answer = self.peer_connection.create_answer(None).await?;
        Ok(SessionDescription::answer(answer.sdp))
    }

    async fn set_local_description(
        &self,
        description: SessionDescription,
    ) -> Result<(), TransportError> {
        self.ensure_open()?;
        let desc = to_rtc_description(description)?;
        self.peer_connection.set_local_description(desc).await?;
        Ok(())
    }

    async fn set_remote_description(
        &self,
        description: SessionDescription,
    ) -> Result<(), TransportError> {
        self.ensure_open()?;
        let desc = to_rtc_description(description)?;
        self.peer_connection.set_remote_description(desc).await?;
        Ok(())
    }

    async fn add_ice_candidate(&self, candidate: IceCandidate) -> Result<(), TransportError> {
        self.ensure_open()?;
        let init = RTCIceCandidateInit {
            candidate: candidate.candidate,
            sdp_mid: candidate.sdp_mid,
            sdp_mline_index: candidate.sdp_m_line_index,
            username_fragment: None,
        };
        self.peer_connection
            .add_ice_candidate(init)
            .await
            .map_err(|e| TransportError::InvalidCandidate(e.to_string()))
    }

    async fn add_local_media(&self, media: &LocalMedia) -> Result<(), TransportError> {
        self.ensure_open()?;
        let track = Arc::new(TrackLocalStaticSample::new(
            RTCRtpCodecCapability {
                mime_type: MIME_TYPE_VP8.to_owned(),
                ..Default::default()
            },
            media.track_id().to_owned(),
            media.stream_id().to_owned(),
        ));

        let rtp_sender = self
            .peer_connection
            .add_track(Arc::clone(&track) as Arc<dyn TrackLocal + Send + Sync>)
            .await?;

        // RTCP has to be drained for the interceptors to work.
        let rtcp = tokio::spawn(async move {
            let mut buf = vec![0u8; 1500];
            while rtp_sender.read(&mut buf).await.is_ok() {}
        });

        let mut frames = media.subscribe();
        let peer_id = self.peer_id.clone();
        let pump = tokio::spawn(async move {
            while let Some(frame) = frames.next_frame().await {
                let sample = Sample {
                    data: frame.data,
                    duration: frame.duration,
                    ..Default::default()
                };
                if let Err(e) = track.write_sample(&sample).await {
                    warn!("Failed to write local sample to {}: {}", peer_id, e);
                }
            }
        });

        self.pumps.lock().await.extend([rtcp, pump]);
        Ok(())
    }

    async fn close(&self) -> Result<(), TransportError> {
        if self.closed.swap(true, Ordering::SeqCst) {
            return Ok(());
        }
        for pump in self.pumps.lock().await.drain(..) {
            pump.abort();
        }
        self.peer_connection.close().await?;
        Ok(())
    }
}

fn to_rtc_ice_server(server: &IceServerConfig) -> RTCIceServer {
    RTCIceServer {
        urls: server.urls.clone(),
        username: server.username.clone().unwrap_or_default(),
        credential: server.credential.clone().unwrap_or_default(),
    }
}

fn to_rtc_description(
    description: SessionDescription,
) -> Result<RTCSessionDescription, TransportError> {
    let desc = match description.kind {
        SdpKind::Offer => RTCSessionDescription::offer(description.sdp),
        SdpKind::Answer => RTCSessionDescription::answer(description.sdp),
    };
    desc.map_err(|e| TransportError::InvalidDescription(e.to_string()))
}

async fn forward_remote_track(track: Arc<TrackRemote>, frames: broadcast::Sender<VideoFrame>) {
    loop {
        match track.read_rtp().await {
            Ok((packet, _)) => {
                if packet.payload.is_empty() {
                    continue;
                }
                // No subscriber yet is fine; the frame is simply dropped.
                let _ = frames.send(VideoFrame {
                    data: packet.payload,
                    duration: Duration::ZERO,
                });
            }
            Err(e) => {
                debug!("Remote track {} ended: {}", track.id(), e);
                break;
            }
        }
    }
}
