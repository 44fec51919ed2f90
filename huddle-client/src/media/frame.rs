use bytes::Bytes;
use huddle_core::PeerId;
use std::time::Duration;
use tokio::sync::broadcast;
use tracing::debug;

/// Buffered frames per stream before slow consumers start skipping.
pub const FRAME_CHANNEL_CAPACITY: usize = 64;

/// One unit of encoded video. The payload is opaque to this crate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoFrame {
    pub data: Bytes,
    pub duration: Duration,
}

impl VideoFrame {
    pub fn new(data: impl Into<Bytes>, duration: Duration) -> Self {
        Self {
            data: data.into(),
            duration,
        }
    }
}

/// A stream of frames handed to a render target.
#[derive(Debug)]
pub struct FrameStream {
    stream_id: String,
    peer_id: Option<PeerId>,
    receiver: broadcast::Receiver<VideoFrame>,
}

impl FrameStream {
    pub fn new(
        stream_id: impl Into<String>,
        peer_id: Option<PeerId>,
        receiver: broadcast::Receiver<VideoFrame>,
    ) -> Self {
        Self {
            stream_id: stream_id.into(),
            peer_id,
            receiver,
        }
    }

    /// Creates a stream together with the sender that feeds it.
    pub fn channel(
        stream_id: impl Into<String>,
        peer_id: Option<PeerId>,
    ) -> (broadcast::Sender<VideoFrame>, Self) {
        let (tx, rx) = broadcast::channel(FRAME_CHANNEL_CAPACITY);
        (tx, Self::new(stream_id, peer_id, rx))
    }

    pub fn stream_id(&self) -> &str {
        &self.stream_id
    }

    /// Remote peer the stream comes from; `None` for the local preview.
    pub fn peer_id(&self) -> Option<&PeerId> {
        self.peer_id.as_ref()
    }

    /// Next frame, or `None` once the producer is gone.
    pub async fn next_frame(&mut self) -> Option<VideoFrame> {
        loop {
            match self.receiver.recv().await {
                Ok(frame) => return Some(frame),
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    debug!("Stream {} skipped {} frames", self.stream_id, skipped);
                }
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    }
}
