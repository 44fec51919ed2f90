use crate::media::{FRAME_CHANNEL_CAPACITY, FrameStream, VideoFrame};
use tokio::sync::broadcast;

pub const DEFAULT_LOCAL_STREAM_ID: &str = "huddle-local";
pub const DEFAULT_LOCAL_TRACK_ID: &str = "video0";

/// The participant's outgoing video. Every peer connection and the local
/// preview subscribe to the same frame source.
#[derive(Debug, Clone)]
pub struct LocalMedia {
    stream_id: String,
    track_id: String,
    frames: broadcast::Sender<VideoFrame>,
}

impl LocalMedia {
    pub fn new(stream_id: impl Into<String>, track_id: impl Into<String>) -> Self {
        let (frames, _) = broadcast::channel(FRAME_CHANNEL_CAPACITY);
        Self {
            stream_id: stream_id.into(),
            track_id: track_id.into(),
            frames,
        }
    }

    pub fn stream_id(&self) -> &str {
        &self.stream_id
    }

    pub fn track_id(&self) -> &str {
        &self.track_id
    }

    /// Pushes a captured frame to every subscriber. Returns how many received it.
    pub fn publish(&self, frame: VideoFrame) -> usize {
        self.frames.send(frame).unwrap_or(0)
    }

    pub fn subscribe(&self) -> FrameStream {
        FrameStream::new(self.stream_id.clone(), None, self.frames.subscribe())
    }

    pub fn subscriber_count(&self) -> usize {
        self.frames.receiver_count()
    }
}

impl Default for LocalMedia {
    fn default() -> Self {
        Self::new(DEFAULT_LOCAL_STREAM_ID, DEFAULT_LOCAL_TRACK_ID)
    }
}
