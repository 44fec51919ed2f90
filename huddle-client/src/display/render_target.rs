use crate::media::FrameStream;

/// Something that can show a video stream.
pub trait RenderTarget: Send + Sync {
    fn id(&self) -> &str;

    /// Starts rendering `stream`, replacing whatever was shown before.
    fn attach(&self, stream: FrameStream);

    /// Stops rendering. The default does nothing.
    fn detach(&self) {}
}
