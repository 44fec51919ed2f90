use crate::display::RenderTarget;
use crate::media::FrameStream;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use tokio::sync::watch;
use tokio::task::AbortHandle;
use tracing::{debug, info, warn};

/// Headless render target: drains the attached stream and counts frames.
pub struct LoggingTarget {
    id: String,
    frames: Arc<AtomicU64>,
    attached: watch::Sender<Option<String>>,
    task: Mutex<Option<AbortHandle>>,
}

impl LoggingTarget {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            frames: Arc::new(AtomicU64::new(0)),
            attached: watch::Sender::new(None),
            task: Mutex::new(None),
        }
    }

    /// Id of the stream currently shown, if any.
    pub fn attached_stream(&self) -> Option<String> {
        self.attached.borrow().clone()
    }

    pub fn frames_rendered(&self) -> u64 {
        self.frames.load(Ordering::Relaxed)
    }

    fn replace_task(&self, task: Option<AbortHandle>) {
        let previous = std::mem::replace(
            &mut *self.task.lock().unwrap_or_else(PoisonError::into_inner),
            task,
        );
        if let Some(previous) = previous {
            previous.abort();
        }
    }
}

impl RenderTarget for LoggingTarget {
    fn id(&self) -> &str {
        &self.id
    }

    fn attach(&self, mut stream: FrameStream) {
        self.attached
            .send_replace(Some(stream.stream_id().to_owned()));

        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            warn!("{}: no runtime to drain stream {}", self.id, stream.stream_id());
            return;
        };

        let id = self.id.clone();
        let frames = self.frames.clone();
        let handle = runtime.spawn(async move {
            while let Some(frame) = stream.next_frame().await {
                let count = frames.fetch_add(1, Ordering::Relaxed) + 1;
                if count == 1 {
                    info!("{}: first frame ({} bytes)", id, frame.data.len());
                } else if count % 300 == 0 {
                    debug!("{}: {} frames rendered", id, count);
                }
            }
            debug!("{}: stream {} ended", id, stream.stream_id());
        });
        self.replace_task(Some(handle.abort_handle()));
    }

    fn detach(&self) {
        self.attached.send_replace(None);
        self.replace_task(None);
    }
}
