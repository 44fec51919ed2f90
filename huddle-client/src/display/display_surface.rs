use crate::display::RenderTarget;
use crate::error::DisplayError;
use crate::media::FrameStream;
use huddle_core::PeerId;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info};

/// Local preview plus a bounded set of remote render targets.
///
/// Remote targets are handed out lowest-free-first, so streams land on
/// targets in the order they arrive. A released slot is reused by the next
/// stream.
pub struct DisplaySurface {
    local: Arc<dyn RenderTarget>,
    remotes: Vec<Arc<dyn RenderTarget>>,
    slots: Mutex<Vec<Option<PeerId>>>,
}

impl DisplaySurface {
    pub fn new(local: Arc<dyn RenderTarget>, remotes: Vec<Arc<dyn RenderTarget>>) -> Self {
        let slots = Mutex::new(vec![None; remotes.len()]);
        Self {
            local,
            remotes,
            slots,
        }
    }

    pub fn attach_local(&self, stream: FrameStream) {
        debug!("Local preview {} attached to {}", stream.stream_id(), self.local.id());
        self.local.attach(stream);
    }

    /// Shows `stream` on the slot owned by `peer_id`, assigning the lowest
    /// free slot if the peer has none yet. Returns the slot index.
    pub async fn attach_remote(
        &self,
        peer_id: &PeerId,
        stream: FrameStream,
    ) -> Result<usize, DisplayError> {
        let mut slots = self.slots.lock().await;

        let index = match slots.iter().position(|s| s.as_ref() == Some(peer_id)) {
            Some(index) => index,
            None => {
                let index = slots
                    .iter()
                    .position(Option::is_none)
                    .ok_or(DisplayError::NoCapacity {
                        capacity: self.remotes.len(),
                    })?;
                slots[index] = Some(peer_id.clone());
                index
            }
        };

        let target = &self.remotes[index];
        info!("Stream from {} shown on {}", peer_id, target.id());
        target.attach(stream);
        Ok(index)
    }

    /// Frees the slot owned by `peer_id`. Returns the released index.
    pub async fn release(&self, peer_id: &PeerId) -> Option<usize> {
        let mut slots = self.slots.lock().await;
        let index = slots.iter().position(|s| s.as_ref() == Some(peer_id))?;
        slots[index] = None;

        let target = &self.remotes[index];
        target.detach();
        debug!("Released {} held by {}", target.id(), peer_id);
        Some(index)
    }

    pub async fn slot_of(&self, peer_id: &PeerId) -> Option<usize> {
        self.slots
            .lock()
            .await
            .iter()
            .position(|s| s.as_ref() == Some(peer_id))
    }

    pub fn capacity(&self) -> usize {
        self.remotes.len()
    }

    pub async fn available(&self) -> usize {
        self.slots.lock().await.iter().filter(|s| s.is_none()).count()
    }

    pub fn remote_target(&self, index: usize) -> Option<&Arc<dyn RenderTarget>> {
        self.remotes.get(index)
    }
}
