use crate::config::CallConfig;
use crate::display::{DisplaySurface, LoggingTarget, RenderTarget};
use crate::media::LocalMedia;
use crate::registry::ConnectionRegistry;
use crate::relay::SignalingRelay;
use crate::signaling::SignalingOutput;
use crate::transport::{MediaTransport, transport_channel};
use huddle_core::SignalingEnvelope;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::info;

/// One participant's call: local media, the connections to every remote
/// peer and the targets their streams are shown on.
pub struct CallSession {
    local_media: LocalMedia,
    relay: SignalingRelay,
}

impl CallSession {
    pub fn new(
        config: &CallConfig,
        transport: Arc<dyn MediaTransport>,
        signaling: Arc<dyn SignalingOutput>,
        local_target: Arc<dyn RenderTarget>,
        remote_targets: Vec<Arc<dyn RenderTarget>>,
    ) -> Self {
        let local_media = LocalMedia::default();
        let (events_tx, events_rx) = transport_channel();

        let registry = ConnectionRegistry::new(transport, config.transport_config(), events_tx)
            .with_local_media(local_media.clone());
        let display = DisplaySurface::new(local_target, remote_targets);
        display.attach_local(local_media.subscribe());

        let relay = SignalingRelay::new(
            Arc::new(registry),
            events_rx,
            signaling,
            Arc::new(display),
        );

        Self { local_media, relay }
    }

    /// Session whose render targets only log and count frames, one remote
    /// target per configured slot.
    pub fn headless(
        config: &CallConfig,
        transport: Arc<dyn MediaTransport>,
        signaling: Arc<dyn SignalingOutput>,
    ) -> Self {
        let remotes = (1..=config.remote_slots)
            .map(|i| {
                Arc::new(LoggingTarget::new(format!("remote-{i}"))) as Arc<dyn RenderTarget>
            })
            .collect();
        Self::new(
            config,
            transport,
            signaling,
            Arc::new(LoggingTarget::new("local")),
            remotes,
        )
    }

    /// Frames published here reach the preview and every peer.
    pub fn local_media(&self) -> &LocalMedia {
        &self.local_media
    }

    pub fn registry(&self) -> Arc<ConnectionRegistry> {
        self.relay.registry().clone()
    }

    pub fn display(&self) -> Arc<DisplaySurface> {
        self.relay.display().clone()
    }

    /// Runs the call until `inbound` closes.
    pub async fn run(self, inbound: mpsc::Receiver<SignalingEnvelope>) {
        info!(
            "Call session started with {} remote slots",
            self.relay.display().capacity()
        );
        self.relay.run(inbound).await;
    }
}
