use crate::error::RegistryError;
use crate::media::LocalMedia;
use crate::transport::{
    ConnectionId, MediaTransport, PeerConnection, TransportConfig, TransportEvent,
};
use huddle_core::PeerId;
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::{Mutex, mpsc};
use tracing::{debug, info, warn};

struct Registered {
    id: ConnectionId,
    connection: Arc<dyn PeerConnection>,
}

/// One connection per remote peer, created on first reference.
pub struct ConnectionRegistry {
    transport: Arc<dyn MediaTransport>,
    config: TransportConfig,
    local_media: Option<LocalMedia>,
    events_tx: mpsc::Sender<TransportEvent>,
    next_id: AtomicU64,
    // Async mutex: it stays locked while a new connection is being built.
    connections: Mutex<HashMap<PeerId, Registered>>,
}

impl ConnectionRegistry {
    pub fn new(
        transport: Arc<dyn MediaTransport>,
        config: TransportConfig,
        events_tx: mpsc::Sender<TransportEvent>,
    ) -> Self {
        Self {
            transport,
            config,
            local_media: None,
            events_tx,
            next_id: AtomicU64::new(1),
            connections: Mutex::new(HashMap::new()),
        }
    }

    /// Local stream attached to every connection the registry creates.
    pub fn with_local_media(mut self, media: LocalMedia) -> Self {
        self.local_media = Some(media);
        self
    }

    /// Returns the connection for `peer_id`, creating it if absent.
    ///
    /// Lookup and creation happen under one lock, so concurrent callers for
    /// an unseen peer end up sharing a single connection.
    pub async fn get_or_create(
        &self,
        peer_id: &PeerId,
    ) -> Result<Arc<dyn PeerConnection>, RegistryError> {
        let mut connections = self.connections.lock().await;

        if let Some(registered) = connections.get(peer_id) {
            return Ok(registered.connection.clone());
        }

        let id = ConnectionId::new(self.next_id.fetch_add(1, Ordering::Relaxed));
        debug!("Creating connection {} for {}", id, peer_id);
        let connection = self
            .transport
            .create_connection(
                peer_id.clone(),
                id,
                &self.config,
                self.events_tx.clone(),
            )
            .await
            .map_err(|source| RegistryError::Create {
                peer_id: peer_id.clone(),
                source,
            })?;

        if let Some(media) = &self.local_media {
            if let Err(source) = connection.add_local_media(media).await {
                let _ = connection.close().await;
                return Err(RegistryError::Create {
                    peer_id: peer_id.clone(),
                    source,
                });
            }
        }

        connections.insert(
            peer_id.clone(),
            Registered {
                id,
                connection: connection.clone(),
            },
        );
        info!(
            "Connection {} for {} registered ({} total)",
            id,
            peer_id,
            connections.len()
        );
        Ok(connection)
    }

    pub async fn get(&self, peer_id: &PeerId) -> Option<Arc<dyn PeerConnection>> {
        self.connections
            .lock()
            .await
            .get(peer_id)
            .map(|r| r.connection.clone())
    }

    /// Id of the connection currently registered for `peer_id`.
    pub async fn connection_id(&self, peer_id: &PeerId) -> Option<ConnectionId> {
        self.connections.lock().await.get(peer_id).map(|r| r.id)
    }

    /// Whether `id` is the connection registered for `peer_id`. Events from
    /// evicted or replaced connections fail this check.
    pub async fn is_current(&self, peer_id: &PeerId, id: ConnectionId) -> bool {
        self.connection_id(peer_id).await == Some(id)
    }

    /// Evicts and closes the connection. Returns `false` if the peer was unknown.
    pub async fn remove(&self, peer_id: &PeerId) -> Result<bool, RegistryError> {
        let Some(registered) = self.connections.lock().await.remove(peer_id) else {
            return Ok(false);
        };

        registered
            .connection
            .close()
            .await
            .map_err(|source| RegistryError::Close {
                peer_id: peer_id.clone(),
                source,
            })?;
        info!("Connection for {} closed", peer_id);
        Ok(true)
    }

    /// Evicts and closes every connection. Returns how many were evicted.
    pub async fn close_all(&self) -> usize {
        let drained: Vec<_> = self.connections.lock().await.drain().collect();
        let count = drained.len();

        for (peer_id, registered) in drained {
            if let Err(e) = registered.connection.close().await {
                warn!("Failed to close connection for {}: {}", peer_id, e);
            }
        }

        if count > 0 {
            info!("Closed {} connections", count);
        }
        count
    }

    pub async fn len(&self) -> usize {
        self.connections.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.connections.lock().await.is_empty()
    }

    pub async fn peers(&self) -> Vec<PeerId> {
        self.connections.lock().await.keys().cloned().collect()
    }
}
