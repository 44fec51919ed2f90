use huddle_core::PeerId;
use std::sync::Arc;
use std::time::Duration;

use crate::integration::{create_test_registry, init_tracing};
use crate::utils::MockTransport;

#[tokio::test]
async fn test_concurrent_lookup_creates_once() {
    init_tracing();

    let transport = MockTransport::new().with_creation_delay(Duration::from_millis(50));
    let registry = Arc::new(create_test_registry(&transport));
    let peer_id = PeerId::from("late-joiner");

    let lookups: Vec<_> = (0..8)
        .map(|_| {
            let registry = registry.clone();
            let peer_id = peer_id.clone();
            tokio::spawn(async move { registry.get_or_create(&peer_id).await })
        })
        .collect();

    let mut connections = Vec::new();
    for lookup in lookups {
        connections.push(lookup.await.unwrap().unwrap());
    }

    assert_eq!(transport.created(), 1, "Exactly one connection must be built");
    assert!(connections.iter().all(|c| Arc::ptr_eq(c, &connections[0])));
    assert_eq!(registry.peers().await, vec![peer_id]);
}
