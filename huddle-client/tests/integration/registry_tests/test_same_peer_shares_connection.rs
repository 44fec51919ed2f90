use huddle_core::PeerId;
use std::sync::Arc;

use crate::integration::{create_test_registry, init_tracing};
use crate::utils::{ConnectionCall, MockTransport};

#[tokio::test]
async fn test_same_peer_shares_connection() {
    init_tracing();

    let transport = MockTransport::new();
    let registry = create_test_registry(&transport);
    let abc = PeerId::from("abc");

    let first = registry.get_or_create(&abc).await.unwrap();
    let second = registry.get_or_create(&abc).await.unwrap();
    assert!(Arc::ptr_eq(&first, &second), "Same peer must map to one connection");
    assert_eq!(transport.created(), 1);

    let other = registry.get_or_create(&PeerId::from("xyz")).await.unwrap();
    assert!(!Arc::ptr_eq(&first, &other));
    assert_eq!(registry.len().await, 2);

    // Local media is attached as part of creation.
    let connection = transport.connection(&abc).unwrap();
    assert_eq!(connection.calls(), vec![ConnectionCall::AddLocalMedia]);

    assert!(registry.remove(&abc).await.unwrap());
    assert!(connection.is_closed());
    assert!(!registry.remove(&abc).await.unwrap());
    assert!(registry.get(&abc).await.is_none());

    // A returning peer gets a fresh connection.
    let fresh = registry.get_or_create(&abc).await.unwrap();
    assert!(!Arc::ptr_eq(&first, &fresh));
    assert_eq!(transport.created(), 3);
}
