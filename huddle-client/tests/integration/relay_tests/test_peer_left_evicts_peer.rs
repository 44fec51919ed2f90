use huddle_core::{PeerId, SignalingEnvelope};

use crate::integration::{create_test_relay, init_tracing};
use crate::utils::MockTransport;

#[tokio::test]
async fn test_peer_left_evicts_peer() {
    init_tracing();

    let (relay, harness) = create_test_relay(MockTransport::new(), 3);
    let abc = PeerId::from("abc");

    relay
        .handle_envelope(SignalingEnvelope::OfferReceived {
            peer_id: abc.clone(),
            sdp: "remote-offer".to_string(),
        })
        .await
        .unwrap();
    let connection = harness.transport.connection(&abc).unwrap();
    let (_frames, stream_added) = connection.stream_added();
    relay.handle_transport_event(stream_added).await.unwrap();
    assert_eq!(harness.display.slot_of(&abc).await, Some(0));

    relay
        .handle_envelope(SignalingEnvelope::PeerLeft {
            peer_id: abc.clone(),
            reason: "hung up".to_string(),
        })
        .await
        .unwrap();

    assert!(connection.is_closed(), "Departed peer's connection must be closed");
    assert!(harness.registry.get(&abc).await.is_none());
    assert_eq!(harness.display.slot_of(&abc).await, None);
    assert_eq!(harness.display.available().await, 3);
    assert!(harness.targets[0].attached_stream().is_none());
}

#[tokio::test]
async fn test_unknown_peer_left_is_ignored() {
    init_tracing();

    let (relay, harness) = create_test_relay(MockTransport::new(), 3);

    relay
        .handle_envelope(SignalingEnvelope::PeerLeft {
            peer_id: PeerId::from("stranger"),
            reason: "gone".to_string(),
        })
        .await
        .unwrap();

    assert_eq!(harness.transport.created(), 0);
    assert!(harness.registry.is_empty().await);
}
