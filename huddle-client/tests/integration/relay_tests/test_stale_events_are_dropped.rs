use huddle_client::TransportEvent;
use huddle_core::{IceCandidate, PeerId, SignalingEnvelope};

use crate::integration::{create_test_relay, init_tracing};
use crate::utils::MockTransport;

fn joined(peer_id: &PeerId) -> SignalingEnvelope {
    SignalingEnvelope::PeerJoined {
        peer_id: peer_id.clone(),
    }
}

fn left(peer_id: &PeerId) -> SignalingEnvelope {
    SignalingEnvelope::PeerLeft {
        peer_id: peer_id.clone(),
        reason: "hung up".to_string(),
    }
}

#[tokio::test]
async fn test_late_stream_after_peer_left_gets_no_slot() {
    init_tracing();

    let (relay, harness) = create_test_relay(MockTransport::new(), 1);
    let p1 = PeerId::from("p1");
    let p2 = PeerId::from("p2");

    relay.handle_envelope(joined(&p1)).await.unwrap();
    let departed = harness.transport.connection(&p1).unwrap();
    relay.handle_envelope(left(&p1)).await.unwrap();

    // Raised by the connection before it was closed, handled after the departure.
    let (_frames, stream_added) = departed.stream_added();
    relay.handle_transport_event(stream_added).await.unwrap();
    relay
        .handle_transport_event(TransportEvent::CandidateGenerated(
            p1.clone(),
            departed.id(),
            IceCandidate::new("candidate:late"),
        ))
        .await
        .unwrap();

    assert_eq!(harness.display.slot_of(&p1).await, None);
    assert_eq!(harness.display.available().await, 1);
    assert!(harness.signaling.get_ice_candidates_for(&p1).await.is_empty());

    // The freed capacity is still there for the next peer.
    relay.handle_envelope(joined(&p2)).await.unwrap();
    let (_frames, stream_added) = harness.transport.connection(&p2).unwrap().stream_added();
    relay.handle_transport_event(stream_added).await.unwrap();
    assert_eq!(harness.display.slot_of(&p2).await, Some(0));
}

#[tokio::test]
async fn test_failure_of_replaced_connection_is_ignored() {
    init_tracing();

    let (relay, harness) = create_test_relay(MockTransport::new(), 3);
    let p1 = PeerId::from("p1");

    relay.handle_envelope(joined(&p1)).await.unwrap();
    let old = harness.transport.connection(&p1).unwrap();
    relay.handle_envelope(left(&p1)).await.unwrap();
    relay.handle_envelope(joined(&p1)).await.unwrap();
    let fresh = harness.transport.connection(&p1).unwrap();
    assert_ne!(old.id(), fresh.id());

    relay
        .handle_transport_event(TransportEvent::ConnectionFailed(p1.clone(), old.id()))
        .await
        .unwrap();

    assert!(!fresh.is_closed(), "A stale failure must not close the new connection");
    assert_eq!(harness.registry.connection_id(&p1).await, Some(fresh.id()));

    relay
        .handle_transport_event(TransportEvent::ConnectionFailed(p1.clone(), fresh.id()))
        .await
        .unwrap();

    assert!(fresh.is_closed());
    assert!(harness.registry.get(&p1).await.is_none());
}
