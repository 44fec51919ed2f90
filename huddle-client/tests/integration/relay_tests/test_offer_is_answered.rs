use huddle_core::{IceCandidate, PeerId, SdpKind, SessionDescription, SignalingEnvelope};

use crate::integration::{create_test_relay, init_tracing};
use crate::utils::{ConnectionCall, MockTransport};

#[tokio::test]
async fn test_offer_is_answered() {
    init_tracing();

    let (relay, harness) = create_test_relay(MockTransport::new(), 3);
    let abc = PeerId::from("abc");

    relay
        .handle_envelope(SignalingEnvelope::OfferReceived {
            peer_id: abc.clone(),
            sdp: "remote-offer".to_string(),
        })
        .await
        .expect("Offer should be answered");

    let connection = harness.transport.connection(&abc).unwrap();
    assert_eq!(
        connection.calls(),
        vec![
            ConnectionCall::AddLocalMedia,
            ConnectionCall::SetRemoteDescription(SessionDescription::offer("remote-offer")),
            ConnectionCall::CreateAnswer,
            ConnectionCall::SetLocalDescription(SessionDescription::answer("answer-for-abc")),
        ],
        "Remote description must be applied before the answer is created"
    );

    assert_eq!(
        harness
            .signaling
            .get_description_for(&abc, SdpKind::Answer)
            .await,
        Some("answer-for-abc".to_string())
    );

    // Candidates arriving afterwards reach the same connection.
    relay
        .handle_envelope(SignalingEnvelope::IceCandidateReceived {
            peer_id: abc.clone(),
            candidate: IceCandidate::new("candidate:1 1 udp 1 10.0.0.1 5000 typ host"),
        })
        .await
        .unwrap();

    assert_eq!(harness.transport.created(), 1);
    assert_eq!(
        connection.calls().last(),
        Some(&ConnectionCall::AddIceCandidate(IceCandidate::new(
            "candidate:1 1 udp 1 10.0.0.1 5000 typ host"
        )))
    );
}

#[tokio::test]
async fn test_room_notices_are_no_ops() {
    init_tracing();

    let (relay, harness) = create_test_relay(MockTransport::new(), 3);

    relay
        .handle_envelope(SignalingEnvelope::RoomCreated {
            room: "demo".into(),
        })
        .await
        .unwrap();
    relay
        .handle_envelope(SignalingEnvelope::SelfJoined {
            room: "demo".into(),
        })
        .await
        .unwrap();

    assert_eq!(harness.transport.created(), 0);
    assert!(harness.signaling.signals().await.is_empty());
}
