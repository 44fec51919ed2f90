use huddle_core::{PeerId, SessionDescription, SignalingEnvelope};
use std::sync::Arc;

use crate::integration::{create_test_relay, init_tracing};
use crate::utils::{ConnectionCall, MockTransport, OutgoingSignal, SIGNAL_TIMEOUT_MS, next_signal};

#[tokio::test]
async fn test_offer_answer_round_trip() {
    init_tracing();

    let (relay, mut harness) = create_test_relay(MockTransport::new(), 3);
    let abc = PeerId::from("abc");

    relay
        .handle_envelope(SignalingEnvelope::PeerJoined {
            peer_id: abc.clone(),
        })
        .await
        .expect("Offer should be sent");

    let offer = next_signal(&mut harness.signal_rx, SIGNAL_TIMEOUT_MS).await;
    assert_eq!(
        offer,
        Some(OutgoingSignal::Description {
            peer_id: abc.clone(),
            description: SessionDescription::offer("offer-for-abc"),
        })
    );

    let before = harness.registry.get(&abc).await.unwrap();

    relay
        .handle_envelope(SignalingEnvelope::AnswerReceived {
            peer_id: abc.clone(),
            sdp: "remote-answer".to_string(),
        })
        .await
        .expect("Answer should be applied");

    let after = harness.registry.get(&abc).await.unwrap();
    assert!(Arc::ptr_eq(&before, &after), "Connection must survive negotiation");

    let connection = harness.transport.connection(&abc).unwrap();
    assert_eq!(
        connection.calls(),
        vec![
            ConnectionCall::AddLocalMedia,
            ConnectionCall::CreateOffer,
            ConnectionCall::SetLocalDescription(SessionDescription::offer("offer-for-abc")),
            ConnectionCall::SetRemoteDescription(SessionDescription::answer("remote-answer")),
        ]
    );
    assert_eq!(harness.transport.created(), 1);
}
