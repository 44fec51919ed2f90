use huddle_core::{RoomId, SignalMessage};

use crate::integration::{TestParticipant, init_tracing, start_server};

#[tokio::test]
async fn test_room_signaling() {
    init_tracing();

    let addr = start_server().await;
    let mut alice = TestParticipant::connect(addr).await;
    let mut bob = TestParticipant::connect(addr).await;
    assert_ne!(alice.peer_id, bob.peer_id);

    alice.join("demo").await;
    assert_eq!(
        alice.recv().await,
        SignalMessage::Created {
            room: RoomId::from("demo")
        }
    );

    bob.join("demo").await;
    assert_eq!(
        bob.recv().await,
        SignalMessage::Joined {
            room: RoomId::from("demo")
        }
    );
    assert_eq!(
        alice.recv().await,
        SignalMessage::PeerJoined {
            peer_id: bob.peer_id.clone()
        }
    );

    // Alice offers to the newcomer; Bob sees Alice as the sender.
    alice
        .send(SignalMessage::Offer {
            peer_id: bob.peer_id.clone(),
            sdp: "offer-sdp".to_string(),
        })
        .await;
    assert_eq!(
        bob.recv().await,
        SignalMessage::Offer {
            peer_id: alice.peer_id.clone(),
            sdp: "offer-sdp".to_string()
        }
    );

    bob.send(SignalMessage::Answer {
        peer_id: alice.peer_id.clone(),
        sdp: "answer-sdp".to_string(),
    })
    .await;
    assert_eq!(
        alice.recv().await,
        SignalMessage::Answer {
            peer_id: bob.peer_id.clone(),
            sdp: "answer-sdp".to_string()
        }
    );

    let bob_id = bob.peer_id.clone();
    bob.close().await;
    assert_eq!(
        alice.recv().await,
        SignalMessage::PeerLeft {
            peer_id: bob_id,
            reason: "disconnected".to_string()
        }
    );
}

#[tokio::test]
async fn test_unknown_target_gets_error_reply() {
    init_tracing();

    let addr = start_server().await;
    let mut alice = TestParticipant::connect(addr).await;
    alice.join("demo").await;
    let _ = alice.recv().await;

    alice
        .send(SignalMessage::Offer {
            peer_id: "nobody".into(),
            sdp: "offer-sdp".to_string(),
        })
        .await;

    match alice.recv().await {
        SignalMessage::Error { message } => assert!(message.contains("nobody")),
        other => panic!("expected an error reply, got {other:?}"),
    }
}
