use crate::integration::init_tracing;
use crate::utils::{Wire, candidate};
use mixcast_client::SignalingState;
use mixcast_core::{PeerId, Role, SessionDescription, SignalMessage};

#[tokio::test]
async fn test_candidates_flushed_in_order() {
    init_tracing();
    let wire = Wire::new();
    let viewer = wire.join("screen", Role::Viewer).await;
    let remote = PeerId::new();

    viewer.handle.call(remote).await.unwrap();
    viewer.wait_state(remote, SignalingState::HaveLocalOffer).await;

    for n in 1..=3 {
        viewer.inject(SignalMessage::NewIceCandidate {
            sender_id: remote,
            target_id: viewer.id,
            candidate: candidate(n),
        });
    }

    viewer
        .wait_sessions("queued candidates", |sessions| {
            sessions
                .iter()
                .any(|s| s.remote_id == remote && s.pending_candidates == 3)
        })
        .await;
    let peer = viewer.rtc.peer_for(&remote).unwrap();
    assert!(peer.candidates().is_empty(), "nothing applied early");

    viewer.inject(SignalMessage::VideoAnswer {
        sender_id: remote,
        target_id: viewer.id,
        name: None,
        sdp: SessionDescription::answer("v=0 answer"),
    });
    let snapshot = viewer.wait_settled(remote).await;
    assert_eq!(snapshot.pending_candidates, 0);

    assert_eq!(peer.candidates(), vec![candidate(1), candidate(2), candidate(3)]);
}

#[tokio::test]
async fn test_late_candidate_applied_directly() {
    init_tracing();
    let wire = Wire::new();
    let viewer = wire.join("screen", Role::Viewer).await;
    let remote = PeerId::new();

    viewer.handle.call(remote).await.unwrap();
    viewer.wait_state(remote, SignalingState::HaveLocalOffer).await;
    viewer.inject(SignalMessage::VideoAnswer {
        sender_id: remote,
        target_id: viewer.id,
        name: None,
        sdp: SessionDescription::answer("v=0 answer"),
    });
    viewer.wait_settled(remote).await;

    viewer.inject(SignalMessage::NewIceCandidate {
        sender_id: remote,
        target_id: viewer.id,
        candidate: candidate(7),
    });

    let peer = viewer.rtc.peer_for(&remote).unwrap();
    crate::utils::wait_until("candidate applied", || peer.candidates().len() == 1).await;
    assert_eq!(viewer.session(remote).await.unwrap().pending_candidates, 0);
}
