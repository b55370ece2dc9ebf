use crate::integration::init_tracing;
use crate::utils::{Wire, settle};
use mixcast_client::SignalingState;
use mixcast_core::{PeerId, Role, SdpType, SessionDescription, SignalMessage};

#[tokio::test]
async fn test_stale_answer_dropped() {
    init_tracing();
    let wire = Wire::new();
    let viewer = wire.join("screen", Role::Viewer).await;
    let ghost = PeerId::new();

    viewer.handle.call(ghost).await.unwrap();
    viewer.wait_state(ghost, SignalingState::HaveLocalOffer).await;

    let answer = SignalMessage::VideoAnswer {
        sender_id: ghost,
        target_id: viewer.id,
        name: Some("ghost".into()),
        sdp: SessionDescription::answer("v=0 answer"),
    };
    viewer.inject(answer.clone());
    let snapshot = viewer.wait_settled(ghost).await;
    assert_eq!(snapshot.remote_name.as_deref(), Some("ghost"));

    viewer.inject(answer);
    settle().await;

    let snapshot = viewer.session(ghost).await.expect("session survives");
    assert_eq!(snapshot.signaling_state, SignalingState::Stable);
    let peer = viewer.rtc.peer_for(&ghost).unwrap();
    assert_eq!(peer.remote_log(), vec![SdpType::Answer]);
}

#[tokio::test]
async fn test_answer_without_session_ignored() {
    init_tracing();
    let wire = Wire::new();
    let viewer = wire.join("screen", Role::Viewer).await;

    viewer.inject(SignalMessage::VideoAnswer {
        sender_id: PeerId::new(),
        target_id: viewer.id,
        name: None,
        sdp: SessionDescription::answer("v=0 answer"),
    });
    settle().await;

    assert!(viewer.sessions().await.is_empty());
    assert_eq!(viewer.rtc.created(), 0);
}
