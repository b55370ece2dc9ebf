use crate::integration::init_tracing;
use crate::utils::Wire;
use mixcast_core::{Role, SignalMessage};

#[tokio::test]
async fn test_call_converges() {
    init_tracing();
    let wire = Wire::new();
    let mixer = wire.join("mixer", Role::Mixer).await;
    let feed = wire.join("cam", Role::Feed).await;

    feed.handle.call(mixer.id).await.unwrap();

    wire.converge(&feed, &mixer).await;
    let on_feed = feed.session(mixer.id).await.unwrap();
    let on_mixer = mixer.session(feed.id).await.unwrap();

    assert_eq!(on_mixer.remote_name.as_deref(), Some("cam"));
    assert_eq!(on_feed.pending_candidates, 0);

    let offers = wire.count(|m| {
        matches!(m, SignalMessage::VideoOffer { sender_id, .. } if *sender_id == feed.id)
    });
    assert!(offers >= 1, "feed must have offered");

    let answers = wire.count(|m| {
        matches!(m, SignalMessage::VideoAnswer { sender_id, .. } if *sender_id == mixer.id)
    });
    assert!(answers >= 1, "mixer must have answered");
}

#[tokio::test]
async fn test_offer_creates_session_on_callee() {
    init_tracing();
    let wire = Wire::new();
    let viewer = wire.join("screen", Role::Viewer).await;
    let feed = wire.join("cam", Role::Feed).await;

    assert!(feed.sessions().await.is_empty());

    viewer.handle.call(feed.id).await.unwrap();

    feed.wait_settled(viewer.id).await;
    let peer = feed.rtc.peer_for(&viewer.id).expect("callee peer");
    assert_eq!(peer.direction, mixcast_core::TransceiverDirection::SendOnly);
}

#[tokio::test]
async fn test_repeat_call_keeps_one_session() {
    init_tracing();
    let wire = Wire::new();
    let mixer = wire.join("mixer", Role::Mixer).await;
    let feed = wire.join("cam", Role::Feed).await;

    feed.handle.call(mixer.id).await.unwrap();
    wire.converge(&feed, &mixer).await;
    feed.handle.call(mixer.id).await.unwrap();

    assert_eq!(feed.sessions().await.len(), 1);
    assert_eq!(feed.rtc.created(), 1);
}

#[tokio::test]
async fn test_callee_offers_when_media_changes() {
    init_tracing();
    let wire = Wire::new();
    let viewer = wire.join("screen", Role::Viewer).await;
    let feed = wire.join("cam", Role::Feed).await;

    viewer.handle.call(feed.id).await.unwrap();
    wire.converge(&viewer, &feed).await;

    let from_feed = |wire: &Wire| {
        wire.count(|m| {
            matches!(m, SignalMessage::VideoOffer { sender_id, .. } if *sender_id == feed.id)
        })
    };
    assert_eq!(from_feed(&wire), 0, "answer covered the callee's media");

    feed.rtc.peer_for(&viewer.id).unwrap().add_media();
    wire.converge(&feed, &viewer).await;

    assert_eq!(from_feed(&wire), 1);
    let answers = wire.count(|m| {
        matches!(m, SignalMessage::VideoAnswer { sender_id, .. } if *sender_id == viewer.id)
    });
    assert_eq!(answers, 1);
}
