use crate::integration::init_tracing;
use crate::integration::webrtc_tests::EXCHANGE_WITHIN;
use crate::utils::{VirtualLan, Wire, is_settled, wait_until_within};
use mixcast_core::{Role, SignalMessage};

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_webrtc_glare_resolves() {
    init_tracing();
    let mut lan = VirtualLan::new();
    let mixer_rtc = lan.engine("mixer-out").await;
    let feed_rtc = lan.engine("cam").await;
    lan.start().await;

    let wire = Wire::new();
    let mixer = wire.join_with("mixer", Role::Mixer, mixer_rtc).await;
    let feed = wire.join_with("cam", Role::Feed, feed_rtc).await;

    wire.hold();
    mixer.handle.call(feed.id).await.unwrap();
    feed.handle.call(mixer.id).await.unwrap();
    wait_until_within("both offers in flight", EXCHANGE_WITHIN, || {
        wire.held_count(|m| matches!(m, SignalMessage::VideoOffer { .. })) == 2
    })
    .await;
    wire.release();

    wire.settle_exchanges(&mixer, &feed, EXCHANGE_WITHIN).await;

    let polite = mixer.id.min(feed.id);
    let answered_by_polite = wire.count(|m| {
        matches!(m, SignalMessage::VideoAnswer { sender_id, .. } if *sender_id == polite)
    });
    assert!(answered_by_polite >= 1, "the polite side answers the crossing offer");

    let on_mixer = mixer.sessions().await;
    let on_feed = feed.sessions().await;
    assert_eq!(on_mixer.len(), 1);
    assert_eq!(on_feed.len(), 1);
    assert!(is_settled(&on_mixer[0]), "mixer side: {:?}", on_mixer[0]);
    assert!(is_settled(&on_feed[0]), "feed side: {:?}", on_feed[0]);
}
