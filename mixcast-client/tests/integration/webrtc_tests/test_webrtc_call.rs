use crate::integration::init_tracing;
use crate::integration::webrtc_tests::{EXCHANGE_WITHIN, MEDIA_WITHIN};
use crate::utils::{VirtualLan, Wire, wait_streams_within};
use mixcast_client::SignalingState;
use mixcast_core::{Role, TransceiverDirection};

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_webrtc_call_delivers_media() {
    init_tracing();
    let mut lan = VirtualLan::new();
    let mixer_rtc = lan.engine("mixer-out").await;
    let feed_rtc = lan.engine("cam").await;
    lan.start().await;

    let wire = Wire::new();
    let mixer = wire.join_with("mixer", Role::Mixer, mixer_rtc).await;
    let feed = wire.join_with("cam", Role::Feed, feed_rtc).await;

    feed.handle.call(mixer.id).await.unwrap();
    wire.settle_exchanges(&feed, &mixer, EXCHANGE_WITHIN).await;

    let on_feed = feed.session(mixer.id).await.unwrap();
    assert_eq!(on_feed.signaling_state, SignalingState::Stable);
    assert_eq!(on_feed.direction, TransceiverDirection::SendOnly);
    assert!(on_feed.has_remote_description);

    // The feed's capture reaches the mixer, muted until selected.
    let tracks = mixer.handle.tracks();
    wait_streams_within(&tracks, &["cam"], MEDIA_WITHIN).await;
    assert!(tracks.enabled_streams().await.is_empty());
    assert!(tracks.select_stream("cam").await);
    assert_eq!(tracks.enabled_streams().await, vec!["cam".to_string()]);
}
