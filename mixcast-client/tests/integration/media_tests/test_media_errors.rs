use std::time::Duration;

use crate::integration::init_tracing;
use crate::utils::{MockRtcEngine, Wire, settle};
use mixcast_client::MediaError;
use mixcast_core::Role;

#[tokio::test]
async fn test_missing_devices_reported() {
    init_tracing();
    let wire = Wire::new();
    let mixer = wire.join("mixer", Role::Mixer).await;
    let feed = wire
        .join_with("cam", Role::Feed, MockRtcEngine::failing_with(MediaError::NotFound))
        .await;

    feed.handle.call(mixer.id).await.unwrap();

    let notice = tokio::time::timeout(Duration::from_secs(2), feed.handle.next_notice())
        .await
        .expect("notice")
        .expect("engine running");
    assert!(notice.0.contains("no camera"));
    assert!(feed.sessions().await.is_empty());
}

#[tokio::test]
async fn test_permission_denied_is_silent() {
    init_tracing();
    let wire = Wire::new();
    let mixer = wire.join("mixer", Role::Mixer).await;
    let feed = wire
        .join_with(
            "cam",
            Role::Feed,
            MockRtcEngine::failing_with(MediaError::PermissionDenied),
        )
        .await;

    feed.handle.call(mixer.id).await.unwrap();
    settle().await;

    let notice =
        tokio::time::timeout(Duration::from_millis(200), feed.handle.next_notice()).await;
    assert!(notice.is_err(), "no notice for a refused prompt");
    assert!(feed.sessions().await.is_empty());
    assert!(mixer.sessions().await.is_empty());
}

#[tokio::test]
async fn test_other_failure_carries_message() {
    init_tracing();
    let wire = Wire::new();
    let mixer = wire.join("mixer", Role::Mixer).await;
    let feed = wire
        .join_with(
            "cam",
            Role::Feed,
            MockRtcEngine::failing_with(MediaError::Other("device busy".into())),
        )
        .await;

    feed.handle.call(mixer.id).await.unwrap();

    let notice = tokio::time::timeout(Duration::from_secs(2), feed.handle.next_notice())
        .await
        .expect("notice")
        .expect("engine running");
    assert!(notice.0.contains("device busy"));
}

#[tokio::test]
async fn test_viewer_needs_no_devices() {
    init_tracing();
    let wire = Wire::new();
    let feed = wire.join("cam", Role::Feed).await;
    let viewer = wire
        .join_with(
            "screen",
            Role::Viewer,
            MockRtcEngine::failing_with(MediaError::NotFound),
        )
        .await;

    viewer.handle.call(feed.id).await.unwrap();
    wire.converge(&viewer, &feed).await;
}
