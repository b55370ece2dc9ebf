use crate::integration::init_tracing;
use crate::utils::{join, spawn_hub};
use mixcast_core::{PeerId, SignalMessage};

#[tokio::test]
async fn test_unknown_target_dropped() {
    init_tracing();
    let hub = spawn_hub();

    let mut a = join(&hub).await.expect("a");

    a.send(
        &hub,
        &SignalMessage::HangUp {
            sender_id: a.id,
            target_id: PeerId::new(),
        },
    )
    .await
    .expect("send");
    a.send_raw(
        &hub,
        format!(r#"{{"type":"hang-up","senderId":"{}","targetId":"nobody"}}"#, a.id),
    )
    .await
    .expect("send raw");

    assert!(a.is_silent().await);
    assert_eq!(hub.snapshot().await.expect("hub alive").registered, 1);
}

#[tokio::test]
async fn test_target_that_left_is_dropped() {
    init_tracing();
    let hub = spawn_hub();

    let mut a = join(&hub).await.expect("a");
    let b = join(&hub).await.expect("b");
    let b_id = b.id;
    b.disconnect(&hub).await.expect("b leaves");
    let _ = a.latest_list().await;

    a.send(
        &hub,
        &SignalMessage::HangUp {
            sender_id: a.id,
            target_id: b_id,
        },
    )
    .await
    .expect("send");

    assert!(a.is_silent().await);
}
