use crate::integration::init_tracing;
use crate::utils::{TestPeer, join, spawn_hub};

#[tokio::test]
async fn test_broadcast_without_target() {
    init_tracing();
    let hub = spawn_hub();

    let mut a = join(&hub).await.expect("a");
    let mut b = join(&hub).await.expect("b");
    let mut pending = TestPeer::connect_pending(&hub).await.expect("pending");
    let _ = a.latest_list().await;

    let text = format!(r#"{{"type":"hang-up","senderId":"{}"}}"#, a.id);
    a.send_raw(&hub, text.clone()).await.expect("send");

    assert_eq!(a.recv_text().await.expect("echo to sender"), text);
    assert_eq!(b.recv_text().await.expect("b copy"), text);
    assert!(pending.is_silent().await, "unopened channels are skipped");
}
