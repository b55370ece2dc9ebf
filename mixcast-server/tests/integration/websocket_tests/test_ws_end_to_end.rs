use crate::integration::init_tracing;
use anyhow::{Context, Result};
use futures::{SinkExt, StreamExt};
use mixcast_core::{PeerId, Role, SetupData, SignalMessage};
use mixcast_server::{HubHandle, OriginPolicy, RelayConfig, RelayState, relay_router};
use std::net::SocketAddr;
use std::time::Duration;
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};

type Socket = WebSocketStream<MaybeTlsStream<TcpStream>>;

async fn start_relay(state: impl FnOnce(RelayState) -> RelayState) -> Result<SocketAddr> {
    let config = RelayConfig::default();
    let hub = HubHandle::spawn(&config);
    let app = relay_router(state(RelayState::new(hub, &config)));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    Ok(addr)
}

async fn next_message(socket: &mut Socket) -> Result<SignalMessage> {
    loop {
        let frame = tokio::time::timeout(Duration::from_secs(2), socket.next())
            .await
            .context("Timeout waiting for websocket frame")?
            .context("Socket closed")??;
        if let Message::Text(text) = frame {
            return Ok(serde_json::from_str(text.as_str())?);
        }
    }
}

async fn next_matching<F>(socket: &mut Socket, pred: F) -> Result<SignalMessage>
where
    F: Fn(&SignalMessage) -> bool,
{
    loop {
        let msg = next_message(socket).await?;
        if pred(&msg) {
            return Ok(msg);
        }
    }
}

async fn handshake(socket: &mut Socket) -> Result<PeerId> {
    match next_matching(socket, |m| matches!(m, SignalMessage::ConnectionId { .. })).await? {
        SignalMessage::ConnectionId { data } => Ok(data.id),
        other => anyhow::bail!("unexpected {:?}", other),
    }
}

#[tokio::test]
async fn test_ws_end_to_end() -> Result<()> {
    init_tracing();
    let addr = start_relay(|s| s).await?;
    let url = format!("ws://{addr}/");

    let (mut feed, _) = connect_async(url.as_str()).await?;
    let feed_id = handshake(&mut feed).await?;

    let (mut mixer, _) = connect_async(url.as_str()).await?;
    let mixer_id = handshake(&mut mixer).await?;
    assert_ne!(feed_id, mixer_id);

    let setup = SignalMessage::SetupMessage {
        sender_id: feed_id,
        target_id: None,
        data: SetupData {
            name: "cam1".into(),
            role: Role::Feed,
        },
    };
    feed.send(Message::Text(serde_json::to_string(&setup)?.into()))
        .await?;

    match next_matching(&mut feed, |m| matches!(m, SignalMessage::SetupConfirmation { .. })).await? {
        SignalMessage::SetupConfirmation { target_id, data } => {
            assert_eq!(target_id, feed_id);
            assert_eq!(data.name, "cam1");
        }
        other => anyhow::bail!("unexpected {:?}", other),
    }

    let list = next_matching(&mut mixer, |m| match m {
        SignalMessage::ConnectionList { data } => data.iter().any(|e| e.name == "cam1"),
        _ => false,
    })
    .await?;
    let SignalMessage::ConnectionList { data } = list else {
        anyhow::bail!("not a list");
    };
    assert!(data.iter().any(|e| e.id == mixer_id));

    feed.close(None).await?;

    next_matching(&mut mixer, |m| match m {
        SignalMessage::ConnectionList { data } => data.iter().all(|e| e.id != feed_id),
        _ => false,
    })
    .await?;

    Ok(())
}

struct DenyAll;

impl OriginPolicy for DenyAll {
    fn is_allowed(&self, _origin: Option<&str>) -> bool {
        false
    }
}

#[tokio::test]
async fn test_ws_origin_rejected() -> Result<()> {
    init_tracing();
    let addr = start_relay(|s| s.with_origin_policy(DenyAll)).await?;

    let res = connect_async(format!("ws://{addr}/")).await;
    assert!(res.is_err(), "upgrade must be refused");
    Ok(())
}
