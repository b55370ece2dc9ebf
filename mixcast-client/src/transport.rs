use anyhow::Context;
use futures::{SinkExt, StreamExt};
use mixcast_core::SignalMessage;
use mixcast_core::utils::SIGNALING_PROTOCOL;
use tokio::sync::mpsc;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::tungstenite::client::IntoClientRequest;
use tokio_tungstenite::tungstenite::http::HeaderValue;
use tokio_tungstenite::tungstenite::http::header::SEC_WEBSOCKET_PROTOCOL;
use tracing::{debug, info, warn};

/// Opens the relay websocket.
///
/// Returns a sender for outgoing messages and a receiver of raw incoming
/// text frames. The receiver closes when the socket does.
pub async fn connect(
    url: &str,
) -> anyhow::Result<(
    mpsc::UnboundedSender<SignalMessage>,
    mpsc::UnboundedReceiver<String>,
)> {
    let mut request = url
        .into_client_request()
        .with_context(|| format!("Invalid relay url {url}"))?;
    request.headers_mut().insert(
        SEC_WEBSOCKET_PROTOCOL,
        HeaderValue::from_static(SIGNALING_PROTOCOL),
    );

    let (ws_stream, _) = connect_async(request)
        .await
        .with_context(|| format!("Failed to connect to {url}"))?;
    info!("Connected to relay at {}", url);

    let (mut ws_write, mut ws_read) = ws_stream.split();
    let (outbound_tx, mut outbound_rx) = mpsc::unbounded_channel::<SignalMessage>();
    let (inbound_tx, inbound_rx) = mpsc::unbounded_channel::<String>();

    tokio::spawn(async move {
        while let Some(msg) = outbound_rx.recv().await {
            let text = match serde_json::to_string(&msg) {
                Ok(text) => text,
                Err(e) => {
                    warn!("Failed to encode outbound message: {}", e);
                    continue;
                }
            };
            debug!("WS OUT: {}", text);
            if ws_write.send(Message::Text(text.into())).await.is_err() {
                break;
            }
        }
        let _ = ws_write.close().await;
    });

    tokio::spawn(async move {
        while let Some(msg) = ws_read.next().await {
            match msg {
                Ok(Message::Text(text)) => {
                    debug!("WS IN: {}", text.as_str());
                    if inbound_tx.send(text.as_str().to_owned()).is_err() {
                        break;
                    }
                }
                Ok(Message::Close(_)) => break,
                Ok(_) => {}
                Err(e) => {
                    warn!("Relay websocket error: {}", e);
                    break;
                }
            }
        }
        info!("Relay websocket closed");
    });

    Ok((outbound_tx, inbound_rx))
}
