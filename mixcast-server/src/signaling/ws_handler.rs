use crate::signaling::RelayState;
use crate::transport::{ChannelEnd, ChannelState, PeerChannel};
use axum::extract::State;
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{IntoResponse, Response};
use futures::{SinkExt, StreamExt};
use mixcast_core::utils::SIGNALING_PROTOCOL;
use tracing::{error, info, warn};

pub async fn ws_handler(
    ws: WebSocketUpgrade,
    headers: HeaderMap,
    State(state): State<RelayState>,
) -> Response {
    let origin = headers
        .get(header::ORIGIN)
        .and_then(|value| value.to_str().ok())
        .map(str::to_owned);

    if !state.origins.is_allowed(origin.as_deref()) {
        info!("Connection from origin {:?} rejected", origin);
        return StatusCode::FORBIDDEN.into_response();
    }

    ws.protocols([SIGNALING_PROTOCOL])
        .on_upgrade(move |socket| handle_socket(socket, state, origin))
}

async fn handle_socket(socket: WebSocket, state: RelayState, origin: Option<String>) {
    let (mut sender, mut receiver) = socket.split();
    let (channel, end) = PeerChannel::new();
    let ChannelEnd {
        state: state_tx,
        mut frames,
    } = end;

    let peer_id = match state.hub.accept(channel).await {
        Ok(id) => id,
        Err(e) => {
            error!("Hub refused connection: {}", e);
            return;
        }
    };
    info!("Connection {} accepted from origin {:?}", peer_id, origin);

    let mut send_task = tokio::spawn(async move {
        while let Some(frame) = frames.recv().await {
            if sender.send(Message::Text(frame.to_string().into())).await.is_err() {
                break;
            }
        }
    });

    // The writer is running, so the record can be announced.
    state_tx.send_replace(ChannelState::Open);

    let mut recv_task = tokio::spawn({
        let hub = state.hub.clone();
        let limit = state.max_message_size;

        async move {
            while let Some(Ok(msg)) = receiver.next().await {
                match msg {
                    Message::Text(text) => {
                        let size = text.as_str().len();
                        if size > limit {
                            warn!(
                                "Dropping {} byte frame from {} (limit {})",
                                size,
                                peer_id,
                                limit
                            );
                            continue;
                        }
                        if let Err(e) = hub.inbound(peer_id, text.as_str().to_owned()).await {
                            error!("Hub died: {}", e);
                            break;
                        }
                    }
                    Message::Binary(_) => warn!("Ignoring binary frame from {}", peer_id),
                    Message::Close(_) => break,
                    _ => {}
                }
            }
        }
    });

    tokio::select! {
        _ = (&mut send_task) => recv_task.abort(),
        _ = (&mut recv_task) => send_task.abort(),
    };

    state_tx.send_replace(ChannelState::Closed);
    if let Err(e) = state.hub.close(peer_id).await {
        warn!("Close for {} not delivered: {}", peer_id, e);
    }
    info!("WebSocket disconnected: {}", peer_id);
}
