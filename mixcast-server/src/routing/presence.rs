use crate::registry::Registry;
use crate::routing::send_message;
use mixcast_core::{ConnectionIdData, PeerId, SignalMessage};
use tracing::{debug, info, warn};

pub fn presence_message(registry: &Registry) -> SignalMessage {
    SignalMessage::ConnectionList {
        data: registry.open_summaries(),
    }
}

/// Pushes the current `connection-list` to everyone.
pub fn broadcast_presence(registry: &Registry) -> usize {
    match send_message(registry, &presence_message(registry), None) {
        Ok(delivered) => {
            debug!("Presence sent to {} peers", delivered);
            delivered
        }
        Err(e) => {
            warn!("Presence broadcast failed: {}", e);
            0
        }
    }
}

/// First announcement of a freshly opened peer: its own id, then the
/// roster to everyone. Runs at most once per record.
pub fn announce(registry: &mut Registry, peer_id: &PeerId) -> bool {
    let Some(record) = registry.get_mut(peer_id) else {
        debug!("Peer {} left before it was announced", peer_id);
        return false;
    };
    if record.announced || !record.channel.is_open() {
        return false;
    }
    record.announced = true;

    let message = SignalMessage::ConnectionId {
        data: ConnectionIdData {
            id: record.id,
            name: record.display_name.clone(),
        },
    };

    if let Err(e) = send_message(registry, &message, Some(peer_id)) {
        warn!("connection-id for {} not delivered: {}", peer_id, e);
    }
    info!("Peer {} announced", peer_id);

    broadcast_presence(registry);
    true
}
