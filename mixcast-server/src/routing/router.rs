use crate::error::RelayError;
use crate::registry::Registry;
use crate::routing::{broadcast_presence, handle_setup};
use mixcast_core::{Envelope, MessageKind, PeerId, SignalMessage};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Entry point for every inbound frame.
#[derive(Debug, Clone)]
pub struct Router {
    max_message_size: usize,
}

impl Router {
    pub fn new(max_message_size: usize) -> Self {
        Self { max_message_size }
    }

    pub fn dispatch(&self, registry: &mut Registry, from: &PeerId, text: &str) {
        let envelope = match Envelope::parse(text, self.max_message_size) {
            Ok(envelope) => envelope,
            Err(e) => {
                warn!("Dropping frame from {}: {}", from, e);
                return;
            }
        };

        match envelope.kind() {
            MessageKind::SetupMessage => {
                if let Err(e) = handle_setup(registry, &envelope) {
                    warn!("Setup from {} ignored: {}", from, e);
                }
                broadcast_presence(registry);
            }
            kind => self.relay(registry, &envelope, kind),
        }
    }

    fn relay(&self, registry: &Registry, envelope: &Envelope, kind: MessageKind) {
        match envelope.header.target_id.as_deref() {
            Some(target) => match deliver(registry, target, envelope.raw.clone()) {
                Ok(()) => info!("Relayed {:?} to {}", kind, target),
                Err(e) => warn!("Dropping {:?}: {}", kind, e),
            },
            None => {
                let delivered = broadcast(registry, envelope.raw.clone());
                info!("Broadcast {:?} to {} peers", kind, delivered);
            }
        }
    }
}

/// Writes one frame to `target`, which may be any string a peer sent.
pub fn deliver(registry: &Registry, target: &str, frame: Arc<str>) -> Result<(), RelayError> {
    let peer_id: PeerId = target
        .parse()
        .map_err(|_| RelayError::ConnectionNotFound(target.to_owned()))?;
    let record = registry
        .get(&peer_id)
        .ok_or_else(|| RelayError::ConnectionNotFound(target.to_owned()))?;

    record.channel.send(&peer_id, frame)
}

/// Writes one frame to every open channel and returns how many took it.
pub fn broadcast(registry: &Registry, frame: Arc<str>) -> usize {
    let mut delivered = 0;

    for (peer_id, channel) in registry.channels() {
        match channel.send(&peer_id, frame.clone()) {
            Ok(()) => delivered += 1,
            Err(e) => debug!("Broadcast skipped {}: {}", peer_id, e),
        }
    }

    delivered
}

/// Serializes a relay-originated message once and sends it.
pub fn send_message(
    registry: &Registry,
    message: &SignalMessage,
    target: Option<&PeerId>,
) -> Result<usize, RelayError> {
    let json = serde_json::to_string(message)
        .map_err(|e| RelayError::MalformedMessage(e.into()))?;
    let frame: Arc<str> = Arc::from(json);

    match target {
        Some(peer_id) => deliver(registry, &peer_id.to_string(), frame).map(|()| 1),
        None => Ok(broadcast(registry, frame)),
    }
}
