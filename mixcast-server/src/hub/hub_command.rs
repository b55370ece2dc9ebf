use crate::transport::PeerChannel;
use mixcast_core::{PeerId, PeerSummary};
use tokio::sync::oneshot;

/// Everything the transport layer can ask of the hub.
#[derive(Debug)]
pub enum HubCommand {
    /// A socket was accepted; the hub replies with the id it assigned.
    Accept {
        channel: PeerChannel,
        reply: oneshot::Sender<PeerId>,
    },

    /// A text frame from `peer_id`, in arrival order.
    Inbound { peer_id: PeerId, text: String },

    /// The socket of `peer_id` is gone.
    Close { peer_id: PeerId },

    /// Current presence view plus the raw registry size.
    Snapshot {
        reply: oneshot::Sender<HubSnapshot>,
    },
}

#[derive(Debug, Clone)]
pub struct HubSnapshot {
    pub registered: usize,
    pub open: Vec<PeerSummary>,
}
