use std::collections::VecDeque;
use std::sync::Arc;

use mixcast_core::{IceCandidate, PeerId, TransceiverDirection};

use crate::RtcPeer;

/// Per-remote negotiation state owned by the engine.
pub(crate) struct NegotiationSession {
    pub remote_id: PeerId,
    pub remote_name: Option<String>,
    pub direction: TransceiverDirection,
    /// Distinguishes this connection's callbacks from a torn-down one.
    pub epoch: u64,
    pub peer: Arc<dyn RtcPeer>,
    /// Remote candidates that arrived before any remote description.
    pub pending_candidates: VecDeque<IceCandidate>,
}

impl NegotiationSession {
    pub fn new(
        remote_id: PeerId,
        remote_name: Option<String>,
        direction: TransceiverDirection,
        epoch: u64,
        peer: Arc<dyn RtcPeer>,
    ) -> Self {
        Self {
            remote_id,
            remote_name,
            direction,
            epoch,
            peer,
            pending_candidates: VecDeque::new(),
        }
    }
}
