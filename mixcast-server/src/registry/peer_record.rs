use crate::transport::PeerChannel;
use mixcast_core::{PeerId, PeerSummary, Role};

/// Relay-side state of one accepted connection.
#[derive(Debug)]
pub struct PeerRecord {
    pub id: PeerId,
    pub display_name: String,
    pub role: Option<Role>,
    pub channel: PeerChannel,
    /// Set once `connection-id` has been sent.
    pub announced: bool,
}

impl PeerRecord {
    pub fn new(id: PeerId, channel: PeerChannel) -> Self {
        Self {
            id,
            display_name: String::new(),
            role: None,
            channel,
            announced: false,
        }
    }

    pub fn summary(&self) -> PeerSummary {
        PeerSummary {
            id: self.id,
            name: self.display_name.clone(),
            role: self.role,
        }
    }
}
