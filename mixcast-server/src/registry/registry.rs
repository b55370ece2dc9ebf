use crate::registry::PeerRecord;
use crate::transport::PeerChannel;
use mixcast_core::{PeerId, PeerSummary};
use std::collections::HashMap;

/// Every accepted connection, keyed by the id handed out at accept time.
#[derive(Debug, Default)]
pub struct Registry {
    peers: HashMap<PeerId, PeerRecord>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Draws a random id no live record uses.
    pub fn allocate_id(&self) -> PeerId {
        loop {
            let id = PeerId::new();
            if !self.peers.contains_key(&id) {
                return id;
            }
        }
    }

    pub fn insert(&mut self, record: PeerRecord) {
        self.peers.insert(record.id, record);
    }

    pub fn remove(&mut self, peer_id: &PeerId) -> Option<PeerRecord> {
        self.peers.remove(peer_id)
    }

    pub fn get(&self, peer_id: &PeerId) -> Option<&PeerRecord> {
        self.peers.get(peer_id)
    }

    pub fn get_mut(&mut self, peer_id: &PeerId) -> Option<&mut PeerRecord> {
        self.peers.get_mut(peer_id)
    }

    pub fn len(&self) -> usize {
        self.peers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.peers.is_empty()
    }

    /// Whether a set-up record other than `except` already displays `name`.
    pub fn name_taken(&self, name: &str, except: &PeerId) -> bool {
        self.peers.values().any(|record| {
            record.id != *except && record.role.is_some() && record.display_name == name
        })
    }

    /// Copies out every channel so a broadcast never iterates the map itself.
    pub fn channels(&self) -> Vec<(PeerId, PeerChannel)> {
        self.peers
            .values()
            .map(|record| (record.id, record.channel.clone()))
            .collect()
    }

    /// Presence view: open connections only.
    pub fn open_summaries(&self) -> Vec<PeerSummary> {
        self.peers
            .values()
            .filter(|record| record.channel.is_open())
            .map(PeerRecord::summary)
            .collect()
    }
}
