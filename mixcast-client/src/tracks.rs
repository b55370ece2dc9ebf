use std::collections::HashMap;
use std::sync::Arc;

use mixcast_core::{PeerId, Role};
use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::MediaTrack;

#[derive(Debug)]
struct StreamEntry {
    remote_id: PeerId,
    tracks: Vec<Arc<dyn MediaTrack>>,
}

#[derive(Debug, Default)]
struct TrackIndex {
    streams: HashMap<String, StreamEntry>,
    selected: Option<String>,
}

/// Remote tracks grouped by stream id.
///
/// On a mixer every incoming track starts disabled and at most one stream
/// is enabled at a time, chosen with [`TrackMultiplexer::select_stream`].
/// A track arriving late for the selected stream needs a fresh selection.
/// Other roles play everything they receive.
#[derive(Debug)]
pub struct TrackMultiplexer {
    role: Role,
    index: Mutex<TrackIndex>,
}

impl TrackMultiplexer {
    pub fn new(role: Role) -> Self {
        Self {
            role,
            index: Mutex::new(TrackIndex::default()),
        }
    }

    pub fn role(&self) -> Role {
        self.role
    }

    /// Registers tracks delivered by `remote_id` under `stream_id`.
    pub async fn on_track(
        &self,
        remote_id: PeerId,
        stream_id: String,
        tracks: Vec<Arc<dyn MediaTrack>>,
    ) {
        let mut index = self.index.lock().await;
        let enable = !matches!(self.role, Role::Mixer);

        let entry = index
            .streams
            .entry(stream_id.clone())
            .or_insert_with(|| StreamEntry {
                remote_id,
                tracks: Vec::new(),
            });

        for track in tracks {
            if entry.tracks.iter().any(|known| known.id() == track.id()) {
                continue;
            }
            track.set_enabled(enable);
            debug!(
                "Track {} ({:?}) from {} on stream {}",
                track.id(),
                track.kind(),
                remote_id,
                stream_id
            );
            entry.tracks.push(track);
        }
    }

    /// Enables `stream_id` and disables every other stream.
    ///
    /// Returns `false` when no such stream is known; everything is disabled
    /// in that case.
    pub async fn select_stream(&self, stream_id: &str) -> bool {
        let mut index = self.index.lock().await;
        let mut found = false;

        for (id, entry) in &index.streams {
            let on = id == stream_id;
            found |= on;
            for track in &entry.tracks {
                track.set_enabled(on);
            }
        }

        index.selected = found.then(|| stream_id.to_owned());
        info!("Selected stream: {:?}", index.selected);
        found
    }

    pub async fn disable_track(&self, track_id: &str) -> bool {
        let index = self.index.lock().await;
        let track = index
            .streams
            .values()
            .flat_map(|entry| entry.tracks.iter())
            .find(|track| track.id() == track_id);

        match track {
            Some(track) => {
                track.set_enabled(false);
                true
            }
            None => false,
        }
    }

    /// Known stream ids, sorted.
    pub async fn streams(&self) -> Vec<String> {
        let index = self.index.lock().await;
        let mut ids: Vec<String> = index.streams.keys().cloned().collect();
        ids.sort();
        ids
    }

    /// Streams with at least one enabled track.
    pub async fn enabled_streams(&self) -> Vec<String> {
        let index = self.index.lock().await;
        let mut ids: Vec<String> = index
            .streams
            .iter()
            .filter(|(_, entry)| entry.tracks.iter().any(|t| t.is_enabled()))
            .map(|(id, _)| id.clone())
            .collect();
        ids.sort();
        ids
    }

    pub async fn selected(&self) -> Option<String> {
        self.index.lock().await.selected.clone()
    }

    pub async fn tracks(&self, stream_id: &str) -> Vec<Arc<dyn MediaTrack>> {
        let index = self.index.lock().await;
        index
            .streams
            .get(stream_id)
            .map(|entry| entry.tracks.clone())
            .unwrap_or_default()
    }

    /// Drops every stream received from `remote_id`.
    pub async fn forget_remote(&self, remote_id: &PeerId) {
        let mut index = self.index.lock().await;
        index.streams.retain(|_, entry| entry.remote_id != *remote_id);

        let selected_gone = index
            .selected
            .as_ref()
            .is_some_and(|id| !index.streams.contains_key(id));
        if selected_gone {
            index.selected = None;
        }
    }
}
