use mixcast_core::{PeerId, SignalMessage};
use tracing::{info, warn};

use crate::ClientEngine;

impl ClientEngine {
    /// Tears down the session with `remote_id`, telling the remote when
    /// `notify` is set. Returns `false` when there was no session.
    pub(super) async fn close_session(&mut self, remote_id: PeerId, notify: bool) -> bool {
        let Some(session) = self.sessions.remove(&remote_id) else {
            return false;
        };

        session.peer.detach_handlers();
        if let Err(e) = session.peer.close().await {
            warn!("Error closing connection with {}: {:#}", remote_id, e);
        }
        self.tracks.forget_remote(&remote_id).await;

        if notify {
            if let Some(local_id) = self.local_id {
                self.send(SignalMessage::HangUp {
                    sender_id: local_id,
                    target_id: remote_id,
                });
            }
        }

        info!("Session with {} closed", remote_id);
        true
    }

    pub(super) async fn close_all(&mut self) {
        let remotes: Vec<PeerId> = self.sessions.keys().copied().collect();
        for remote_id in remotes {
            self.close_session(remote_id, false).await;
        }
    }
}
