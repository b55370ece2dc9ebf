use mixcast_core::{IceCandidate, PeerId, SignalMessage};
use tracing::{debug, warn};

use crate::{ClientEngine, NegotiationError};

impl ClientEngine {
    /// Adds a remote candidate, or queues it until a remote description is
    /// in place.
    pub(super) async fn handle_remote_candidate(
        &mut self,
        sender_id: PeerId,
        candidate: IceCandidate,
    ) -> Result<(), NegotiationError> {
        let session = self
            .sessions
            .get_mut(&sender_id)
            .ok_or(NegotiationError::UnknownSession(sender_id))?;

        if !session.peer.has_remote_description().await {
            debug!("Queueing candidate from {} until its description", sender_id);
            session.pending_candidates.push_back(candidate);
            return Ok(());
        }

        session.peer.add_ice_candidate(candidate).await?;
        Ok(())
    }

    /// Applies queued candidates in arrival order.
    pub(super) async fn flush_candidates(&mut self, remote_id: PeerId) {
        let Some(session) = self.sessions.get_mut(&remote_id) else {
            return;
        };

        let peer = session.peer.clone();
        let queued: Vec<IceCandidate> = session.pending_candidates.drain(..).collect();
        if !queued.is_empty() {
            debug!("Applying {} queued candidates from {}", queued.len(), remote_id);
        }

        for candidate in queued {
            if let Err(e) = peer.add_ice_candidate(candidate).await {
                warn!("Failed to add queued candidate from {}: {:#}", remote_id, e);
            }
        }
    }

    pub(super) fn send_local_candidate(&self, remote_id: PeerId, candidate: IceCandidate) {
        let Some(local_id) = self.local_id else {
            warn!("Dropping local candidate: no id assigned yet");
            return;
        };

        self.send(SignalMessage::NewIceCandidate {
            sender_id: local_id,
            target_id: remote_id,
            candidate,
        });
    }
}
