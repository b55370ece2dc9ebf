use mixcast_core::{PeerId, SessionDescription, SignalMessage};
use tracing::info;

use crate::engine::OfferOutcome;
use crate::{ClientEngine, NegotiationError, PeerEvent, SessionEvent, SignalingState};

impl ClientEngine {
    /// Applies a remote offer and answers it.
    ///
    /// An offer that collides with our own is settled by id order. The peer
    /// with the lower id is polite: it drops the connection holding its own
    /// offer and answers on a fresh one. The other peer ignores the incoming
    /// offer and waits for the answer to its own.
    pub(super) async fn handle_remote_offer(
        &mut self,
        sender_id: PeerId,
        name: Option<String>,
        sdp: SessionDescription,
    ) -> Result<OfferOutcome, NegotiationError> {
        if self.local_id.is_none() {
            return Err(NegotiationError::NotIdentified);
        }

        if !self.sessions.contains_key(&sender_id) {
            self.create_session(sender_id, name.clone()).await?;
        }

        let session = self
            .sessions
            .get_mut(&sender_id)
            .ok_or(NegotiationError::UnknownSession(sender_id))?;
        if name.is_some() {
            session.remote_name = name;
        }

        let restarted = session.peer.signaling_state() != SignalingState::Stable;
        if restarted {
            if !self.is_polite_towards(&sender_id) {
                info!(
                    "Offer from {} collides with ours; keeping ours (NegotiationRaceDeferred)",
                    sender_id
                );
                return Ok(OfferOutcome::Deferred);
            }

            info!("Offer from {} collides with ours; restarting our side", sender_id);
            self.restart_session(sender_id).await?;
        }

        let (peer, epoch) = self
            .sessions
            .get(&sender_id)
            .map(|s| (s.peer.clone(), s.epoch))
            .ok_or(NegotiationError::UnknownSession(sender_id))?;

        peer.set_remote_description(sdp).await?;
        self.flush_candidates(sender_id).await;
        self.send_answer(sender_id).await?;

        if !restarted {
            return Ok(OfferOutcome::Answered);
        }

        // our offer went away with the old connection
        let _ = self.event_tx.send(SessionEvent {
            remote_id: sender_id,
            epoch,
            event: PeerEvent::NegotiationNeeded,
        });
        Ok(OfferOutcome::Restarted)
    }

    /// Swaps the connection to `remote_id` for a new one, keeping the
    /// remote's name and its queued candidates.
    async fn restart_session(&mut self, remote_id: PeerId) -> Result<(), NegotiationError> {
        let (remote_name, pending) = self
            .sessions
            .get_mut(&remote_id)
            .map(|s| (s.remote_name.clone(), std::mem::take(&mut s.pending_candidates)))
            .ok_or(NegotiationError::UnknownSession(remote_id))?;

        self.close_session(remote_id, false).await;
        self.create_session(remote_id, remote_name).await?;

        if let Some(session) = self.sessions.get_mut(&remote_id) {
            session.pending_candidates = pending;
        }
        Ok(())
    }

    async fn send_answer(&mut self, remote_id: PeerId) -> Result<(), NegotiationError> {
        let local_id = self.local_id.ok_or(NegotiationError::NotIdentified)?;
        let peer = self
            .sessions
            .get(&remote_id)
            .map(|s| s.peer.clone())
            .ok_or(NegotiationError::UnknownSession(remote_id))?;

        let answer = peer.create_answer().await?;
        peer.set_local_description(answer.clone()).await?;

        info!("Sending answer to {}", remote_id);
        self.send(SignalMessage::VideoAnswer {
            sender_id: local_id,
            target_id: remote_id,
            name: Some(self.display_name.clone()),
            sdp: answer,
        });
        Ok(())
    }
}
