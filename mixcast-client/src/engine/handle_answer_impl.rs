use mixcast_core::{PeerId, SessionDescription};
use tracing::info;

use crate::{ClientEngine, NegotiationError, SignalingState};

impl ClientEngine {
    /// Completes an exchange we started. Answers arriving in any state but
    /// have-local-offer are stale and dropped.
    pub(super) async fn handle_answer(
        &mut self,
        sender_id: PeerId,
        name: Option<String>,
        sdp: SessionDescription,
    ) -> Result<(), NegotiationError> {
        let session = self
            .sessions
            .get_mut(&sender_id)
            .ok_or(NegotiationError::UnknownSession(sender_id))?;

        if session.peer.signaling_state() != SignalingState::HaveLocalOffer {
            return Err(NegotiationError::StaleAnswer(sender_id));
        }
        if name.is_some() {
            session.remote_name = name;
        }

        let peer = session.peer.clone();
        peer.set_remote_description(sdp).await?;
        info!("Answer from {} applied", sender_id);

        self.flush_candidates(sender_id).await;
        Ok(())
    }
}
