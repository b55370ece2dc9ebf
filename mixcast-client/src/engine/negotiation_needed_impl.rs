use mixcast_core::{PeerId, SignalMessage};
use tracing::{debug, info};

use crate::{ClientEngine, NegotiationError, SignalingState};

impl ClientEngine {
    /// Creates and sends an offer, unless an exchange is already under way
    /// or the connection has nothing new to offer. Events are re-checked
    /// here because they may predate the exchange that covered them.
    pub(super) async fn handle_negotiation_needed(
        &mut self,
        remote_id: PeerId,
    ) -> Result<(), NegotiationError> {
        let local_id = self.local_id.ok_or(NegotiationError::NotIdentified)?;
        let peer = self
            .sessions
            .get(&remote_id)
            .map(|s| s.peer.clone())
            .ok_or(NegotiationError::UnknownSession(remote_id))?;

        let state = peer.signaling_state();
        if state != SignalingState::Stable {
            debug!(
                "Connection with {} not stable yet ({:?}); postponing negotiation",
                remote_id, state
            );
            return Ok(());
        }
        if !peer.needs_negotiation().await {
            debug!("Nothing new to negotiate with {}", remote_id);
            return Ok(());
        }

        let offer = peer.create_offer().await?;
        peer.set_local_description(offer.clone()).await?;

        info!("Sending offer to {}", remote_id);
        self.send(SignalMessage::VideoOffer {
            sender_id: local_id,
            target_id: remote_id,
            name: Some(self.display_name.clone()),
            sdp: offer,
        });
        Ok(())
    }
}
