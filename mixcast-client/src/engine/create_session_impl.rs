use mixcast_core::PeerId;
use tracing::{info, warn};

use crate::engine::NegotiationSession;
use crate::{ClientEngine, MediaError, NegotiationError, PeerConfig, PeerEventSink, RtcError};

impl ClientEngine {
    /// Builds a peer connection towards `remote_id` with the transceivers
    /// our role calls for.
    pub(super) async fn create_session(
        &mut self,
        remote_id: PeerId,
        remote_name: Option<String>,
    ) -> Result<(), NegotiationError> {
        let direction = self.config.role.transceiver_direction();
        self.next_epoch += 1;
        let epoch = self.next_epoch;

        let config = PeerConfig {
            remote_id,
            direction,
            ice_servers: self.config.effective_ice_servers(),
        };
        let sink = PeerEventSink::new(remote_id, epoch, self.event_tx.clone());

        let peer = match self.rtc.create_peer(config, sink).await {
            Ok(peer) => peer,
            Err(RtcError::Media(e)) => {
                self.report_media_error(&e);
                return Err(RtcError::Media(e).into());
            }
            Err(e) => return Err(e.into()),
        };

        info!("Session with {} created ({:?})", remote_id, direction);
        self.sessions.insert(
            remote_id,
            NegotiationSession::new(remote_id, remote_name, direction, epoch, peer),
        );
        Ok(())
    }

    fn report_media_error(&self, error: &MediaError) {
        match error.notice() {
            Some(notice) => {
                warn!("Media error: {}", error);
                let _ = self.notice_tx.send(notice);
            }
            None => info!("Media access refused ({}); cancelling call", error),
        }
    }
}
