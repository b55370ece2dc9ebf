use tracing::{debug, error, info};

use crate::{ClientEngine, PeerEvent, SessionEvent, SignalingState};

impl ClientEngine {
    pub(super) async fn handle_peer_event(&mut self, event: SessionEvent) {
        let SessionEvent {
            remote_id,
            epoch,
            event,
        } = event;

        let current = self.sessions.get(&remote_id).map(|s| s.epoch);
        if current != Some(epoch) {
            debug!("Dropping {:?} from a closed connection with {}", event, remote_id);
            return;
        }

        match event {
            PeerEvent::IceCandidate(Some(candidate)) => {
                self.send_local_candidate(remote_id, candidate);
            }

            PeerEvent::IceCandidate(None) => {
                debug!("Candidate gathering for {} complete", remote_id);
            }

            PeerEvent::Track { stream_id, tracks } => {
                self.tracks.on_track(remote_id, stream_id, tracks).await;
            }

            PeerEvent::NegotiationNeeded => {
                if let Err(e) = self.handle_negotiation_needed(remote_id).await {
                    error!("Negotiation with {} failed: {:#}", remote_id, e);
                }
            }

            PeerEvent::IceConnectionState(state) if state.is_terminal() => {
                info!("ICE connection with {} is {:?}", remote_id, state);
                self.close_session(remote_id, false).await;
            }

            PeerEvent::IceConnectionState(state) => {
                debug!("ICE connection with {} is {:?}", remote_id, state);
            }

            PeerEvent::SignalingState(SignalingState::Closed) => {
                self.close_session(remote_id, false).await;
            }

            PeerEvent::SignalingState(state) => {
                debug!("Signaling with {} is {:?}", remote_id, state);
            }
        }
    }
}
