use mixcast_core::{SetupData, SignalMessage};
use tracing::{debug, error, info, warn};

use crate::{ClientEngine, NegotiationError};

impl ClientEngine {
    pub(super) async fn handle_signal(&mut self, text: String) {
        let msg: SignalMessage = match serde_json::from_str(&text) {
            Ok(m) => m,
            Err(e) => {
                warn!("Unparseable relay frame: {}. Text: {}", e, text);
                return;
            }
        };

        match msg {
            SignalMessage::ConnectionId { data } => {
                info!("Assigned id {}", data.id);
                self.local_id = Some(data.id);
                self.id_tx.send_replace(Some(data.id));

                self.send(SignalMessage::SetupMessage {
                    sender_id: data.id,
                    target_id: None,
                    data: SetupData {
                        name: self.config.name.clone(),
                        role: self.config.role,
                    },
                });
            }

            SignalMessage::ConnectionList { data } => {
                debug!("Roster now has {} peers", data.len());
                self.roster_tx.send_replace(data);
            }

            SignalMessage::SetupConfirmation { data, .. } => {
                if data.name != self.display_name {
                    info!("Relay renamed us to {}", data.name);
                }
                self.display_name = data.name;
            }

            SignalMessage::VideoOffer {
                sender_id,
                name,
                sdp,
                ..
            } => match self.handle_remote_offer(sender_id, name, sdp).await {
                Ok(outcome) => debug!("Offer from {}: {:?}", sender_id, outcome),
                Err(e) => error!("Failed to handle offer from {}: {:#}", sender_id, e),
            },

            SignalMessage::VideoAnswer {
                sender_id,
                name,
                sdp,
                ..
            } => match self.handle_answer(sender_id, name, sdp).await {
                Ok(()) => {}
                Err(NegotiationError::StaleAnswer(id)) => {
                    warn!("Dropping stale answer from {}", id);
                }
                Err(e) => error!("Failed to apply answer from {}: {:#}", sender_id, e),
            },

            SignalMessage::NewIceCandidate {
                sender_id,
                candidate,
                ..
            } => {
                if let Err(e) = self.handle_remote_candidate(sender_id, candidate).await {
                    warn!("Dropping candidate from {}: {:#}", sender_id, e);
                }
            }

            SignalMessage::HangUp { sender_id, .. } => {
                info!("{} hung up", sender_id);
                self.close_session(sender_id, false).await;
            }

            SignalMessage::SetupMessage { .. } => {
                debug!("Ignoring setup-message relayed to a client");
            }
        }
    }
}
