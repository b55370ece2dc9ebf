use mixcast_core::{EnvelopeError, PeerId};
use thiserror::Error;

/// Reasons a frame was not delivered. These are logged by the relay and
/// never reported back to the sender.
#[derive(Debug, Error)]
pub enum RelayError {
    #[error("connection not found: {0}")]
    ConnectionNotFound(String),

    #[error("connection {0} is not connected")]
    TargetNotConnected(PeerId),

    #[error(transparent)]
    MalformedMessage(#[from] EnvelopeError),

    #[error("setup from unknown sender {0:?}")]
    UnknownSender(Option<String>),

    #[error("hub is no longer running")]
    HubClosed,
}
