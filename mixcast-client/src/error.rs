use mixcast_core::PeerId;
use thiserror::Error;

/// Why local camera/microphone capture failed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MediaError {
    #[error("no camera and/or microphone found")]
    NotFound,

    #[error("media permission denied")]
    PermissionDenied,

    #[error("media access blocked by security policy")]
    Security,

    #[error("{0}")]
    Other(String),
}

/// Text meant for the person in front of the client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserNotice(pub String);

impl MediaError {
    /// `None` when the failure amounts to the user cancelling.
    pub fn notice(&self) -> Option<UserNotice> {
        match self {
            MediaError::NotFound => Some(UserNotice(
                "Unable to open your call because no camera and/or microphone were found."
                    .to_owned(),
            )),
            MediaError::PermissionDenied | MediaError::Security => None,
            MediaError::Other(message) => Some(UserNotice(format!(
                "Error opening your camera and/or microphone: {message}"
            ))),
        }
    }
}

#[derive(Debug, Error)]
pub enum RtcError {
    #[error(transparent)]
    Media(#[from] MediaError),

    #[error("invalid signaling state: {0}")]
    InvalidState(String),

    #[error("peer connection closed")]
    Closed,

    #[error(transparent)]
    Engine(#[from] anyhow::Error),
}

#[derive(Debug, Error)]
pub enum NegotiationError {
    #[error("answer from {0} arrived outside have-local-offer")]
    StaleAnswer(PeerId),

    #[error("no session with {0}")]
    UnknownSession(PeerId),

    #[error("local id not assigned yet")]
    NotIdentified,

    #[error("client engine stopped")]
    EngineStopped,

    #[error(transparent)]
    Rtc(#[from] RtcError),
}
