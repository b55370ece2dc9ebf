use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// What a peer does in a session.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, Hash, Eq, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Hub that receives every feed and picks one to re-broadcast.
    Mixer,
    /// Camera/microphone source.
    Feed,
    /// Client-local watcher, receives only.
    Viewer,
}

/// Transceiver direction a peer connection is built with.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum TransceiverDirection {
    SendOnly,
    RecvOnly,
    SendRecv,
}

impl Role {
    pub fn transceiver_direction(self) -> TransceiverDirection {
        match self {
            Role::Feed => TransceiverDirection::SendOnly,
            Role::Viewer => TransceiverDirection::RecvOnly,
            Role::Mixer => TransceiverDirection::SendRecv,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Role::Mixer => "mixer",
            Role::Feed => "feed",
            Role::Viewer => "viewer",
        }
    }
}

impl TransceiverDirection {
    pub fn sends(self) -> bool {
        !matches!(self, TransceiverDirection::RecvOnly)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "mixer" => Ok(Role::Mixer),
            "feed" => Ok(Role::Feed),
            "viewer" => Ok(Role::Viewer),
            other => Err(format!("unknown role {other:?}")),
        }
    }
}
