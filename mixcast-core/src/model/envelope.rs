use crate::model::peer::PeerId;
use crate::model::signaling::SignalMessage;
use serde::Deserialize;
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EnvelopeError {
    #[error("malformed message: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("message of {size} bytes exceeds the {limit} byte limit")]
    TooLarge { size: usize, limit: usize },
}

/// Closed set of `type` values the relay understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MessageKind {
    ConnectionId,
    ConnectionList,
    SetupMessage,
    SetupConfirmation,
    VideoOffer,
    VideoAnswer,
    NewIceCandidate,
    HangUp,
}

/// The fields the relay needs to route a frame; everything else is opaque.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoutingHeader {
    #[serde(rename = "type")]
    pub kind: MessageKind,
    #[serde(default)]
    pub target_id: Option<String>,
    #[serde(default)]
    pub sender_id: Option<String>,
}

/// A parsed inbound frame. The original text is kept so relayed frames go
/// out byte-for-byte as they came in.
#[derive(Debug, Clone)]
pub struct Envelope {
    pub header: RoutingHeader,
    pub raw: Arc<str>,
}

impl Envelope {
    pub fn parse(text: &str, limit: usize) -> Result<Self, EnvelopeError> {
        if text.len() > limit {
            return Err(EnvelopeError::TooLarge {
                size: text.len(),
                limit,
            });
        }

        let header: RoutingHeader = serde_json::from_str(text)?;
        Ok(Self {
            header,
            raw: Arc::from(text),
        })
    }

    pub fn kind(&self) -> MessageKind {
        self.header.kind
    }

    /// The full typed message, for the frames the relay acts on itself.
    pub fn decode(&self) -> Result<SignalMessage, EnvelopeError> {
        Ok(serde_json::from_str(&self.raw)?)
    }

    pub fn sender(&self) -> Option<PeerId> {
        self.header.sender_id.as_deref()?.parse().ok()
    }
}
