use crate::model::peer::PeerId;
use crate::model::role::Role;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IceServerConfig {
    pub urls: Vec<String>,
    pub username: Option<String>,
    pub credential: Option<String>,
}

/// `{type, sdp}` exactly as the browser serializes an `RTCSessionDescription`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionDescription {
    #[serde(rename = "type")]
    pub sdp_type: SdpType,
    #[serde(default)]
    pub sdp: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SdpType {
    Offer,
    Pranswer,
    Answer,
    Rollback,
}

impl SessionDescription {
    pub fn offer(sdp: impl Into<String>) -> Self {
        Self {
            sdp_type: SdpType::Offer,
            sdp: sdp.into(),
        }
    }

    pub fn answer(sdp: impl Into<String>) -> Self {
        Self {
            sdp_type: SdpType::Answer,
            sdp: sdp.into(),
        }
    }

    pub fn rollback() -> Self {
        Self {
            sdp_type: SdpType::Rollback,
            sdp: String::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IceCandidate {
    pub candidate: String,
    #[serde(default)]
    pub sdp_mid: Option<String>,
    #[serde(default)]
    pub sdp_m_line_index: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username_fragment: Option<String>,
}

/// One entry of a `connection-list`, also the body of `setup-confirmation`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeerSummary {
    pub id: PeerId,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionIdData {
    pub id: PeerId,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetupData {
    pub name: String,
    #[serde(rename = "type")]
    pub role: Role,
}

/// Every frame exchanged with the relay, tagged by its `type` field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case", rename_all_fields = "camelCase")]
pub enum SignalMessage {
    ConnectionId {
        data: ConnectionIdData,
    },
    ConnectionList {
        data: Vec<PeerSummary>,
    },
    SetupMessage {
        sender_id: PeerId,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        target_id: Option<PeerId>,
        data: SetupData,
    },
    SetupConfirmation {
        target_id: PeerId,
        data: PeerSummary,
    },
    VideoOffer {
        sender_id: PeerId,
        target_id: PeerId,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        name: Option<String>,
        sdp: SessionDescription,
    },
    VideoAnswer {
        sender_id: PeerId,
        target_id: PeerId,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        name: Option<String>,
        sdp: SessionDescription,
    },
    NewIceCandidate {
        sender_id: PeerId,
        target_id: PeerId,
        candidate: IceCandidate,
    },
    HangUp {
        sender_id: PeerId,
        target_id: PeerId,
    },
}

impl SignalMessage {
    pub fn target_id(&self) -> Option<PeerId> {
        match self {
            SignalMessage::ConnectionId { .. } | SignalMessage::ConnectionList { .. } => None,
            SignalMessage::SetupMessage { target_id, .. } => *target_id,
            SignalMessage::SetupConfirmation { target_id, .. }
            | SignalMessage::VideoOffer { target_id, .. }
            | SignalMessage::VideoAnswer { target_id, .. }
            | SignalMessage::NewIceCandidate { target_id, .. }
            | SignalMessage::HangUp { target_id, .. } => Some(*target_id),
        }
    }

    pub fn sender_id(&self) -> Option<PeerId> {
        match self {
            SignalMessage::ConnectionId { .. }
            | SignalMessage::ConnectionList { .. }
            | SignalMessage::SetupConfirmation { .. } => None,
            SignalMessage::SetupMessage { sender_id, .. }
            | SignalMessage::VideoOffer { sender_id, .. }
            | SignalMessage::VideoAnswer { sender_id, .. }
            | SignalMessage::NewIceCandidate { sender_id, .. }
            | SignalMessage::HangUp { sender_id, .. } => Some(*sender_id),
        }
    }
}
