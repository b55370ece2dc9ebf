use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use mixcast_core::{IceCandidate, IceServerConfig, PeerId, SessionDescription, TransceiverDirection};
use tokio::sync::mpsc;

use crate::RtcError;

mod webrtc_engine;

pub use webrtc_engine::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignalingState {
    Stable,
    HaveLocalOffer,
    HaveRemoteOffer,
    HaveLocalPranswer,
    HaveRemotePranswer,
    Closed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IceConnectionState {
    New,
    Checking,
    Connected,
    Completed,
    Disconnected,
    Failed,
    Closed,
}

impl IceConnectionState {
    /// States after which the connection never recovers.
    pub fn is_terminal(self) -> bool {
        matches!(self, IceConnectionState::Failed | IceConnectionState::Closed)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackKind {
    Audio,
    Video,
}

/// A remote media track as seen by the multiplexer.
pub trait MediaTrack: Send + Sync + fmt::Debug {
    fn id(&self) -> &str;
    fn kind(&self) -> TrackKind;
    fn is_enabled(&self) -> bool;
    fn set_enabled(&self, enabled: bool);
}

#[derive(Debug)]
pub enum PeerEvent {
    /// `None` marks the end of gathering.
    IceCandidate(Option<IceCandidate>),
    Track {
        stream_id: String,
        tracks: Vec<Arc<dyn MediaTrack>>,
    },
    NegotiationNeeded,
    IceConnectionState(IceConnectionState),
    SignalingState(SignalingState),
}

/// A [`PeerEvent`] tagged with the session it came from.
#[derive(Debug)]
pub struct SessionEvent {
    pub remote_id: PeerId,
    pub epoch: u64,
    pub event: PeerEvent,
}

/// Where a peer connection reports its callbacks.
///
/// The epoch lets the engine drop events from a connection it already
/// tore down.
#[derive(Debug, Clone)]
pub struct PeerEventSink {
    remote_id: PeerId,
    epoch: u64,
    tx: mpsc::UnboundedSender<SessionEvent>,
}

impl PeerEventSink {
    pub fn new(remote_id: PeerId, epoch: u64, tx: mpsc::UnboundedSender<SessionEvent>) -> Self {
        Self {
            remote_id,
            epoch,
            tx,
        }
    }

    pub fn remote_id(&self) -> PeerId {
        self.remote_id
    }

    pub fn emit(&self, event: PeerEvent) -> bool {
        self.tx
            .send(SessionEvent {
                remote_id: self.remote_id,
                epoch: self.epoch,
                event,
            })
            .is_ok()
    }
}

#[derive(Debug, Clone)]
pub struct PeerConfig {
    pub remote_id: PeerId,
    pub direction: TransceiverDirection,
    pub ice_servers: Vec<IceServerConfig>,
}

/// Factory for peer connections. Sending directions acquire local media
/// here, so capture failures surface as [`RtcError::Media`].
#[async_trait]
pub trait RtcEngine: Send + Sync {
    async fn create_peer(
        &self,
        config: PeerConfig,
        events: PeerEventSink,
    ) -> Result<Arc<dyn RtcPeer>, RtcError>;
}

/// One peer connection.
///
/// Transitions follow the offer/answer state machine without `rollback`:
/// a connection stuck with an unwanted local offer is replaced instead.
#[async_trait]
pub trait RtcPeer: Send + Sync {
    fn signaling_state(&self) -> SignalingState;
    async fn has_remote_description(&self) -> bool;
    /// Whether local media differs from what the last completed exchange
    /// agreed on. Negotiation-needed events are re-checked against this.
    async fn needs_negotiation(&self) -> bool;
    async fn create_offer(&self) -> Result<SessionDescription, RtcError>;
    async fn create_answer(&self) -> Result<SessionDescription, RtcError>;
    async fn set_local_description(&self, desc: SessionDescription) -> Result<(), RtcError>;
    async fn set_remote_description(&self, desc: SessionDescription) -> Result<(), RtcError>;
    async fn add_ice_candidate(&self, candidate: IceCandidate) -> Result<(), RtcError>;
    /// Stops further callbacks from reaching the engine.
    fn detach_handlers(&self);
    async fn close(&self) -> Result<(), RtcError>;
}
