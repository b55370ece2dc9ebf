use std::collections::HashMap;
use std::sync::Arc;

use mixcast_core::{PeerId, PeerSummary, SignalMessage, TransceiverDirection};
use tokio::sync::{Mutex, mpsc, oneshot, watch};
use tracing::{info, warn};

use crate::{
    ClientConfig, NegotiationError, RtcEngine, SessionEvent, SignalingState, TrackMultiplexer,
    UserNotice,
};

mod create_session_impl;
mod handle_answer_impl;
mod handle_remote_offer_impl;
mod handle_signal_impl;
mod ice_impl;
mod negotiation_needed_impl;
mod peer_event_impl;
mod session;
mod teardown_impl;

use session::NegotiationSession;

pub enum EngineCommand {
    Call {
        target_id: PeerId,
    },
    HangUp {
        target_id: PeerId,
    },
    Inspect {
        reply: oneshot::Sender<Vec<SessionSnapshot>>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSnapshot {
    pub remote_id: PeerId,
    pub remote_name: Option<String>,
    pub direction: TransceiverDirection,
    pub signaling_state: SignalingState,
    pub has_remote_description: bool,
    pub pending_candidates: usize,
}

/// What happened to an incoming `video-offer`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OfferOutcome {
    Answered,
    /// Collided with our own offer; we replaced our connection and
    /// answered on the new one.
    Restarted,
    /// Collided with our own offer; the remote side yields instead.
    Deferred,
}

/// Client side of the relay: one negotiation session per remote peer.
///
/// Relay frames, peer-connection callbacks and commands are all handled on
/// the single task running [`ClientEngine::run`], one at a time.
pub struct ClientEngine {
    config: ClientConfig,
    rtc: Arc<dyn RtcEngine>,
    local_id: Option<PeerId>,
    display_name: String,
    sessions: HashMap<PeerId, NegotiationSession>,
    next_epoch: u64,
    tracks: Arc<TrackMultiplexer>,
    inbound_rx: mpsc::UnboundedReceiver<String>,
    outbound_tx: mpsc::UnboundedSender<SignalMessage>,
    event_rx: mpsc::UnboundedReceiver<SessionEvent>,
    event_tx: mpsc::UnboundedSender<SessionEvent>,
    command_rx: mpsc::Receiver<EngineCommand>,
    id_tx: watch::Sender<Option<PeerId>>,
    roster_tx: watch::Sender<Vec<PeerSummary>>,
    notice_tx: mpsc::UnboundedSender<UserNotice>,
}

impl ClientEngine {
    /// `inbound` carries raw relay frames; `outbound` is what gets written
    /// back to the relay.
    pub fn new(
        config: ClientConfig,
        rtc: Arc<dyn RtcEngine>,
        inbound: mpsc::UnboundedReceiver<String>,
        outbound: mpsc::UnboundedSender<SignalMessage>,
    ) -> (Self, EngineHandle) {
        let (event_tx, event_rx) = mpsc::unbounded_channel();
        let (command_tx, command_rx) = mpsc::channel(64);
        let (id_tx, id_rx) = watch::channel(None);
        let (roster_tx, roster_rx) = watch::channel(Vec::new());
        let (notice_tx, notice_rx) = mpsc::unbounded_channel();
        let tracks = Arc::new(TrackMultiplexer::new(config.role));

        let handle = EngineHandle {
            command_tx,
            tracks: tracks.clone(),
            local_id: id_rx,
            roster: roster_rx,
            notices: Arc::new(Mutex::new(notice_rx)),
        };

        let engine = Self {
            display_name: config.name.clone(),
            config,
            rtc,
            local_id: None,
            sessions: HashMap::new(),
            next_epoch: 0,
            tracks,
            inbound_rx: inbound,
            outbound_tx: outbound,
            event_rx,
            event_tx,
            command_rx,
            id_tx,
            roster_tx,
            notice_tx,
        };

        (engine, handle)
    }

    /// Connects to `config.server_url` and runs the engine on a new task.
    pub async fn start(
        config: ClientConfig,
        rtc: Arc<dyn RtcEngine>,
    ) -> anyhow::Result<EngineHandle> {
        let (outbound, inbound) = crate::connect(&config.server_url).await?;
        let (engine, handle) = Self::new(config, rtc, inbound, outbound);
        tokio::spawn(engine.run());
        Ok(handle)
    }

    pub async fn run(mut self) {
        info!("Client engine started as {} ({})", self.config.name, self.config.role);

        loop {
            tokio::select! {
                text = self.inbound_rx.recv() => {
                    match text {
                        Some(text) => self.handle_signal(text).await,
                        None => {
                            info!("Relay connection closed. Shutting down engine.");
                            break;
                        }
                    }
                }

                Some(event) = self.event_rx.recv() => {
                    self.handle_peer_event(event).await;
                }

                Some(cmd) = self.command_rx.recv() => {
                    self.handle_command(cmd).await;
                }
            }
        }

        self.close_all().await;
        info!("Client engine finished");
    }

    async fn handle_command(&mut self, cmd: EngineCommand) {
        match cmd {
            EngineCommand::Call { target_id } => {
                if let Err(e) = self.call(target_id).await {
                    warn!("Call to {} failed: {:#}", target_id, e);
                }
            }

            EngineCommand::HangUp { target_id } => {
                if !self.close_session(target_id, true).await {
                    warn!("Hang-up for unknown session {}", target_id);
                }
            }

            EngineCommand::Inspect { reply } => {
                let mut snapshots = Vec::with_capacity(self.sessions.len());
                for session in self.sessions.values() {
                    snapshots.push(SessionSnapshot {
                        remote_id: session.remote_id,
                        remote_name: session.remote_name.clone(),
                        direction: session.direction,
                        signaling_state: session.peer.signaling_state(),
                        has_remote_description: session.peer.has_remote_description().await,
                        pending_candidates: session.pending_candidates.len(),
                    });
                }
                snapshots.sort_by_key(|s| s.remote_id);
                let _ = reply.send(snapshots);
            }
        }
    }

    /// Opens a session towards `target_id`; the offer follows from the
    /// connection's negotiation-needed event.
    async fn call(&mut self, target_id: PeerId) -> Result<(), NegotiationError> {
        if Some(target_id) == self.local_id {
            warn!("Refusing to call ourselves");
            return Ok(());
        }
        if self.sessions.contains_key(&target_id) {
            info!("Already in a session with {}", target_id);
            return Ok(());
        }

        let name = self
            .roster_tx
            .borrow()
            .iter()
            .find(|p| p.id == target_id)
            .map(|p| p.name.clone())
            .filter(|name| !name.is_empty());
        info!("Calling {}", target_id);
        self.create_session(target_id, name).await
    }

    fn send(&self, msg: SignalMessage) {
        if self.outbound_tx.send(msg).is_err() {
            warn!("Relay connection gone; dropping outbound message");
        }
    }

    fn is_polite_towards(&self, remote_id: &PeerId) -> bool {
        self.local_id.is_some_and(|local| local < *remote_id)
    }
}

/// Cloneable front door to a running [`ClientEngine`].
#[derive(Clone)]
pub struct EngineHandle {
    command_tx: mpsc::Sender<EngineCommand>,
    tracks: Arc<TrackMultiplexer>,
    local_id: watch::Receiver<Option<PeerId>>,
    roster: watch::Receiver<Vec<PeerSummary>>,
    notices: Arc<Mutex<mpsc::UnboundedReceiver<UserNotice>>>,
}

impl EngineHandle {
    pub async fn call(&self, target_id: PeerId) -> Result<(), NegotiationError> {
        self.command_tx
            .send(EngineCommand::Call { target_id })
            .await
            .map_err(|_| NegotiationError::EngineStopped)
    }

    pub async fn hang_up(&self, target_id: PeerId) -> Result<(), NegotiationError> {
        self.command_tx
            .send(EngineCommand::HangUp { target_id })
            .await
            .map_err(|_| NegotiationError::EngineStopped)
    }

    pub async fn sessions(&self) -> Result<Vec<SessionSnapshot>, NegotiationError> {
        let (reply, rx) = oneshot::channel();
        self.command_tx
            .send(EngineCommand::Inspect { reply })
            .await
            .map_err(|_| NegotiationError::EngineStopped)?;
        rx.await.map_err(|_| NegotiationError::EngineStopped)
    }

    pub fn tracks(&self) -> Arc<TrackMultiplexer> {
        self.tracks.clone()
    }

    pub fn local_id(&self) -> Option<PeerId> {
        *self.local_id.borrow()
    }

    /// Resolves once the relay has assigned our id.
    pub async fn identified(&self) -> Result<PeerId, NegotiationError> {
        let mut rx = self.local_id.clone();
        let id = rx
            .wait_for(|id| id.is_some())
            .await
            .map_err(|_| NegotiationError::EngineStopped)?;
        (*id).ok_or(NegotiationError::NotIdentified)
    }

    pub fn roster(&self) -> Vec<PeerSummary> {
        self.roster.borrow().clone()
    }

    pub fn roster_updates(&self) -> watch::Receiver<Vec<PeerSummary>> {
        self.roster.clone()
    }

    pub async fn next_notice(&self) -> Option<UserNotice> {
        self.notices.lock().await.recv().await
    }
}
