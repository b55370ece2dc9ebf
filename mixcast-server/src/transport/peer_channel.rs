use crate::error::RelayError;
use mixcast_core::PeerId;
use std::sync::Arc;
use tokio::sync::{mpsc, watch};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelState {
    Connecting,
    Open,
    Closed,
}

/// Outbound half of a peer's transport, owned by its registry record.
#[derive(Debug, Clone)]
pub struct PeerChannel {
    frames: mpsc::UnboundedSender<Arc<str>>,
    state: watch::Receiver<ChannelState>,
}

/// The transport's side of a [`PeerChannel`]: it reports the state and
/// drains the frames into the socket.
#[derive(Debug)]
pub struct ChannelEnd {
    pub state: watch::Sender<ChannelState>,
    pub frames: mpsc::UnboundedReceiver<Arc<str>>,
}

impl PeerChannel {
    pub fn new() -> (Self, ChannelEnd) {
        let (frames_tx, frames_rx) = mpsc::unbounded_channel();
        let (state_tx, state_rx) = watch::channel(ChannelState::Connecting);

        (
            Self {
                frames: frames_tx,
                state: state_rx,
            },
            ChannelEnd {
                state: state_tx,
                frames: frames_rx,
            },
        )
    }

    pub fn state(&self) -> ChannelState {
        *self.state.borrow()
    }

    pub fn is_open(&self) -> bool {
        self.state() == ChannelState::Open && !self.frames.is_closed()
    }

    /// Resolves once the channel has left `Connecting`. Returns whether it
    /// ended up open.
    pub async fn ready(mut self) -> bool {
        match self
            .state
            .wait_for(|state| *state != ChannelState::Connecting)
            .await
        {
            Ok(state) => *state == ChannelState::Open,
            Err(_) => false,
        }
    }

    pub fn send(&self, peer_id: &PeerId, frame: Arc<str>) -> Result<(), RelayError> {
        if !self.is_open() {
            return Err(RelayError::TargetNotConnected(*peer_id));
        }
        self.frames
            .send(frame)
            .map_err(|_| RelayError::TargetNotConnected(*peer_id))
    }
}

impl ChannelEnd {
    pub fn open(&self) {
        self.state.send_replace(ChannelState::Open);
    }

    pub fn close(&self) {
        self.state.send_replace(ChannelState::Closed);
    }
}
