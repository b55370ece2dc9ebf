use anyhow::{Context, Result};
use mixcast_core::{PeerId, PeerSummary, SignalMessage};
use mixcast_server::{ChannelEnd, HubHandle, PeerChannel};
use std::time::Duration;

use super::signal_helpers::{SIGNAL_TIMEOUT_MS, SILENCE_MS};

/// In-process stand-in for a websocket peer: owns the transport end of a
/// [`PeerChannel`] registered with the hub.
pub struct TestPeer {
    pub id: PeerId,
    end: ChannelEnd,
}

impl TestPeer {
    /// Accept and open in one go.
    pub async fn connect(hub: &HubHandle) -> Result<Self> {
        let peer = Self::connect_pending(hub).await?;
        peer.end.open();
        Ok(peer)
    }

    /// Accept but leave the channel in `Connecting`.
    pub async fn connect_pending(hub: &HubHandle) -> Result<Self> {
        let (channel, end) = PeerChannel::new();
        let id = hub.accept(channel).await.context("accept failed")?;
        tracing::debug!("[TestPeer] accepted {}", id);
        Ok(Self { id, end })
    }

    pub fn open(&self) {
        self.end.open();
    }

    pub async fn send(&self, hub: &HubHandle, message: &SignalMessage) -> Result<()> {
        self.send_raw(hub, serde_json::to_string(message)?).await
    }

    pub async fn send_raw(&self, hub: &HubHandle, text: impl Into<String>) -> Result<()> {
        hub.inbound(self.id, text.into()).await?;
        Ok(())
    }

    pub async fn recv_text(&mut self) -> Result<String> {
        let frame = tokio::time::timeout(
            Duration::from_millis(SIGNAL_TIMEOUT_MS),
            self.end.frames.recv(),
        )
        .await
        .context("Timeout waiting for frame")?
        .context("Channel closed")?;
        Ok(frame.to_string())
    }

    pub async fn recv(&mut self) -> Result<SignalMessage> {
        let text = self.recv_text().await?;
        serde_json::from_str(&text).with_context(|| format!("Unparsable frame {text}"))
    }

    /// Skips frames until one satisfies `pred`.
    pub async fn recv_matching<F>(&mut self, pred: F) -> Result<SignalMessage>
    where
        F: Fn(&SignalMessage) -> bool,
    {
        loop {
            let msg = self.recv().await?;
            if pred(&msg) {
                return Ok(msg);
            }
            tracing::debug!("[TestPeer] {} skipping {:?}", self.id, msg);
        }
    }

    pub async fn expect_connection_id(&mut self) -> Result<PeerId> {
        match self
            .recv_matching(|m| matches!(m, SignalMessage::ConnectionId { .. }))
            .await?
        {
            SignalMessage::ConnectionId { data } => Ok(data.id),
            other => anyhow::bail!("unexpected frame {:?}", other),
        }
    }

    /// Next `connection-list`.
    pub async fn expect_list(&mut self) -> Result<Vec<PeerSummary>> {
        match self
            .recv_matching(|m| matches!(m, SignalMessage::ConnectionList { .. }))
            .await?
        {
            SignalMessage::ConnectionList { data } => Ok(data),
            other => anyhow::bail!("unexpected frame {:?}", other),
        }
    }

    /// Latest `connection-list` once the hub has gone quiet.
    pub async fn latest_list(&mut self) -> Result<Vec<PeerSummary>> {
        let mut latest = self.expect_list().await?;
        while let Some(msg) = self.try_recv_within(SILENCE_MS).await {
            if let SignalMessage::ConnectionList { data } = msg {
                latest = data;
            }
        }
        Ok(latest)
    }

    pub async fn try_recv_within(&mut self, ms: u64) -> Option<SignalMessage> {
        let frame = tokio::time::timeout(Duration::from_millis(ms), self.end.frames.recv())
            .await
            .ok()??;
        serde_json::from_str(&frame).ok()
    }

    /// True when nothing at all arrives for a while.
    pub async fn is_silent(&mut self) -> bool {
        tokio::time::timeout(Duration::from_millis(SILENCE_MS), self.end.frames.recv())
            .await
            .is_err()
    }

    /// Mirrors the socket going away: mark closed, then tell the hub.
    pub async fn disconnect(self, hub: &HubHandle) -> Result<()> {
        self.end.close();
        hub.close(self.id).await?;
        Ok(())
    }
}
