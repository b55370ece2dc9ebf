use crate::config::RelayConfig;
use crate::error::RelayError;
use crate::hub::{Hub, HubCommand, HubSnapshot};
use crate::transport::PeerChannel;
use mixcast_core::PeerId;
use tokio::sync::{mpsc, oneshot};

/// Cloneable mailbox address of a running [`Hub`].
#[derive(Clone, Debug)]
pub struct HubHandle {
    tx: mpsc::Sender<HubCommand>,
}

impl HubHandle {
    /// Spawns a hub on the current runtime.
    pub fn spawn(config: &RelayConfig) -> Self {
        let (tx, rx) = mpsc::channel(config.command_buffer);
        let hub = Hub::new(config, rx);
        tokio::spawn(hub.run());
        Self { tx }
    }

    pub async fn accept(&self, channel: PeerChannel) -> Result<PeerId, RelayError> {
        let (reply, rx) = oneshot::channel();
        self.send(HubCommand::Accept { channel, reply }).await?;
        rx.await.map_err(|_| RelayError::HubClosed)
    }

    pub async fn inbound(&self, peer_id: PeerId, text: String) -> Result<(), RelayError> {
        self.send(HubCommand::Inbound { peer_id, text }).await
    }

    pub async fn close(&self, peer_id: PeerId) -> Result<(), RelayError> {
        self.send(HubCommand::Close { peer_id }).await
    }

    pub async fn snapshot(&self) -> Result<HubSnapshot, RelayError> {
        let (reply, rx) = oneshot::channel();
        self.send(HubCommand::Snapshot { reply }).await?;
        rx.await.map_err(|_| RelayError::HubClosed)
    }

    async fn send(&self, cmd: HubCommand) -> Result<(), RelayError> {
        self.tx.send(cmd).await.map_err(|_| RelayError::HubClosed)
    }
}
