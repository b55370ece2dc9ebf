use crate::config::RelayConfig;
use crate::hub::{HubCommand, HubSnapshot};
use crate::registry::{PeerRecord, Registry};
use crate::routing::{Router, announce, broadcast_presence};
use crate::transport::PeerChannel;
use mixcast_core::PeerId;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// Sole owner of the registry. Every command runs to completion before the
/// next one is read.
pub struct Hub {
    registry: Registry,
    router: Router,
    command_rx: mpsc::Receiver<HubCommand>,
    ready_rx: mpsc::UnboundedReceiver<PeerId>,
    ready_tx: mpsc::UnboundedSender<PeerId>,
}

impl Hub {
    pub fn new(config: &RelayConfig, command_rx: mpsc::Receiver<HubCommand>) -> Self {
        let (ready_tx, ready_rx) = mpsc::unbounded_channel();

        Self {
            registry: Registry::new(),
            router: Router::new(config.max_message_size),
            command_rx,
            ready_rx,
            ready_tx,
        }
    }

    pub async fn run(mut self) {
        info!("Hub event loop started");

        loop {
            tokio::select! {
                cmd = self.command_rx.recv() => {
                    match cmd {
                        Some(c) => self.handle_command(c),
                        None => {
                            info!("Command channel closed. Shutting down hub.");
                            break;
                        }
                    }
                }

                Some(peer_id) = self.ready_rx.recv() => {
                    announce(&mut self.registry, &peer_id);
                }
            }
        }

        info!("Hub event loop finished");
    }

    fn handle_command(&mut self, cmd: HubCommand) {
        match cmd {
            HubCommand::Accept { channel, reply } => {
                let peer_id = self.accept(channel);
                if reply.send(peer_id).is_err() {
                    debug!("Acceptor for {} went away", peer_id);
                }
            }

            HubCommand::Inbound { peer_id, text } => {
                debug!("Frame from {}: {}", peer_id, text);
                self.router.dispatch(&mut self.registry, &peer_id, &text);
            }

            HubCommand::Close { peer_id } => self.close(&peer_id),

            HubCommand::Snapshot { reply } => {
                let _ = reply.send(HubSnapshot {
                    registered: self.registry.len(),
                    open: self.registry.open_summaries(),
                });
            }
        }
    }

    fn accept(&mut self, channel: PeerChannel) -> PeerId {
        let peer_id = self.registry.allocate_id();
        self.registry
            .insert(PeerRecord::new(peer_id, channel.clone()));
        info!("Connection accepted: {}", peer_id);

        let ready_tx = self.ready_tx.clone();
        tokio::spawn(async move {
            if channel.ready().await {
                let _ = ready_tx.send(peer_id);
            }
        });

        peer_id
    }

    fn close(&mut self, peer_id: &PeerId) {
        if self.registry.remove(peer_id).is_none() {
            warn!("Close for unknown or already removed peer {}", peer_id);
            return;
        }

        info!("Peer {} disconnected", peer_id);
        broadcast_presence(&self.registry);
    }
}
