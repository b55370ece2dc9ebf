use mixcast_core::utils::{DEFAULT_RELAY_PORT, MAX_MESSAGE_SIZE};
use std::env;
use std::net::{Ipv4Addr, SocketAddr};

/// Relay settings. Defaults match the reference deployment.
#[derive(Debug, Clone)]
pub struct RelayConfig {
    pub bind: SocketAddr,
    pub max_message_size: usize,
    /// Depth of the hub mailbox.
    pub command_buffer: usize,
}

impl RelayConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            bind: env::var("MIXCAST_BIND")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.bind),
            max_message_size: env::var("MIXCAST_MAX_MESSAGE_SIZE")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.max_message_size),
            command_buffer: env::var("MIXCAST_COMMAND_BUFFER")
                .ok()
                .and_then(|v| v.parse().ok())
                .filter(|v| *v > 0)
                .unwrap_or(defaults.command_buffer),
        }
    }
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            bind: SocketAddr::from((Ipv4Addr::UNSPECIFIED, DEFAULT_RELAY_PORT)),
            max_message_size: MAX_MESSAGE_SIZE,
            command_buffer: 256,
        }
    }
}
