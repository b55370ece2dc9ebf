use mixcast_core::utils::{
    DEFAULT_STUN_ADDR, DEFAULT_STUN_ADDR_2, DEFAULT_STUN_ADDR_3, DEFAULT_STUN_ADDR_4,
};
use mixcast_core::{IceServerConfig, Role};

#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub server_url: String,
    pub name: String,
    pub role: Role,
    /// Empty means the public STUN defaults.
    pub ice_servers: Vec<IceServerConfig>,
}

impl ClientConfig {
    pub fn new(server_url: impl Into<String>, name: impl Into<String>, role: Role) -> Self {
        Self {
            server_url: server_url.into(),
            name: name.into(),
            role,
            ice_servers: Vec::new(),
        }
    }

    pub fn effective_ice_servers(&self) -> Vec<IceServerConfig> {
        if !self.ice_servers.is_empty() {
            return self.ice_servers.clone();
        }

        vec![IceServerConfig {
            urls: [
                DEFAULT_STUN_ADDR,
                DEFAULT_STUN_ADDR_2,
                DEFAULT_STUN_ADDR_3,
                DEFAULT_STUN_ADDR_4,
            ]
            .iter()
            .map(|url| url.to_string())
            .collect(),
            username: None,
            credential: None,
        }]
    }
}
