pub const DEFAULT_STUN_ADDR: &str = "stun:stun.l.google.com:19302";
pub const DEFAULT_STUN_ADDR_2: &str = "stun:stun1.l.google.com:19302";
pub const DEFAULT_STUN_ADDR_3: &str = "stun:stun2.l.google.com:19302";
pub const DEFAULT_STUN_ADDR_4: &str = "stun:stun3.l.google.com:19302";

/// Largest text frame the relay accepts from a peer, in bytes.
pub const MAX_MESSAGE_SIZE: usize = 80_000;

/// Websocket subprotocol spoken by peers.
pub const SIGNALING_PROTOCOL: &str = "json";

/// Port the relay listens on unless configured otherwise.
pub const DEFAULT_RELAY_PORT: u16 = 3478;
