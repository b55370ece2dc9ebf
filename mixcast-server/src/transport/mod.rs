mod origin_policy;
mod peer_channel;

pub use origin_policy::*;
pub use peer_channel::*;
