mod peer_record;
mod registry;

pub use peer_record::*;
pub use registry::*;
