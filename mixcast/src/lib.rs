pub use mixcast_core::model::{PeerId, Role};

pub mod model {
    pub use mixcast_core::model::*;
    pub use mixcast_core::utils;
}

#[cfg(feature = "server")]
pub mod server {
    pub use mixcast_server::*;
}

#[cfg(feature = "client")]
pub mod client {
    pub use mixcast_client::*;
}
