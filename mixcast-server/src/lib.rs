mod config;
mod error;
mod hub;
mod registry;
mod routing;
mod signaling;
mod transport;

pub use config::*;
pub use error::*;
pub use hub::*;
pub use registry::*;
pub use routing::*;
pub use signaling::*;
pub use transport::*;
