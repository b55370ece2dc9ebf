mod config;
mod engine;
mod error;
mod rtc;
mod tracks;
mod transport;

pub use config::*;
pub use engine::*;
pub use error::*;
pub use rtc::*;
pub use tracks::*;
pub use transport::*;
