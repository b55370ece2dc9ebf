mod presence;
mod router;
mod setup;

pub use presence::*;
pub use router::*;
pub use setup::*;
