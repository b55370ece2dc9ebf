mod envelope;
mod peer;
mod role;
mod signaling;

pub use envelope::{Envelope, EnvelopeError, MessageKind, RoutingHeader};
pub use peer::{PeerId, PeerIdError};
pub use role::{Role, TransceiverDirection};
pub use signaling::{
    ConnectionIdData, IceCandidate, IceServerConfig, PeerSummary, SdpType, SessionDescription,
    SetupData, SignalMessage,
};
