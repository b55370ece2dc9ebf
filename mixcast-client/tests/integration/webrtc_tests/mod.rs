mod test_webrtc_call;
mod test_webrtc_glare;

use std::time::Duration;

/// Offer/answer rounds on real connections.
pub const EXCHANGE_WITHIN: Duration = Duration::from_secs(10);
/// ICE, DTLS and the first RTP packet.
pub const MEDIA_WITHIN: Duration = Duration::from_secs(20);
