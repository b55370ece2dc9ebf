use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use bytes::Bytes;
use mixcast_core::{IceCandidate, SdpType, SessionDescription, TransceiverDirection};
use tracing::{debug, warn};
use webrtc::api::interceptor_registry::register_default_interceptors;
use webrtc::api::media_engine::{MIME_TYPE_OPUS, MIME_TYPE_VP8, MediaEngine};
use webrtc::api::setting_engine::SettingEngine;
use webrtc::api::{API, APIBuilder};
use webrtc::ice_transport::ice_candidate::{RTCIceCandidate, RTCIceCandidateInit};
use webrtc::ice_transport::ice_connection_state::RTCIceConnectionState;
use webrtc::ice_transport::ice_server::RTCIceServer;
use webrtc::interceptor::registry::Registry;
use webrtc::media::Sample;
use webrtc::peer_connection::RTCPeerConnection;
use webrtc::peer_connection::configuration::RTCConfiguration;
use webrtc::peer_connection::sdp::session_description::RTCSessionDescription;
use webrtc::peer_connection::signaling_state::RTCSignalingState;
use webrtc::rtp_transceiver::RTCRtpTransceiverInit;
use webrtc::rtp_transceiver::rtp_codec::{RTCRtpCodecCapability, RTPCodecType};
use webrtc::rtp_transceiver::rtp_transceiver_direction::RTCRtpTransceiverDirection;
use webrtc::track::track_local::TrackLocal;
use webrtc::track::track_local::track_local_static_sample::TrackLocalStaticSample;
use webrtc::track::track_remote::TrackRemote;

use crate::{
    IceConnectionState, MediaError, MediaTrack, PeerConfig, PeerEvent, PeerEventSink, RtcEngine,
    RtcError, RtcPeer, SignalingState, TrackKind,
};

pub type LocalTrack = Arc<dyn TrackLocal + Send + Sync>;

const AUDIO_FRAME: Duration = Duration::from_millis(20);
const VIDEO_FRAME: Duration = Duration::from_millis(33);

/// One 20 ms Opus frame of silence.
const OPUS_SILENCE: &[u8] = &[0xf8, 0xff, 0xfe];

/// 16x16 VP8 keyframe header. Not decodable, but it puts RTP on the wire
/// so the receiving side sees the track.
const VP8_BLANK: &[u8] = &[0x10, 0x02, 0x00, 0x9d, 0x01, 0x2a, 0x10, 0x00, 0x10, 0x00];

/// Where sending peers get their camera and microphone from.
#[async_trait]
pub trait LocalMediaSource: Send + Sync {
    async fn open(&self) -> Result<Vec<LocalTrack>, MediaError>;
}

/// Opus + VP8 sample tracks fed with silence and blank frames.
///
/// Each track gets a writer task that lives as long as the track does.
pub struct SyntheticCapture {
    stream_id: String,
}

impl SyntheticCapture {
    pub fn new(stream_id: impl Into<String>) -> Self {
        Self {
            stream_id: stream_id.into(),
        }
    }

    fn track(&self, mime_type: &str, id: &str) -> Arc<TrackLocalStaticSample> {
        Arc::new(TrackLocalStaticSample::new(
            RTCRtpCodecCapability {
                mime_type: mime_type.to_owned(),
                ..Default::default()
            },
            id.to_owned(),
            self.stream_id.clone(),
        ))
    }
}

#[async_trait]
impl LocalMediaSource for SyntheticCapture {
    async fn open(&self) -> Result<Vec<LocalTrack>, MediaError> {
        let audio = self.track(MIME_TYPE_OPUS, "audio");
        let video = self.track(MIME_TYPE_VP8, "video");

        spawn_sample_writer(&audio, Bytes::from_static(OPUS_SILENCE), AUDIO_FRAME);
        spawn_sample_writer(&video, Bytes::from_static(VP8_BLANK), VIDEO_FRAME);

        Ok(vec![audio as LocalTrack, video as LocalTrack])
    }
}

/// Writes `frame` every `interval` until the track is dropped. Writes
/// before the track is bound to a sender are no-ops.
fn spawn_sample_writer(track: &Arc<TrackLocalStaticSample>, frame: Bytes, interval: Duration) {
    let track = Arc::downgrade(track);
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        loop {
            ticker.tick().await;
            let Some(track) = track.upgrade() else {
                break;
            };

            let sample = Sample {
                data: frame.clone(),
                duration: interval,
                ..Default::default()
            };
            if let Err(e) = track.write_sample(&sample).await {
                debug!("Sample write on {} failed: {}", track.id(), e);
            }
        }
    });
}

/// [`RtcEngine`] backed by webrtc-rs.
pub struct WebRtcEngine {
    api: API,
    media: Arc<dyn LocalMediaSource>,
}

impl WebRtcEngine {
    pub fn new(media: Arc<dyn LocalMediaSource>) -> anyhow::Result<Self> {
        Self::with_settings(media, SettingEngine::default())
    }

    /// Like [`WebRtcEngine::new`], with ICE and transport knobs applied.
    pub fn with_settings(
        media: Arc<dyn LocalMediaSource>,
        settings: SettingEngine,
    ) -> anyhow::Result<Self> {
        let mut media_engine = MediaEngine::default();
        media_engine.register_default_codecs()?;

        let registry = register_default_interceptors(Registry::new(), &mut media_engine)?;

        let api = APIBuilder::new()
            .with_media_engine(media_engine)
            .with_interceptor_registry(registry)
            .with_setting_engine(settings)
            .build();

        Ok(Self { api, media })
    }
}

#[async_trait]
impl RtcEngine for WebRtcEngine {
    async fn create_peer(
        &self,
        config: PeerConfig,
        events: PeerEventSink,
    ) -> Result<Arc<dyn RtcPeer>, RtcError> {
        let local_tracks = if config.direction.sends() {
            self.media.open().await?
        } else {
            Vec::new()
        };

        let rtc_config = RTCConfiguration {
            ice_servers: config
                .ice_servers
                .iter()
                .map(|server| RTCIceServer {
                    urls: server.urls.clone(),
                    username: server.username.clone().unwrap_or_default(),
                    credential: server.credential.clone().unwrap_or_default(),
                    ..Default::default()
                })
                .collect(),
            ..Default::default()
        };

        let pc = Arc::new(
            self.api
                .new_peer_connection(rtc_config)
                .await
                .context("Failed to create peer connection")?,
        );

        let peer = WebRtcPeer { pc };
        peer.attach_handlers(events);
        peer.add_media(config.direction, local_tracks).await?;

        Ok(Arc::new(peer))
    }
}

pub struct WebRtcPeer {
    pc: Arc<RTCPeerConnection>,
}

impl WebRtcPeer {
    fn attach_handlers(&self, events: PeerEventSink) {
        let sink = events.clone();
        self.pc.on_ice_candidate(Box::new(move |candidate| {
            let sink = sink.clone();
            Box::pin(async move {
                let Some(candidate) = candidate else {
                    sink.emit(PeerEvent::IceCandidate(None));
                    return;
                };
                match from_rtc_candidate(&candidate) {
                    Ok(candidate) => {
                        sink.emit(PeerEvent::IceCandidate(Some(candidate)));
                    }
                    Err(e) => warn!("Dropping local candidate: {:?}", e),
                }
            })
        }));

        let sink = events.clone();
        self.pc.on_track(Box::new(move |track, _receiver, _transceiver| {
            let sink = sink.clone();
            Box::pin(async move {
                let stream_id = track.stream_id();
                let remote: Arc<dyn MediaTrack> = Arc::new(RemoteMediaTrack::new(track));
                sink.emit(PeerEvent::Track {
                    stream_id,
                    tracks: vec![remote],
                });
            })
        }));

        let sink = events.clone();
        self.pc.on_negotiation_needed(Box::new(move || {
            let sink = sink.clone();
            Box::pin(async move {
                sink.emit(PeerEvent::NegotiationNeeded);
            })
        }));

        let sink = events.clone();
        self.pc
            .on_ice_connection_state_change(Box::new(move |state: RTCIceConnectionState| {
                let sink = sink.clone();
                Box::pin(async move {
                    sink.emit(PeerEvent::IceConnectionState(map_ice_state(state)));
                })
            }));

        let sink = events;
        self.pc
            .on_signaling_state_change(Box::new(move |state: RTCSignalingState| {
                let sink = sink.clone();
                Box::pin(async move {
                    sink.emit(PeerEvent::SignalingState(map_signaling_state(state)));
                })
            }));
    }

    async fn add_media(
        &self,
        direction: TransceiverDirection,
        local_tracks: Vec<LocalTrack>,
    ) -> Result<(), RtcError> {
        match direction {
            TransceiverDirection::RecvOnly => {
                for kind in [RTPCodecType::Audio, RTPCodecType::Video] {
                    self.pc
                        .add_transceiver_from_kind(
                            kind,
                            Some(RTCRtpTransceiverInit {
                                direction: RTCRtpTransceiverDirection::Recvonly,
                                send_encodings: vec![],
                            }),
                        )
                        .await
                        .context("Failed to add receive-only transceiver")?;
                }
            }
            TransceiverDirection::SendOnly => {
                for track in local_tracks {
                    self.pc
                        .add_transceiver_from_track(
                            track,
                            Some(RTCRtpTransceiverInit {
                                direction: RTCRtpTransceiverDirection::Sendonly,
                                send_encodings: vec![],
                            }),
                        )
                        .await
                        .context("Failed to add send-only transceiver")?;
                }
            }
            TransceiverDirection::SendRecv => {
                for track in local_tracks {
                    self.pc
                        .add_track(track)
                        .await
                        .context("Failed to add local track")?;
                }
            }
        }
        Ok(())
    }
}

#[async_trait]
impl RtcPeer for WebRtcPeer {
    fn signaling_state(&self) -> SignalingState {
        map_signaling_state(self.pc.signaling_state())
    }

    async fn has_remote_description(&self) -> bool {
        self.pc.remote_description().await.is_some()
    }

    async fn needs_negotiation(&self) -> bool {
        if self.pc.current_local_description().await.is_none() {
            return true;
        }
        // a transceiver without a mid was added after the last exchange
        self.pc
            .get_transceivers()
            .await
            .iter()
            .any(|t| t.mid().is_none())
    }

    async fn create_offer(&self) -> Result<SessionDescription, RtcError> {
        let offer = self
            .pc
            .create_offer(None)
            .await
            .context("Failed to create offer")?;
        Ok(SessionDescription::offer(offer.sdp))
    }

    async fn create_answer(&self) -> Result<SessionDescription, RtcError> {
        let answer = self
            .pc
            .create_answer(None)
            .await
            .context("Failed to create answer")?;
        Ok(SessionDescription::answer(answer.sdp))
    }

    async fn set_local_description(&self, desc: SessionDescription) -> Result<(), RtcError> {
        let desc = to_rtc_description(desc)?;
        self.pc
            .set_local_description(desc)
            .await
            .context("Failed to set local description")?;
        Ok(())
    }

    async fn set_remote_description(&self, desc: SessionDescription) -> Result<(), RtcError> {
        let desc = to_rtc_description(desc)?;
        self.pc
            .set_remote_description(desc)
            .await
            .context("Failed to set remote description")?;
        Ok(())
    }

    async fn add_ice_candidate(&self, candidate: IceCandidate) -> Result<(), RtcError> {
        let init: RTCIceCandidateInit = serde_json::to_value(&candidate)
            .and_then(serde_json::from_value)
            .context("Invalid candidate")?;

        self.pc
            .add_ice_candidate(init)
            .await
            .context("Failed to add ICE candidate")?;
        Ok(())
    }

    fn detach_handlers(&self) {
        self.pc.on_ice_candidate(Box::new(|_| Box::pin(async {})));
        self.pc.on_track(Box::new(|_, _, _| Box::pin(async {})));
        self.pc.on_negotiation_needed(Box::new(|| Box::pin(async {})));
        self.pc
            .on_ice_connection_state_change(Box::new(|_| Box::pin(async {})));
        self.pc
            .on_signaling_state_change(Box::new(|_| Box::pin(async {})));
    }

    async fn close(&self) -> Result<(), RtcError> {
        self.pc
            .close()
            .await
            .context("Failed to close peer connection")?;
        Ok(())
    }
}

/// Remote track whose enabled flag is local to this client.
pub struct RemoteMediaTrack {
    id: String,
    kind: TrackKind,
    enabled: AtomicBool,
    track: Arc<TrackRemote>,
}

impl RemoteMediaTrack {
    pub fn new(track: Arc<TrackRemote>) -> Self {
        let kind = match track.kind() {
            RTPCodecType::Audio => TrackKind::Audio,
            _ => TrackKind::Video,
        };

        Self {
            id: track.id(),
            kind,
            enabled: AtomicBool::new(true),
            track,
        }
    }

    pub fn remote(&self) -> &Arc<TrackRemote> {
        &self.track
    }
}

impl fmt::Debug for RemoteMediaTrack {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RemoteMediaTrack")
            .field("id", &self.id)
            .field("kind", &self.kind)
            .field("enabled", &self.is_enabled())
            .finish()
    }
}

impl MediaTrack for RemoteMediaTrack {
    fn id(&self) -> &str {
        &self.id
    }

    fn kind(&self) -> TrackKind {
        self.kind
    }

    fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::Relaxed)
    }

    fn set_enabled(&self, enabled: bool) {
        debug!("Track {} enabled={}", self.id, enabled);
        self.enabled.store(enabled, Ordering::Relaxed);
    }
}

/// webrtc-rs accepts no rollback in any signaling state.
fn to_rtc_description(desc: SessionDescription) -> Result<RTCSessionDescription, RtcError> {
    let parsed = match desc.sdp_type {
        SdpType::Offer => RTCSessionDescription::offer(desc.sdp),
        SdpType::Answer => RTCSessionDescription::answer(desc.sdp),
        SdpType::Pranswer => RTCSessionDescription::pranswer(desc.sdp),
        SdpType::Rollback => {
            return Err(RtcError::InvalidState("rollback is not supported".into()));
        }
    };
    Ok(parsed.context("Invalid session description")?)
}

fn from_rtc_candidate(candidate: &RTCIceCandidate) -> anyhow::Result<IceCandidate> {
    let init = candidate.to_json()?;
    Ok(serde_json::from_value(serde_json::to_value(init)?)?)
}

fn map_signaling_state(state: RTCSignalingState) -> SignalingState {
    match state {
        RTCSignalingState::HaveLocalOffer => SignalingState::HaveLocalOffer,
        RTCSignalingState::HaveRemoteOffer => SignalingState::HaveRemoteOffer,
        RTCSignalingState::HaveLocalPranswer => SignalingState::HaveLocalPranswer,
        RTCSignalingState::HaveRemotePranswer => SignalingState::HaveRemotePranswer,
        RTCSignalingState::Closed => SignalingState::Closed,
        _ => SignalingState::Stable,
    }
}

fn map_ice_state(state: RTCIceConnectionState) -> IceConnectionState {
    match state {
        RTCIceConnectionState::Checking => IceConnectionState::Checking,
        RTCIceConnectionState::Connected => IceConnectionState::Connected,
        RTCIceConnectionState::Completed => IceConnectionState::Completed,
        RTCIceConnectionState::Disconnected => IceConnectionState::Disconnected,
        RTCIceConnectionState::Failed => IceConnectionState::Failed,
        RTCIceConnectionState::Closed => IceConnectionState::Closed,
        _ => IceConnectionState::New,
    }
}
