// In-process capture backend
//
// Hands out synthetic tracks according to per-device policies and keeps
// every issued track so leaks and external "stop sharing" can be observed.

use serde::{Deserialize, Serialize};
use std::sync::Mutex;
use tracing::info;

use super::backend::{CaptureBackend, CaptureError};
use crate::media::{
    DisplayMediaConstraints, MediaStream, MediaTrack, TrackKind, UserMediaConstraints,
};

/// How a synthetic device answers a capture prompt
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DevicePolicy {
    #[default]
    Grant,
    Deny,
    Unavailable,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SyntheticCaptureConfig {
    pub display: DevicePolicy,
    pub microphone: DevicePolicy,
    /// Whether the shared surface offers an audio track
    pub system_audio_available: bool,
}

impl Default for SyntheticCaptureConfig {
    fn default() -> Self {
        Self {
            display: DevicePolicy::Grant,
            microphone: DevicePolicy::Grant,
            system_audio_available: true,
        }
    }
}

pub struct SyntheticCapture {
    config: SyntheticCaptureConfig,
    displays: Mutex<Vec<MediaStream>>,
    microphones: Mutex<Vec<MediaStream>>,
}

impl SyntheticCapture {
    pub fn new(config: SyntheticCaptureConfig) -> Self {
        Self {
            config,
            displays: Mutex::new(Vec::new()),
            microphones: Mutex::new(Vec::new()),
        }
    }

    /// Tracks handed out that nobody has stopped yet
    pub fn live_track_count(&self) -> usize {
        let count = |streams: &Mutex<Vec<MediaStream>>| {
            streams
                .lock()
                .map(|streams| {
                    streams
                        .iter()
                        .flat_map(|s| s.tracks())
                        .filter(|t| t.is_live())
                        .count()
                })
                .unwrap_or(0)
        };
        count(&self.displays) + count(&self.microphones)
    }

    /// Simulate the platform's "stop sharing" control. Returns the number
    /// of video tracks ended.
    pub fn end_display_share(&self) -> usize {
        let Ok(displays) = self.displays.lock() else {
            return 0;
        };
        let ended = displays
            .iter()
            .flat_map(|s| s.video_tracks())
            .filter(|t| t.end())
            .count();
        info!("Display share ended externally ({} track(s))", ended);
        ended
    }

    fn check(policy: DevicePolicy, device: &str) -> Result<(), CaptureError> {
        match policy {
            DevicePolicy::Grant => Ok(()),
            DevicePolicy::Deny => Err(CaptureError::Denied(format!(
                "Permission to capture {} was denied",
                device
            ))),
            DevicePolicy::Unavailable => Err(CaptureError::Unavailable(format!(
                "No {} available",
                device
            ))),
        }
    }

    fn remember(list: &Mutex<Vec<MediaStream>>, stream: &MediaStream) {
        if let Ok(mut list) = list.lock() {
            list.push(stream.clone());
        }
    }
}

impl Default for SyntheticCapture {
    fn default() -> Self {
        Self::new(SyntheticCaptureConfig::default())
    }
}

#[async_trait::async_trait]
impl CaptureBackend for SyntheticCapture {
    async fn get_display_media(
        &self,
        constraints: &DisplayMediaConstraints,
    ) -> Result<MediaStream, CaptureError> {
        Self::check(self.config.display, "display")?;

        let mut tracks = vec![MediaTrack::new(TrackKind::Video, "synthetic screen")];
        if constraints.audio.is_some() && self.config.system_audio_available {
            tracks.push(MediaTrack::new(TrackKind::Audio, "synthetic system audio"));
        }

        let stream = MediaStream::new(tracks);
        Self::remember(&self.displays, &stream);
        Ok(stream)
    }

    async fn get_user_media(
        &self,
        constraints: &UserMediaConstraints,
    ) -> Result<MediaStream, CaptureError> {
        if constraints.video {
            return Err(CaptureError::Unavailable("No camera available".to_string()));
        }
        if constraints.audio.is_none() {
            return Err(CaptureError::Failed(
                "User media request without audio or video".to_string(),
            ));
        }
        Self::check(self.config.microphone, "microphone")?;

        let stream = MediaStream::new(vec![MediaTrack::new(
            TrackKind::Audio,
            "synthetic microphone",
        )]);
        Self::remember(&self.microphones, &stream);
        Ok(stream)
    }

    fn name(&self) -> &str {
        "synthetic capture"
    }
}
