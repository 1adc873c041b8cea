use serde::{Deserialize, Serialize};

use crate::capture::CaptureOptions;
use crate::config::Config;
use crate::media::AudioConstraints;
use crate::recorder::CodecProfile;

/// Configuration for one capture session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Which audio sources to capture
    pub options: CaptureOptions,

    /// Processing requested for captured audio (also the mixing sample rate)
    pub audio: AudioConstraints,

    /// Container/codec profile requested from the recorder
    pub profile: CodecProfile,
}

impl SessionConfig {
    pub fn new(options: CaptureOptions, config: &Config) -> Self {
        Self {
            options,
            audio: config.capture.audio_constraints(),
            profile: config.recorder.profile(),
        }
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            options: CaptureOptions::default(),
            audio: AudioConstraints::default(),   // 44.1kHz, echo cancellation + noise suppression
            profile: CodecProfile::default(),     // webm, vp9 + opus
        }
    }
}
