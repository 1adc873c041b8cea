use serde::{Deserialize, Serialize};

/// Processing requested for any captured audio
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AudioConstraints {
    pub echo_cancellation: bool,
    pub noise_suppression: bool,
    /// Sample rate in Hz
    pub sample_rate: u32,
}

impl Default for AudioConstraints {
    fn default() -> Self {
        Self {
            echo_cancellation: true,
            noise_suppression: true,
            sample_rate: 44100,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CursorMode {
    Always,
    Motion,
    Never,
}

/// Request for a display capture stream. Video is always captured.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisplayMediaConstraints {
    pub cursor: CursorMode,
    /// System audio; `None` captures video only
    pub audio: Option<AudioConstraints>,
}

impl DisplayMediaConstraints {
    pub fn new(system_audio: bool, audio: &AudioConstraints) -> Self {
        Self {
            cursor: CursorMode::Always,
            audio: system_audio.then(|| audio.clone()),
        }
    }
}

/// Request for a user-media (microphone) stream
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserMediaConstraints {
    pub audio: Option<AudioConstraints>,
    pub video: bool,
}

impl UserMediaConstraints {
    pub fn microphone(audio: &AudioConstraints) -> Self {
        Self {
            audio: Some(audio.clone()),
            video: false,
        }
    }
}
