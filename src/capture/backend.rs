use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::media::{DisplayMediaConstraints, MediaStream, UserMediaConstraints};

/// Why the platform refused to hand out a stream
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CaptureError {
    /// The user (or a policy) declined the capture prompt
    #[error("Capture denied: {0}")]
    Denied(String),

    /// No device or capability to satisfy the request
    #[error("Capture unavailable: {0}")]
    Unavailable(String),

    #[error("Capture failed: {0}")]
    Failed(String),
}

/// The two option toggles of the recorder UI
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaptureOptions {
    /// Capture the audio playing on the shared display
    #[serde(default)]
    pub system_audio: bool,
    /// Capture the default microphone
    #[serde(default)]
    pub microphone: bool,
}

/// Platform capture API
///
/// Implementations:
/// - Synthetic: in-process devices with scriptable grant/deny policies
#[async_trait::async_trait]
pub trait CaptureBackend: Send + Sync {
    /// Prompt for a display (screen/window/tab) stream
    async fn get_display_media(
        &self,
        constraints: &DisplayMediaConstraints,
    ) -> Result<MediaStream, CaptureError>;

    /// Prompt for a user-media stream (microphone)
    async fn get_user_media(
        &self,
        constraints: &UserMediaConstraints,
    ) -> Result<MediaStream, CaptureError>;

    /// Get backend name for logging
    fn name(&self) -> &str;
}
