use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::audio::AudioStreamSource;
use crate::media::StreamLayout;

/// Statistics about a capture session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionStats {
    /// Whether the recorder is currently active
    pub is_recording: bool,

    /// When the session started
    pub started_at: DateTime<Utc>,

    /// Elapsed time in seconds
    pub duration_secs: f64,

    /// Non-empty chunks buffered so far
    pub chunks_received: usize,

    /// Bytes buffered so far
    pub bytes_buffered: usize,

    /// Layout of the stream fed to the recorder
    pub layout: StreamLayout,

    /// Audio sources contributing to the recording
    pub sources: Vec<AudioStreamSource>,
}
