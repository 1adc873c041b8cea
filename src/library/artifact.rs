use chrono::{DateTime, Local, NaiveDateTime};

use crate::media::StreamLayout;

/// Output of a finished capture session, before it gets a name
#[derive(Debug, Clone)]
pub struct FinalizedRecording {
    pub data: Vec<u8>,
    /// Container MIME type, e.g. `video/webm`
    pub mime_type: String,
    pub chunk_count: usize,
    /// What the recorder was fed
    pub layout: StreamLayout,
}

/// A finished, immutable recording
#[derive(Debug)]
pub struct RecordingArtifact {
    pub data: Vec<u8>,
    pub mime_type: String,
    pub file_name: String,
    pub created_at: DateTime<Local>,
    pub chunk_count: usize,
    pub layout: StreamLayout,
}

impl RecordingArtifact {
    pub fn size(&self) -> usize {
        self.data.len()
    }
}

/// `<prefix>-YYYYMMDD-HHMMSS.<extension>`
///
/// Second resolution: two recordings finalized in the same second get the
/// same name.
pub fn file_name_for(prefix: &str, extension: &str, at: &NaiveDateTime) -> String {
    format!("{}-{}.{}", prefix, at.format("%Y%m%d-%H%M%S"), extension)
}
