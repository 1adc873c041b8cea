use anyhow::Result;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;

use crate::media::MediaStream;

/// Requested container and codec pair, e.g. `video/webm; codecs=vp9,opus`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodecProfile {
    pub mime_type: String,
}

impl CodecProfile {
    pub fn new(mime_type: impl Into<String>) -> Self {
        Self {
            mime_type: mime_type.into(),
        }
    }

    /// Container MIME type without parameters (`video/webm`)
    pub fn container(&self) -> &str {
        self.mime_type
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
    }

    /// Codecs listed in the `codecs=` parameter, in order
    pub fn codecs(&self) -> Vec<String> {
        self.mime_type
            .split(';')
            .skip(1)
            .filter_map(|param| param.trim().strip_prefix("codecs="))
            .flat_map(|list| list.trim_matches('"').split(','))
            .map(|codec| codec.trim().to_string())
            .filter(|codec| !codec.is_empty())
            .collect()
    }
}

impl Default for CodecProfile {
    fn default() -> Self {
        Self::new("video/webm; codecs=vp9,opus")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecorderState {
    Inactive,
    Recording,
}

/// Recording-session API
///
/// Encodes a combined stream into container chunks. The chunk channel is
/// closed after the last chunk once `stop()` completes.
#[async_trait::async_trait]
pub trait RecorderBackend: Send + Sync {
    /// Start recording
    ///
    /// Returns a channel receiver that will receive container chunks in order
    async fn start(
        &mut self,
        stream: &MediaStream,
        profile: &CodecProfile,
    ) -> Result<mpsc::Receiver<Vec<u8>>>;

    /// Stop recording and flush. Stopping an inactive recorder is a no-op.
    async fn stop(&mut self) -> Result<()>;

    fn state(&self) -> RecorderState;

    /// Get backend name for logging
    fn name(&self) -> &str;
}

pub trait RecorderFactory: Send + Sync {
    fn is_type_supported(&self, profile: &CodecProfile) -> bool;

    fn create(&self) -> Result<Box<dyn RecorderBackend>>;

    fn name(&self) -> &str;
}
