use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::media::{MediaStream, MediaTrack};

/// Audio source a mixer input came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AudioStreamSource {
    /// System audio of the shared display
    System,
    /// Microphone input
    Microphone,
}

/// Audio sample data (16-bit PCM, interleaved)
#[derive(Debug, Clone)]
pub struct AudioFrame {
    /// Raw audio samples (i16 PCM, interleaved)
    pub samples: Vec<i16>,
    /// Sample rate in Hz
    pub sample_rate: u32,
    /// Number of channels
    pub channels: u16,
    /// Timestamp in milliseconds since capture started
    pub timestamp_ms: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContextState {
    Running,
    Closed,
}

/// A node that wraps a single-track stream as a graph input
#[derive(Debug, Clone)]
pub struct SourceNode {
    pub id: usize,
    /// Id of the wrapped input track
    pub track_id: String,
}

/// A multi-input node whose output is exposed as a media stream
#[derive(Debug, Clone)]
pub struct DestinationNode {
    pub id: usize,
    /// Output stream carrying exactly one audio track
    pub stream: MediaStream,
}

impl DestinationNode {
    pub fn output_track(&self) -> Option<MediaTrack> {
        self.stream.audio_tracks().into_iter().next()
    }
}

/// Audio-processing graph API
///
/// Owns platform audio resources until `close()` is called.
#[async_trait::async_trait]
pub trait AudioContext: Send + Sync {
    fn create_media_stream_destination(&mut self) -> Result<DestinationNode>;

    /// Wrap the first audio track of `stream` as a graph input
    fn create_media_stream_source(&mut self, stream: &MediaStream) -> Result<SourceNode>;

    fn connect(&mut self, source: &SourceNode, destination: &DestinationNode) -> Result<()>;

    /// Release the graph. Closing a closed context is a no-op.
    async fn close(&mut self) -> Result<()>;

    fn state(&self) -> ContextState;
}

/// Creates audio contexts on demand
pub trait AudioGraphFactory: Send + Sync {
    fn create_context(&self, sample_rate: u32) -> Result<Box<dyn AudioContext>>;

    fn name(&self) -> &str;
}
