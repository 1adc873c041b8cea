// Software audio graph
//
// A destination node renders by summing one frame from every connected
// source with clipping to the i16 range. Frames of different lengths are
// zero-padded to the longest one.

use anyhow::{bail, Context, Result};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tracing::{debug, info};

use super::graph::{
    AudioContext, AudioFrame, AudioGraphFactory, ContextState, DestinationNode, SourceNode,
};
use crate::media::{MediaStream, MediaTrack, TrackKind};

/// Factory for in-process audio contexts
#[derive(Default)]
pub struct SoftwareAudioGraph {
    created: Arc<AtomicUsize>,
    open: Arc<AtomicUsize>,
}

impl SoftwareAudioGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Contexts created over the lifetime of the factory
    pub fn contexts_created(&self) -> usize {
        self.created.load(Ordering::SeqCst)
    }

    /// Contexts created and not yet closed
    pub fn open_contexts(&self) -> usize {
        self.open.load(Ordering::SeqCst)
    }
}

impl AudioGraphFactory for SoftwareAudioGraph {
    fn create_context(&self, sample_rate: u32) -> Result<Box<dyn AudioContext>> {
        self.created.fetch_add(1, Ordering::SeqCst);
        self.open.fetch_add(1, Ordering::SeqCst);
        info!("Software audio context created ({}Hz)", sample_rate);
        Ok(Box::new(SoftwareAudioContext::new(
            sample_rate,
            Arc::clone(&self.open),
        )))
    }

    fn name(&self) -> &str {
        "software audio graph"
    }
}

pub struct SoftwareAudioContext {
    sample_rate: u32,
    state: ContextState,
    next_node_id: usize,
    sources: HashMap<usize, SourceNode>,
    destinations: HashMap<usize, DestinationNode>,
    /// destination id -> connected source ids
    connections: HashMap<usize, Vec<usize>>,
    open: Arc<AtomicUsize>,
}

impl SoftwareAudioContext {
    fn new(sample_rate: u32, open: Arc<AtomicUsize>) -> Self {
        Self {
            sample_rate,
            state: ContextState::Running,
            next_node_id: 0,
            sources: HashMap::new(),
            destinations: HashMap::new(),
            connections: HashMap::new(),
            open,
        }
    }

    /// Render one output frame for `destination` from per-track input frames
    ///
    /// Returns None if no connected source has a frame available.
    pub fn render(
        &self,
        destination: &DestinationNode,
        inputs: &HashMap<String, AudioFrame>,
    ) -> Result<Option<AudioFrame>> {
        self.ensure_running()?;

        let connected = self
            .connections
            .get(&destination.id)
            .context("Unknown destination node")?;

        let frames: Vec<&AudioFrame> = connected
            .iter()
            .filter_map(|id| self.sources.get(id))
            .filter_map(|source| inputs.get(&source.track_id))
            .collect();

        if frames.is_empty() {
            return Ok(None);
        }

        self.mix_frames(&frames).map(Some)
    }

    fn mix_frames(&self, frames: &[&AudioFrame]) -> Result<AudioFrame> {
        if frames.is_empty() {
            bail!("Cannot mix zero frames");
        }

        for frame in frames {
            if frame.sample_rate != self.sample_rate {
                bail!(
                    "Frame sample rate mismatch: expected {}, got {}",
                    self.sample_rate,
                    frame.sample_rate
                );
            }
        }

        let channels = frames[0].channels;
        if frames.iter().any(|f| f.channels != channels) {
            bail!("Cannot mix frames with different channel counts");
        }

        let timestamp_ms = frames.iter().map(|f| f.timestamp_ms).min().unwrap_or(0);
        let max_len = frames.iter().map(|f| f.samples.len()).max().unwrap_or(0);

        let samples = (0..max_len)
            .map(|i| {
                let sum: i32 = frames
                    .iter()
                    .map(|f| f.samples.get(i).copied().unwrap_or(0) as i32)
                    .sum();
                sum.clamp(i16::MIN as i32, i16::MAX as i32) as i16
            })
            .collect::<Vec<_>>();

        debug!(
            "Mixed {} frames at {}ms: {} samples",
            frames.len(),
            timestamp_ms,
            samples.len()
        );

        Ok(AudioFrame {
            samples,
            sample_rate: self.sample_rate,
            channels,
            timestamp_ms,
        })
    }

    fn ensure_running(&self) -> Result<()> {
        if self.state == ContextState::Closed {
            bail!("Audio context is closed");
        }
        Ok(())
    }

    fn next_id(&mut self) -> usize {
        let id = self.next_node_id;
        self.next_node_id += 1;
        id
    }
}

#[async_trait::async_trait]
impl AudioContext for SoftwareAudioContext {
    fn create_media_stream_destination(&mut self) -> Result<DestinationNode> {
        self.ensure_running()?;

        let id = self.next_id();
        let output = MediaTrack::new(TrackKind::Audio, "mixed audio");
        let node = DestinationNode {
            id,
            stream: MediaStream::new(vec![output]),
        };

        self.destinations.insert(id, node.clone());
        self.connections.insert(id, Vec::new());
        Ok(node)
    }

    fn create_media_stream_source(&mut self, stream: &MediaStream) -> Result<SourceNode> {
        self.ensure_running()?;

        let track = stream
            .audio_tracks()
            .into_iter()
            .next()
            .context("Source stream has no audio track")?;

        let id = self.next_id();
        let node = SourceNode {
            id,
            track_id: track.id().to_string(),
        };

        self.sources.insert(id, node.clone());
        Ok(node)
    }

    fn connect(&mut self, source: &SourceNode, destination: &DestinationNode) -> Result<()> {
        self.ensure_running()?;

        if !self.sources.contains_key(&source.id) {
            bail!("Unknown source node {}", source.id);
        }
        let inputs = self
            .connections
            .get_mut(&destination.id)
            .with_context(|| format!("Unknown destination node {}", destination.id))?;

        if !inputs.contains(&source.id) {
            inputs.push(source.id);
        }
        Ok(())
    }

    async fn close(&mut self) -> Result<()> {
        if self.state == ContextState::Closed {
            return Ok(());
        }

        self.state = ContextState::Closed;
        self.open.fetch_sub(1, Ordering::SeqCst);
        info!(
            "Software audio context closed ({} sources, {} destinations)",
            self.sources.len(),
            self.destinations.len()
        );
        Ok(())
    }

    fn state(&self) -> ContextState {
        self.state
    }
}
