use super::config::SessionConfig;
use super::stats::SessionStats;
use crate::audio::{combine_streams, AudioContext, AudioStreamSource};
use crate::capture::{acquire_streams, AcquiredStreams};
use crate::error::StartError;
use crate::library::FinalizedRecording;
use crate::media::{MediaStream, MediaTrack};
use crate::platform::Platform;
use crate::recorder::{collect_chunks, CollectorStats, RecorderBackend, RecorderState, RecordingBuffer};
use anyhow::{anyhow, Context};
use chrono::Utc;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

/// How long to wait for the chunk channel to close after the recorder stops
const DRAIN_TIMEOUT: Duration = Duration::from_secs(5);

/// Everything acquired for one recording, released together on finish
pub struct CaptureSession {
    /// Session configuration
    config: SessionConfig,

    /// When the session started
    started_at: chrono::DateTime<chrono::Utc>,

    /// Display stream and optional microphone stream
    streams: AcquiredStreams,

    /// Stream fed to the recorder (one video, at most one audio track)
    combined: MediaStream,

    /// Audio sources that feed `combined`
    sources: Vec<AudioStreamSource>,

    /// Mixing graph, present only when two sources were mixed
    context: Option<Box<dyn AudioContext>>,

    recorder: Box<dyn RecorderBackend>,

    /// Task draining recorder chunks into the buffer
    collector: Option<Collector>,

    stats: Arc<CollectorStats>,
}

impl CaptureSession {
    /// Acquire, mix and start recording
    ///
    /// All-or-nothing: on any failure whatever was acquired so far is
    /// released before the error is returned.
    pub async fn open(platform: &Platform, config: SessionConfig) -> Result<Self, StartError> {
        info!(
            "Opening capture session (system audio: {}, microphone: {}, profile: {})",
            config.options.system_audio, config.options.microphone, config.profile.mime_type
        );

        if !platform.recorder.is_type_supported(&config.profile) {
            return Err(StartError::Failed(anyhow!(
                "Recording profile {} is not supported by {}",
                config.profile.mime_type,
                platform.recorder.name()
            )));
        }

        let streams =
            acquire_streams(platform.capture.as_ref(), config.options, &config.audio).await?;

        let mut combined = match combine_streams(
            &streams,
            config.options,
            platform.audio.as_ref(),
            config.audio.sample_rate,
        )
        .await
        {
            Ok(combined) => combined,
            Err(e) => {
                streams.release();
                return Err(StartError::Failed(e.context("Failed to combine streams")));
            }
        };

        let started = match platform.recorder.create() {
            Ok(mut recorder) => match recorder.start(&combined.stream, &config.profile).await {
                Ok(chunk_rx) => Ok((recorder, chunk_rx)),
                Err(e) => Err(e.context("Failed to start recorder")),
            },
            Err(e) => Err(e.context("Failed to create recorder")),
        };

        let (recorder, chunk_rx) = match started {
            Ok(started) => started,
            Err(e) => {
                combined.stream.stop_all();
                streams.release();
                if let Some(mut context) = combined.context.take() {
                    if let Err(close_err) = context.close().await {
                        warn!("Failed to close audio context: {}", close_err);
                    }
                }
                return Err(StartError::Failed(e));
            }
        };

        let stats = Arc::new(CollectorStats::default());
        let (cancel, cancel_rx) = oneshot::channel();
        let collector = Collector {
            handle: tokio::spawn(collect_chunks(chunk_rx, Arc::clone(&stats), cancel_rx)),
            cancel,
        };

        info!(
            "Capture session recording via {}: {:?}",
            recorder.name(),
            combined.stream.layout()
        );

        Ok(Self {
            config,
            started_at: Utc::now(),
            streams,
            combined: combined.stream,
            sources: combined.sources,
            context: combined.context,
            recorder,
            collector: Some(collector),
            stats,
        })
    }

    /// Stream shown in the preview
    pub fn combined_stream(&self) -> &MediaStream {
        &self.combined
    }

    /// First video track of the display stream; its external end stops the
    /// recording
    pub fn primary_video_track(&self) -> Option<MediaTrack> {
        self.streams.display.video_tracks().into_iter().next()
    }

    pub fn stats(&self) -> SessionStats {
        let duration = Utc::now().signed_duration_since(self.started_at);

        SessionStats {
            is_recording: self.recorder.state() == RecorderState::Recording,
            started_at: self.started_at,
            duration_secs: duration.num_milliseconds() as f64 / 1000.0,
            chunks_received: self.stats.chunks_received(),
            bytes_buffered: self.stats.bytes_buffered(),
            layout: self.combined.layout(),
            sources: self.sources.clone(),
        }
    }

    /// Stop recording, finalize the container and release every resource
    ///
    /// Best-effort: failures are logged and whatever was collected is
    /// still returned.
    pub async fn finish(mut self) -> FinalizedRecording {
        info!("Finishing capture session");

        if let Err(e) = self.recorder.stop().await {
            error!("Failed to stop recorder cleanly: {:#}", e);
        }

        let buffer = match self.collector.take() {
            Some(collector) => collector.drain().await,
            None => RecordingBuffer::new(),
        };

        let chunk_count = buffer.chunk_count();
        let data = buffer.finalize();

        self.release().await;

        info!(
            "Capture session finished: {} chunks, {} bytes",
            chunk_count,
            data.len()
        );

        FinalizedRecording {
            data,
            mime_type: self.config.profile.container().to_string(),
            chunk_count,
            layout: self.combined.layout(),
        }
    }

    /// Stop every acquired track and close the audio graph
    async fn release(&mut self) {
        let stopped = self.combined.stop_all() + self.streams.release();

        if let Some(mut context) = self.context.take() {
            if let Err(e) = context.close().await {
                warn!("Failed to close audio context: {}", e);
            }
        }

        info!("Released {} track(s)", stopped);
    }
}

/// Chunk collector task and the signal that cuts it short
struct Collector {
    handle: JoinHandle<RecordingBuffer>,
    cancel: oneshot::Sender<()>,
}

impl Collector {
    /// Wait for the recorder to close its channel
    ///
    /// A recorder that keeps the channel open past `DRAIN_TIMEOUT` gets its
    /// collector cancelled, which still hands back every chunk received.
    async fn drain(self) -> RecordingBuffer {
        let Collector { mut handle, cancel } = self;

        let outcome = tokio::time::timeout(DRAIN_TIMEOUT, &mut handle).await;
        let joined = match outcome {
            Ok(joined) => joined,
            Err(_) => {
                warn!(
                    "Recorder kept its chunk channel open for {:?}, finalizing collected chunks",
                    DRAIN_TIMEOUT
                );
                let _ = cancel.send(());
                handle.await
            }
        };

        joined.context("Chunk collector panicked").unwrap_or_else(|e| {
            error!("Discarding buffered chunks: {:#}", e);
            RecordingBuffer::new()
        })
    }
}
