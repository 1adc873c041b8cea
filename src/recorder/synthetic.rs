// In-process recorder
//
// Emits a container header, then either a scripted sequence of chunk
// sizes or a fixed-size chunk per timeslice, and a final flush chunk on
// stop. It only accepts streams a real webm muxer would: one video track
// and at most one audio track.

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{info, warn};

use super::backend::{CodecProfile, RecorderBackend, RecorderFactory, RecorderState};
use crate::media::{MediaStream, StreamLayout};

/// EBML magic that opens every webm file
pub const EBML_MAGIC: [u8; 4] = [0x1A, 0x45, 0xDF, 0xA3];

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SyntheticRecorderConfig {
    /// Interval between periodic chunks
    pub timeslice_ms: u64,
    /// Size of each periodic chunk
    pub chunk_bytes: usize,
    /// Emit exactly these chunk sizes (zeros included) instead of ticking
    pub script: Option<Vec<usize>>,
    /// Size of the chunk flushed on stop; 0 emits an empty chunk
    pub final_chunk_bytes: usize,
}

impl Default for SyntheticRecorderConfig {
    fn default() -> Self {
        Self {
            timeslice_ms: 1000,
            chunk_bytes: 4096,
            script: None,
            final_chunk_bytes: 512,
        }
    }
}

/// Creates synthetic recorders and remembers what each one was fed
#[derive(Default)]
pub struct SyntheticRecorderFactory {
    config: SyntheticRecorderConfig,
    started: Arc<Mutex<Vec<StreamLayout>>>,
}

impl SyntheticRecorderFactory {
    pub fn new(config: SyntheticRecorderConfig) -> Self {
        Self {
            config,
            started: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Stream layouts of every recording started so far
    pub fn started_layouts(&self) -> Vec<StreamLayout> {
        self.started
            .lock()
            .map(|layouts| layouts.clone())
            .unwrap_or_default()
    }
}

impl RecorderFactory for SyntheticRecorderFactory {
    fn is_type_supported(&self, profile: &CodecProfile) -> bool {
        profile.container() == "video/webm"
    }

    fn create(&self) -> Result<Box<dyn RecorderBackend>> {
        Ok(Box::new(SyntheticRecorder {
            config: self.config.clone(),
            started: Arc::clone(&self.started),
            stop_tx: None,
            emitter: None,
        }))
    }

    fn name(&self) -> &str {
        "synthetic recorder"
    }
}

pub struct SyntheticRecorder {
    config: SyntheticRecorderConfig,
    started: Arc<Mutex<Vec<StreamLayout>>>,
    stop_tx: Option<oneshot::Sender<()>>,
    emitter: Option<JoinHandle<()>>,
}

impl SyntheticRecorder {
    fn payload(index: usize, size: usize) -> Vec<u8> {
        vec![(index % 251) as u8; size]
    }

    async fn emit(
        config: SyntheticRecorderConfig,
        chunk_tx: mpsc::Sender<Vec<u8>>,
        mut stop_rx: oneshot::Receiver<()>,
    ) {
        if chunk_tx.send(EBML_MAGIC.to_vec()).await.is_err() {
            return;
        }

        match &config.script {
            Some(sizes) => {
                for (i, size) in sizes.iter().enumerate() {
                    if chunk_tx.send(Self::payload(i, *size)).await.is_err() {
                        return;
                    }
                }
                let _ = (&mut stop_rx).await;
            }
            None => {
                let mut ticker =
                    tokio::time::interval(Duration::from_millis(config.timeslice_ms.max(1)));
                ticker.tick().await;
                let mut index = 0;
                loop {
                    tokio::select! {
                        _ = &mut stop_rx => break,
                        _ = ticker.tick() => {
                            if chunk_tx.send(Self::payload(index, config.chunk_bytes)).await.is_err() {
                                return;
                            }
                            index += 1;
                        }
                    }
                }
            }
        }

        if chunk_tx
            .send(Self::payload(usize::MAX, config.final_chunk_bytes))
            .await
            .is_err()
        {
            warn!("Chunk receiver dropped before final flush");
        }
    }
}

#[async_trait::async_trait]
impl RecorderBackend for SyntheticRecorder {
    async fn start(
        &mut self,
        stream: &MediaStream,
        profile: &CodecProfile,
    ) -> Result<mpsc::Receiver<Vec<u8>>> {
        if self.stop_tx.is_some() {
            bail!("Already recording");
        }
        if profile.container() != "video/webm" {
            bail!("Unsupported recording profile: {}", profile.mime_type);
        }

        let layout = stream.layout();
        if layout.video_tracks != 1 || layout.audio_tracks > 1 {
            bail!(
                "Recorder needs one video track and at most one audio track, got {:?}",
                layout
            );
        }

        self.started
            .lock()
            .map_err(|_| anyhow::anyhow!("Recorder layout log poisoned"))?
            .push(layout);

        info!("Synthetic recorder started: {} {:?}", profile.mime_type, layout);

        let (chunk_tx, chunk_rx) = mpsc::channel(100);
        let (stop_tx, stop_rx) = oneshot::channel();
        self.stop_tx = Some(stop_tx);
        self.emitter = Some(tokio::spawn(Self::emit(
            self.config.clone(),
            chunk_tx,
            stop_rx,
        )));

        Ok(chunk_rx)
    }

    async fn stop(&mut self) -> Result<()> {
        let Some(stop_tx) = self.stop_tx.take() else {
            return Ok(());
        };

        info!("Stopping synthetic recorder");
        let _ = stop_tx.send(());

        if let Some(emitter) = self.emitter.take() {
            emitter.await.context("Recorder emitter task panicked")?;
        }

        Ok(())
    }

    fn state(&self) -> RecorderState {
        if self.stop_tx.is_some() {
            RecorderState::Recording
        } else {
            RecorderState::Inactive
        }
    }

    fn name(&self) -> &str {
        "synthetic recorder"
    }
}
