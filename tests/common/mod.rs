// Shared harness for controller-level tests
#![allow(dead_code)]

use anyhow::{bail, Result};
use screen_recorder::audio::SoftwareAudioGraph;
use screen_recorder::capture::{SyntheticCapture, SyntheticCaptureConfig};
use screen_recorder::recorder::{SyntheticRecorderConfig, SyntheticRecorderFactory};
use screen_recorder::{Config, ControllerEvent, Platform, RecorderController};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast;

pub struct Harness {
    pub controller: RecorderController,
    pub capture: Arc<SyntheticCapture>,
    pub audio: Arc<SoftwareAudioGraph>,
    pub recorder: Arc<SyntheticRecorderFactory>,
}

/// Recorder that emits `[100, 0, 250]` plus an empty final flush
pub fn scripted_recorder() -> SyntheticRecorderConfig {
    SyntheticRecorderConfig {
        script: Some(vec![100, 0, 250]),
        final_chunk_bytes: 0,
        ..SyntheticRecorderConfig::default()
    }
}

pub fn harness(capture: SyntheticCaptureConfig, recorder: SyntheticRecorderConfig) -> Harness {
    harness_with_config(Config::default(), capture, recorder)
}

pub fn harness_with_config(
    config: Config,
    capture: SyntheticCaptureConfig,
    recorder: SyntheticRecorderConfig,
) -> Harness {
    let capture = Arc::new(SyntheticCapture::new(capture));
    let audio = Arc::new(SoftwareAudioGraph::new());
    let recorder = Arc::new(SyntheticRecorderFactory::new(recorder));

    let platform = Platform::new(capture.clone(), audio.clone(), recorder.clone());

    Harness {
        controller: RecorderController::new(config, platform),
        capture,
        audio,
        recorder,
    }
}

/// Wait for the first event matching `pred`
pub async fn wait_for_event<F>(
    rx: &mut broadcast::Receiver<ControllerEvent>,
    mut pred: F,
) -> Result<ControllerEvent>
where
    F: FnMut(&ControllerEvent) -> bool,
{
    let wait = async {
        loop {
            let event = rx.recv().await?;
            if pred(&event) {
                return Ok::<_, anyhow::Error>(event);
            }
        }
    };

    match tokio::time::timeout(Duration::from_secs(5), wait).await {
        Ok(event) => event,
        Err(_) => bail!("Timed out waiting for controller event"),
    }
}
