use std::sync::Arc;
use tracing::info;

use crate::audio::{AudioGraphFactory, SoftwareAudioGraph};
use crate::capture::{CaptureBackend, SyntheticCapture};
use crate::config::PlatformConfig;
use crate::recorder::{RecorderFactory, SyntheticRecorderFactory};

/// The three media API boundaries a recorder needs
#[derive(Clone)]
pub struct Platform {
    pub capture: Arc<dyn CaptureBackend>,
    pub audio: Arc<dyn AudioGraphFactory>,
    pub recorder: Arc<dyn RecorderFactory>,
}

impl Platform {
    pub fn new(
        capture: Arc<dyn CaptureBackend>,
        audio: Arc<dyn AudioGraphFactory>,
        recorder: Arc<dyn RecorderFactory>,
    ) -> Self {
        Self {
            capture,
            audio,
            recorder,
        }
    }

    /// In-process platform driven by configuration
    pub fn synthetic(config: &PlatformConfig) -> Self {
        let platform = Self::new(
            Arc::new(SyntheticCapture::new(config.capture.clone())),
            Arc::new(SoftwareAudioGraph::new()),
            Arc::new(SyntheticRecorderFactory::new(config.recorder.clone())),
        );
        info!(
            "Platform ready: {}, {}, {}",
            platform.capture.name(),
            platform.audio.name(),
            platform.recorder.name()
        );
        platform
    }
}
