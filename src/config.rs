use anyhow::{Context, Result};
use serde::Deserialize;

use crate::capture::SyntheticCaptureConfig;
use crate::media::AudioConstraints;
use crate::recorder::{CodecProfile, SyntheticRecorderConfig};

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub service: ServiceConfig,
    pub capture: CaptureConfig,
    pub recorder: RecorderConfig,
    pub library: LibraryConfig,
    pub platform: PlatformConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    pub name: String,
    pub http: HttpConfig,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            name: "screen-recorder".to_string(),
            http: HttpConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    pub bind: String,
    pub port: u16,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1".to_string(),
            port: 8080,
        }
    }
}

/// Audio processing requested from capture devices
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CaptureConfig {
    pub echo_cancellation: bool,
    pub noise_suppression: bool,
    pub sample_rate: u32,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        let audio = AudioConstraints::default();
        Self {
            echo_cancellation: audio.echo_cancellation,
            noise_suppression: audio.noise_suppression,
            sample_rate: audio.sample_rate,
        }
    }
}

impl CaptureConfig {
    pub fn audio_constraints(&self) -> AudioConstraints {
        AudioConstraints {
            echo_cancellation: self.echo_cancellation,
            noise_suppression: self.noise_suppression,
            sample_rate: self.sample_rate,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RecorderConfig {
    /// Requested container/codec profile
    pub mime_type: String,
}

impl Default for RecorderConfig {
    fn default() -> Self {
        Self {
            mime_type: CodecProfile::default().mime_type,
        }
    }
}

impl RecorderConfig {
    pub fn profile(&self) -> CodecProfile {
        CodecProfile::new(self.mime_type.clone())
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LibraryConfig {
    /// Shown while no recording exists
    pub placeholder: String,
    pub file_prefix: String,
    pub file_extension: String,
    pub download_label: String,
}

impl Default for LibraryConfig {
    fn default() -> Self {
        Self {
            placeholder: "No recordings yet".to_string(),
            file_prefix: "recording".to_string(),
            file_extension: "webm".to_string(),
            download_label: "Download".to_string(),
        }
    }
}

/// Knobs of the bundled synthetic platform
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PlatformConfig {
    pub capture: SyntheticCaptureConfig,
    pub recorder: SyntheticRecorderConfig,
}

impl Config {
    pub fn load(path: &str) -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(path))
            .build()
            .with_context(|| format!("Failed to read config {}", path))?;

        settings
            .try_deserialize()
            .with_context(|| format!("Invalid config {}", path))
    }
}
