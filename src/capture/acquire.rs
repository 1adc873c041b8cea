// All-or-nothing stream acquisition
//
// Display first, then the microphone if requested. If a later request
// fails, everything already acquired is stopped before the error is
// returned, so a failed start never leaves a live capture behind.

use tracing::{info, warn};

use super::backend::{CaptureBackend, CaptureError, CaptureOptions};
use crate::media::{AudioConstraints, DisplayMediaConstraints, MediaStream, UserMediaConstraints};

/// Streams obtained for one capture session
#[derive(Debug, Clone)]
pub struct AcquiredStreams {
    pub display: MediaStream,
    pub microphone: Option<MediaStream>,
}

impl AcquiredStreams {
    /// Stop every acquired track; returns how many were still live
    pub fn release(&self) -> usize {
        let mut stopped = self.display.stop_all();
        if let Some(mic) = &self.microphone {
            stopped += mic.stop_all();
        }
        stopped
    }
}

pub async fn acquire_streams(
    backend: &dyn CaptureBackend,
    options: CaptureOptions,
    audio: &AudioConstraints,
) -> Result<AcquiredStreams, CaptureError> {
    info!(
        "Acquiring streams via {} (system audio: {}, microphone: {})",
        backend.name(),
        options.system_audio,
        options.microphone
    );

    let display = backend
        .get_display_media(&DisplayMediaConstraints::new(options.system_audio, audio))
        .await?;

    if display.video_tracks().is_empty() {
        display.stop_all();
        return Err(CaptureError::Failed(
            "Display stream has no video track".to_string(),
        ));
    }

    if options.system_audio && display.audio_tracks().is_empty() {
        warn!("System audio requested but the display stream carries none");
    }

    let microphone = if options.microphone {
        match backend
            .get_user_media(&UserMediaConstraints::microphone(audio))
            .await
        {
            Ok(stream) => Some(stream),
            Err(e) => {
                let released = display.stop_all();
                warn!(
                    "Microphone request failed, released {} display track(s): {}",
                    released, e
                );
                return Err(e);
            }
        }
    } else {
        None
    };

    let layout = display.layout();
    info!(
        "Acquired display stream {:?}{}",
        layout,
        if microphone.is_some() { " and microphone" } else { "" }
    );

    Ok(AcquiredStreams {
        display,
        microphone,
    })
}
