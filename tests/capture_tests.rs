// Integration tests for stream acquisition
//
// These tests verify the constraints sent to the platform and the
// all-or-nothing release on partial failure.

use anyhow::Result;
use screen_recorder::capture::{
    acquire_streams, CaptureBackend, CaptureError, DevicePolicy, SyntheticCapture,
    SyntheticCaptureConfig,
};
use screen_recorder::media::{
    AudioConstraints, CursorMode, DisplayMediaConstraints, MediaStream, UserMediaConstraints,
};
use screen_recorder::CaptureOptions;
use std::sync::Mutex;

/// Wraps the synthetic backend and records every request
#[derive(Default)]
struct RequestLog {
    inner: SyntheticCapture,
    display: Mutex<Vec<DisplayMediaConstraints>>,
    user: Mutex<Vec<UserMediaConstraints>>,
}

#[async_trait::async_trait]
impl CaptureBackend for RequestLog {
    async fn get_display_media(
        &self,
        constraints: &DisplayMediaConstraints,
    ) -> Result<MediaStream, CaptureError> {
        self.display.lock().unwrap().push(constraints.clone());
        self.inner.get_display_media(constraints).await
    }

    async fn get_user_media(
        &self,
        constraints: &UserMediaConstraints,
    ) -> Result<MediaStream, CaptureError> {
        self.user.lock().unwrap().push(constraints.clone());
        self.inner.get_user_media(constraints).await
    }

    fn name(&self) -> &str {
        "request log"
    }
}

#[tokio::test]
async fn test_video_only_request() -> Result<()> {
    let backend = RequestLog::default();

    let streams = acquire_streams(&backend, CaptureOptions::default(), &AudioConstraints::default()).await?;

    let display = backend.display.lock().unwrap().clone();
    assert_eq!(display.len(), 1);
    assert_eq!(display[0].cursor, CursorMode::Always);
    assert!(display[0].audio.is_none());
    assert!(backend.user.lock().unwrap().is_empty(), "No microphone prompt");

    assert_eq!(streams.display.video_tracks().len(), 1);
    assert!(streams.display.audio_tracks().is_empty());
    assert!(streams.microphone.is_none());

    Ok(())
}

#[tokio::test]
async fn test_audio_constraints_are_forwarded() -> Result<()> {
    let backend = RequestLog::default();
    let options = CaptureOptions {
        system_audio: true,
        microphone: true,
    };

    acquire_streams(&backend, options, &AudioConstraints::default()).await?;

    let expected = AudioConstraints {
        echo_cancellation: true,
        noise_suppression: true,
        sample_rate: 44100,
    };
    assert_eq!(backend.display.lock().unwrap()[0].audio, Some(expected.clone()));

    let user = backend.user.lock().unwrap().clone();
    assert_eq!(user.len(), 1);
    assert_eq!(user[0].audio, Some(expected));
    assert!(!user[0].video);

    Ok(())
}

#[tokio::test]
async fn test_display_unavailable() {
    let backend = SyntheticCapture::new(SyntheticCaptureConfig {
        display: DevicePolicy::Unavailable,
        ..SyntheticCaptureConfig::default()
    });

    let err = acquire_streams(&backend, CaptureOptions::default(), &AudioConstraints::default())
        .await
        .unwrap_err();

    assert!(matches!(err, CaptureError::Unavailable(_)));
    assert_eq!(backend.live_track_count(), 0);
}

#[tokio::test]
async fn test_microphone_failure_releases_display() {
    let backend = SyntheticCapture::new(SyntheticCaptureConfig {
        microphone: DevicePolicy::Unavailable,
        ..SyntheticCaptureConfig::default()
    });
    let options = CaptureOptions {
        system_audio: true,
        microphone: true,
    };

    let err = acquire_streams(&backend, options, &AudioConstraints::default())
        .await
        .unwrap_err();

    assert!(matches!(err, CaptureError::Unavailable(_)));
    assert_eq!(backend.live_track_count(), 0, "Display video and audio must be stopped");
}

#[tokio::test]
async fn test_release_stops_all_acquired_tracks() -> Result<()> {
    let backend = SyntheticCapture::default();
    let options = CaptureOptions {
        system_audio: true,
        microphone: true,
    };

    let streams = acquire_streams(&backend, options, &AudioConstraints::default()).await?;
    assert_eq!(backend.live_track_count(), 3);

    assert_eq!(streams.release(), 3);
    assert_eq!(streams.release(), 0);
    assert_eq!(backend.live_track_count(), 0);

    Ok(())
}
