// Integration tests for the recorder controller
//
// These tests drive complete start/stop cycles against the synthetic
// platform and check UI state, resource release and the recordings list.

mod common;

use anyhow::Result;
use common::{harness, harness_with_config, scripted_recorder, wait_for_event};
use screen_recorder::audio::AudioStreamSource;
use screen_recorder::capture::{CaptureError, DevicePolicy, SyntheticCaptureConfig};
use screen_recorder::media::StreamLayout;
use screen_recorder::recorder::{SyntheticRecorderConfig, EBML_MAGIC};
use screen_recorder::{
    CaptureOptions, Config, ControllerEvent, ControllerState, ListItem, StartError, UiState,
};

const BOTH: CaptureOptions = CaptureOptions {
    system_audio: true,
    microphone: true,
};

#[tokio::test]
async fn test_video_only_recording_replaces_placeholder() -> Result<()> {
    let h = harness(SyntheticCaptureConfig::default(), scripted_recorder());

    assert!(matches!(
        h.controller.recordings().await.as_slice(),
        [ListItem::Placeholder { .. }]
    ));

    h.controller.start(CaptureOptions::default()).await?;
    assert_eq!(h.controller.state().await, ControllerState::Recording);

    let entry = h.controller.stop().await.expect("stop should finalize");

    // header + 100 + 250, the empty chunks are dropped
    assert_eq!(entry.size_bytes, EBML_MAGIC.len() + 350);
    assert_eq!(
        entry.layout,
        StreamLayout {
            video_tracks: 1,
            audio_tracks: 0
        }
    );
    assert!(entry.label.starts_with("recording-"));
    assert!(entry.label.ends_with(".webm"));

    let items = h.controller.recordings().await;
    assert_eq!(items.len(), 1, "Placeholder should be replaced, not kept");
    assert!(matches!(&items[0], ListItem::Recording(e) if e.id == entry.id));

    let artifact = h.controller.artifact(&entry.id).await.expect("artifact");
    assert_eq!(artifact.chunk_count, 3);
    assert_eq!(&artifact.data[..4], &EBML_MAGIC);
    assert_eq!(artifact.mime_type, "video/webm");

    Ok(())
}

#[tokio::test]
async fn test_both_audio_sources_are_mixed_into_one_track() -> Result<()> {
    let h = harness(SyntheticCaptureConfig::default(), scripted_recorder());

    h.controller.start(BOTH).await?;

    let snapshot = h.controller.snapshot().await;
    let session = snapshot.session.expect("session stats while recording");
    assert_eq!(
        session.sources,
        vec![AudioStreamSource::System, AudioStreamSource::Microphone]
    );
    assert_eq!(h.audio.contexts_created(), 1);
    assert_eq!(h.audio.open_contexts(), 1);

    let entry = h.controller.stop().await.expect("stop should finalize");

    assert_eq!(
        h.recorder.started_layouts(),
        vec![StreamLayout {
            video_tracks: 1,
            audio_tracks: 1
        }]
    );
    assert_eq!(entry.layout.audio_tracks, 1);
    assert_eq!(h.audio.open_contexts(), 0, "Audio graph must be closed on stop");
    assert_eq!(h.capture.live_track_count(), 0, "Every track must be released");

    Ok(())
}

#[tokio::test]
async fn test_single_audio_source_skips_audio_graph() -> Result<()> {
    let h = harness(SyntheticCaptureConfig::default(), scripted_recorder());

    h.controller
        .start(CaptureOptions {
            system_audio: false,
            microphone: true,
        })
        .await?;
    h.controller.stop().await;

    assert_eq!(h.audio.contexts_created(), 0);
    assert_eq!(h.recorder.started_layouts()[0].audio_tracks, 1);

    Ok(())
}

#[tokio::test]
async fn test_ui_toggles_on_start_and_stop() -> Result<()> {
    let h = harness(SyntheticCaptureConfig::default(), scripted_recorder());

    let idle = h.controller.snapshot().await;
    assert_eq!(
        idle.ui,
        UiState {
            start_enabled: true,
            stop_enabled: false
        }
    );
    assert!(idle.preview.is_none());

    h.controller.start(CaptureOptions::default()).await?;
    let recording = h.controller.snapshot().await;
    assert_eq!(
        recording.ui,
        UiState {
            start_enabled: false,
            stop_enabled: true
        }
    );
    assert_eq!(recording.preview.map(|p| p.video_tracks), Some(1));

    h.controller.stop().await;
    let after = h.controller.snapshot().await;
    assert_eq!(after.ui, idle.ui);
    assert!(after.preview.is_none(), "Preview must be cleared");
    assert!(after.session.is_none());

    Ok(())
}

#[tokio::test]
async fn test_stop_while_idle_is_noop() -> Result<()> {
    let h = harness(SyntheticCaptureConfig::default(), scripted_recorder());

    assert!(h.controller.stop().await.is_none());

    h.controller.start(CaptureOptions::default()).await?;
    assert!(h.controller.stop().await.is_some());
    assert!(h.controller.stop().await.is_none(), "Second stop must not finalize again");

    assert_eq!(h.controller.entries().await.len(), 1);
    assert_eq!(h.controller.state().await, ControllerState::Idle);

    Ok(())
}

#[tokio::test]
async fn test_start_while_recording_is_rejected() -> Result<()> {
    let h = harness(SyntheticCaptureConfig::default(), scripted_recorder());

    h.controller.start(CaptureOptions::default()).await?;
    let err = h.controller.start(BOTH).await.unwrap_err();

    assert!(matches!(err, StartError::StartDisabled(ControllerState::Recording)));
    assert_eq!(h.controller.state().await, ControllerState::Recording);
    assert_eq!(h.recorder.started_layouts().len(), 1);

    h.controller.stop().await;
    Ok(())
}

#[tokio::test]
async fn test_denied_display_alerts_and_stays_idle() -> Result<()> {
    let h = harness(
        SyntheticCaptureConfig {
            display: DevicePolicy::Deny,
            ..SyntheticCaptureConfig::default()
        },
        scripted_recorder(),
    );
    let mut events = h.controller.subscribe();

    let err = h.controller.start(CaptureOptions::default()).await.unwrap_err();
    assert!(matches!(err, StartError::Capture(CaptureError::Denied(_))));

    let alert = wait_for_event(&mut events, |e| matches!(e, ControllerEvent::Alert { .. })).await?;
    if let ControllerEvent::Alert { message } = alert {
        assert_eq!(message, err.alert_message());
    }

    assert_eq!(h.controller.state().await, ControllerState::Idle);
    assert!(h.controller.snapshot().await.ui.start_enabled);
    assert!(h.controller.entries().await.is_empty(), "No artifact on failed start");

    Ok(())
}

#[tokio::test]
async fn test_denied_microphone_releases_display() -> Result<()> {
    let h = harness(
        SyntheticCaptureConfig {
            microphone: DevicePolicy::Deny,
            ..SyntheticCaptureConfig::default()
        },
        scripted_recorder(),
    );

    let err = h.controller.start(BOTH).await.unwrap_err();

    assert!(matches!(err, StartError::Capture(CaptureError::Denied(_))));
    assert_eq!(h.capture.live_track_count(), 0, "Display stream must not leak");
    assert_eq!(h.controller.state().await, ControllerState::Idle);

    // The controller is usable again afterwards
    h.controller.start(CaptureOptions::default()).await?;
    assert!(h.controller.stop().await.is_some());

    Ok(())
}

#[tokio::test]
async fn test_unsupported_profile_fails_before_capture() -> Result<()> {
    let mut config = Config::default();
    config.recorder.mime_type = "video/mp4; codecs=avc1".to_string();
    let h = harness_with_config(config, SyntheticCaptureConfig::default(), scripted_recorder());

    let err = h.controller.start(BOTH).await.unwrap_err();

    assert!(matches!(err, StartError::Failed(_)));
    assert_eq!(h.capture.live_track_count(), 0);
    assert_eq!(h.audio.contexts_created(), 0);

    Ok(())
}

#[tokio::test]
async fn test_external_end_of_share_stops_recording() -> Result<()> {
    let h = harness(SyntheticCaptureConfig::default(), scripted_recorder());
    let mut events = h.controller.subscribe();

    h.controller.start(BOTH).await?;
    assert_eq!(h.capture.end_display_share(), 1);

    let added = wait_for_event(&mut events, |e| {
        matches!(e, ControllerEvent::RecordingAdded { .. })
    })
    .await?;
    wait_for_event(&mut events, |e| {
        matches!(
            e,
            ControllerEvent::StateChanged {
                state: ControllerState::Idle,
                ..
            }
        )
    })
    .await?;

    assert_eq!(h.controller.state().await, ControllerState::Idle);
    assert_eq!(h.controller.entries().await.len(), 1);
    assert_eq!(h.capture.live_track_count(), 0);
    assert_eq!(h.audio.open_contexts(), 0);
    if let ControllerEvent::RecordingAdded { entry } = added {
        assert_eq!(entry.layout.audio_tracks, 1);
    }

    // A manual stop afterwards finds nothing to do
    assert!(h.controller.stop().await.is_none());

    Ok(())
}

#[tokio::test]
async fn test_periodic_recorder_collects_chunks() -> Result<()> {
    let h = harness(
        SyntheticCaptureConfig::default(),
        SyntheticRecorderConfig {
            timeslice_ms: 10,
            chunk_bytes: 64,
            script: None,
            final_chunk_bytes: 32,
        },
    );

    h.controller.start(CaptureOptions::default()).await?;
    tokio::time::sleep(std::time::Duration::from_millis(60)).await;
    let entry = h.controller.stop().await.expect("stop should finalize");

    let artifact = h.controller.artifact(&entry.id).await.expect("artifact");
    let periodic = artifact.chunk_count - 2; // minus header and final flush
    assert_eq!(artifact.size(), EBML_MAGIC.len() + 64 * periodic + 32);

    Ok(())
}

#[tokio::test]
async fn test_recordings_are_appended_in_order() -> Result<()> {
    let h = harness(SyntheticCaptureConfig::default(), scripted_recorder());

    let mut ids = Vec::new();
    for options in [CaptureOptions::default(), BOTH] {
        h.controller.start(options).await?;
        ids.push(h.controller.stop().await.expect("entry").id);
    }

    let listed: Vec<_> = h.controller.entries().await.into_iter().map(|e| e.id).collect();
    assert_eq!(listed, ids);

    // Revoking the reference keeps the entry listed
    assert!(h.controller.revoke(&ids[0]).await);
    assert!(!h.controller.revoke(&ids[0]).await);
    assert!(h.controller.artifact(&ids[0]).await.is_none());
    assert_eq!(h.controller.entries().await.len(), 2);

    Ok(())
}
