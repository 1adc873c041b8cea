use chrono::Local;
use std::sync::Arc;
use tokio::sync::{broadcast, oneshot, Mutex, RwLock};
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use super::state::{ControllerEvent, ControllerState, UiSnapshot, UiState};
use crate::capture::CaptureOptions;
use crate::config::Config;
use crate::error::StartError;
use crate::library::{ListItem, RecordingArtifact, RecordingEntry, RecordingLibrary};
use crate::media::{MediaStream, MediaTrack, TrackState};
use crate::platform::Platform;
use crate::session::{CaptureSession, SessionConfig};

#[derive(Default)]
struct Inner {
    state: ControllerState,
    session: Option<CaptureSession>,
    preview: Option<MediaStream>,
    /// Dropping this cancels the display-end watcher
    watcher_cancel: Option<oneshot::Sender<()>>,
}

/// Drives start/stop of recordings and owns the finished ones
///
/// Cheap to clone; clones share the same state.
#[derive(Clone)]
pub struct RecorderController {
    config: Arc<Config>,
    platform: Platform,
    inner: Arc<Mutex<Inner>>,
    library: Arc<RwLock<RecordingLibrary>>,
    events: broadcast::Sender<ControllerEvent>,
}

impl RecorderController {
    pub fn new(config: Config, platform: Platform) -> Self {
        let (events, _) = broadcast::channel(64);
        let library = RecordingLibrary::new(config.library.clone());

        Self {
            config: Arc::new(config),
            platform,
            inner: Arc::new(Mutex::new(Inner::default())),
            library: Arc::new(RwLock::new(library)),
            events,
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ControllerEvent> {
        self.events.subscribe()
    }

    pub async fn state(&self) -> ControllerState {
        self.inner.lock().await.state
    }

    pub async fn snapshot(&self) -> UiSnapshot {
        let inner = self.inner.lock().await;
        UiSnapshot {
            state: inner.state,
            ui: UiState::from(inner.state),
            preview: inner.preview.as_ref().map(MediaStream::layout),
            session: inner.session.as_ref().map(CaptureSession::stats),
        }
    }

    /// Start a recording with the given audio toggles
    ///
    /// Only allowed while idle. On failure an alert is broadcast and the
    /// controller stays idle.
    pub async fn start(&self, options: CaptureOptions) -> Result<(), StartError> {
        {
            let mut inner = self.inner.lock().await;
            if inner.state != ControllerState::Idle {
                warn!("Start ignored while {:?}", inner.state);
                return Err(StartError::StartDisabled(inner.state));
            }
            inner.state = ControllerState::Starting;
        }
        self.emit_state(ControllerState::Starting);

        let config = SessionConfig::new(options, &self.config);

        let session = match CaptureSession::open(&self.platform, config).await {
            Ok(session) => session,
            Err(e) => {
                error!("Error starting recording: {}", e);
                self.inner.lock().await.state = ControllerState::Idle;
                self.emit(ControllerEvent::Alert {
                    message: e.alert_message(),
                });
                self.emit_state(ControllerState::Idle);
                return Err(e);
            }
        };

        let display_video = session.primary_video_track();
        let (cancel_tx, cancel_rx) = oneshot::channel();
        {
            let mut inner = self.inner.lock().await;
            inner.preview = Some(session.combined_stream().clone());
            inner.session = Some(session);
            inner.watcher_cancel = Some(cancel_tx);
            inner.state = ControllerState::Recording;
        }

        if let Some(track) = display_video {
            self.spawn_end_watcher(track, cancel_rx);
        }

        info!("Recording started");
        self.emit_state(ControllerState::Recording);
        Ok(())
    }

    /// Stop the current recording and register the result
    ///
    /// A no-op returning `None` unless recording; never finalizes twice.
    pub async fn stop(&self) -> Option<RecordingEntry> {
        let session = {
            let mut inner = self.inner.lock().await;
            if inner.state != ControllerState::Recording {
                debug!("Stop ignored while {:?}", inner.state);
                return None;
            }
            inner.state = ControllerState::Stopping;
            inner.watcher_cancel = None;
            inner.session.take()
        };
        self.emit_state(ControllerState::Stopping);

        let entry = match session {
            Some(session) => {
                let recording = session.finish().await;
                let entry = self.library.write().await.register(recording, Local::now());
                Some(entry)
            }
            None => {
                error!("Recording state without a capture session");
                None
            }
        };

        {
            let mut inner = self.inner.lock().await;
            inner.preview = None;
            inner.state = ControllerState::Idle;
        }

        if let Some(entry) = &entry {
            info!("Recording stopped: {}", entry.label);
            self.emit(ControllerEvent::RecordingAdded {
                entry: entry.clone(),
            });
        }
        self.emit_state(ControllerState::Idle);

        entry
    }

    pub async fn recordings(&self) -> Vec<ListItem> {
        self.library.read().await.items()
    }

    pub async fn entries(&self) -> Vec<RecordingEntry> {
        self.library.read().await.entries()
    }

    pub async fn artifact(&self, id: &Uuid) -> Option<Arc<RecordingArtifact>> {
        self.library.read().await.resolve(id)
    }

    /// Invalidate a recording's download reference
    pub async fn revoke(&self, id: &Uuid) -> bool {
        self.library.write().await.revoke(id)
    }

    /// Stop the recording when the platform ends the display share
    fn spawn_end_watcher(&self, track: MediaTrack, mut cancel: oneshot::Receiver<()>) {
        let controller = self.clone();
        let mut state_rx = track.subscribe();

        tokio::spawn(async move {
            loop {
                let ended = *state_rx.borrow_and_update() == TrackState::Ended;
                if ended {
                    info!("Display share ended externally, stopping recording");
                    controller.stop().await;
                    return;
                }

                tokio::select! {
                    _ = &mut cancel => return,
                    changed = state_rx.changed() => {
                        if changed.is_err() {
                            return;
                        }
                    }
                }
            }
        });
    }

    fn emit_state(&self, state: ControllerState) {
        self.emit(ControllerEvent::StateChanged {
            state,
            ui: UiState::from(state),
        });
    }

    fn emit(&self, event: ControllerEvent) {
        // No subscribers is fine
        let _ = self.events.send(event);
    }
}
