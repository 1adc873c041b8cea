use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::debug;

/// Kind of media carried by a track
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrackKind {
    Video,
    Audio,
}

/// Lifecycle of a track
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrackState {
    /// Delivering media
    Live,
    /// Released by us via `stop()`
    Stopped,
    /// Terminated by the platform (e.g. the user pressed "stop sharing")
    Ended,
}

struct TrackInner {
    id: String,
    kind: TrackKind,
    label: String,
    state: watch::Sender<TrackState>,
}

/// Handle to a single captured media track
///
/// Clones share the same underlying track, so stopping one clone stops
/// them all.
#[derive(Clone)]
pub struct MediaTrack {
    inner: Arc<TrackInner>,
}

impl MediaTrack {
    pub fn new(kind: TrackKind, label: impl Into<String>) -> Self {
        let (state, _) = watch::channel(TrackState::Live);
        Self {
            inner: Arc::new(TrackInner {
                id: uuid::Uuid::new_v4().to_string(),
                kind,
                label: label.into(),
                state,
            }),
        }
    }

    pub fn id(&self) -> &str {
        &self.inner.id
    }

    pub fn kind(&self) -> TrackKind {
        self.inner.kind
    }

    pub fn label(&self) -> &str {
        &self.inner.label
    }

    pub fn state(&self) -> TrackState {
        *self.inner.state.borrow()
    }

    pub fn is_live(&self) -> bool {
        self.state() == TrackState::Live
    }

    /// Release the track. Returns false if it was no longer live.
    pub fn stop(&self) -> bool {
        let changed = self.transition(TrackState::Stopped);
        if changed {
            debug!("Stopped {:?} track {} ({})", self.kind(), self.label(), self.id());
        }
        changed
    }

    /// Mark the track as ended by the platform. Returns false if it was no
    /// longer live.
    pub fn end(&self) -> bool {
        let changed = self.transition(TrackState::Ended);
        if changed {
            debug!("{:?} track {} ended externally", self.kind(), self.id());
        }
        changed
    }

    /// Watch state changes of this track
    pub fn subscribe(&self) -> watch::Receiver<TrackState> {
        self.inner.state.subscribe()
    }

    /// Whether two handles refer to the same track
    pub fn same_track(&self, other: &MediaTrack) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    fn transition(&self, to: TrackState) -> bool {
        self.inner.state.send_if_modified(|state| {
            if *state == TrackState::Live {
                *state = to;
                true
            } else {
                false
            }
        })
    }
}

impl fmt::Debug for MediaTrack {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MediaTrack")
            .field("id", &self.id())
            .field("kind", &self.kind())
            .field("label", &self.label())
            .field("state", &self.state())
            .finish()
    }
}
