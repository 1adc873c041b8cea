//! Recorder state machine and UI projection

use serde::{Deserialize, Serialize};

use crate::library::RecordingEntry;
use crate::media::StreamLayout;
use crate::session::SessionStats;

/// Lifecycle of the recorder controller
///
/// `Idle → Starting → Recording → Stopping → Idle`; a failed start goes
/// back from `Starting` to `Idle`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ControllerState {
    #[default]
    Idle,
    Starting,
    Recording,
    Stopping,
}

/// Enablement of the two UI triggers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UiState {
    pub start_enabled: bool,
    pub stop_enabled: bool,
}

impl From<ControllerState> for UiState {
    fn from(state: ControllerState) -> Self {
        Self {
            start_enabled: state == ControllerState::Idle,
            stop_enabled: state == ControllerState::Recording,
        }
    }
}

/// Everything the UI renders besides the recordings list
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiSnapshot {
    pub state: ControllerState,
    pub ui: UiState,
    /// Layout of the live preview, if any
    pub preview: Option<StreamLayout>,
    pub session: Option<SessionStats>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum ControllerEvent {
    StateChanged {
        state: ControllerState,
        ui: UiState,
    },
    /// Blocking alert for the user
    Alert { message: String },
    RecordingAdded { entry: RecordingEntry },
}
