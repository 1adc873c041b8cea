mod controller;
mod state;

pub use controller::RecorderController;
pub use state::{ControllerEvent, ControllerState, UiSnapshot, UiState};
