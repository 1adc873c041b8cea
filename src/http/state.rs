use crate::controller::RecorderController;

/// Shared application state for HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// The single recorder behind the UI
    pub controller: RecorderController,
}

impl AppState {
    pub fn new(controller: RecorderController) -> Self {
        Self { controller }
    }
}
