pub mod audio;
pub mod capture;
pub mod config;
pub mod controller;
pub mod error;
pub mod http;
pub mod library;
pub mod media;
pub mod platform;
pub mod recorder;
pub mod session;

pub use capture::{CaptureBackend, CaptureError, CaptureOptions};
pub use config::Config;
pub use controller::{ControllerEvent, ControllerState, RecorderController, UiSnapshot, UiState};
pub use error::StartError;
pub use http::{create_router, AppState};
pub use library::{ListItem, RecordingEntry};
pub use platform::Platform;
pub use session::{CaptureSession, SessionConfig, SessionStats};
