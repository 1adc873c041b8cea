pub mod acquire;
pub mod backend;
pub mod synthetic;

pub use acquire::{acquire_streams, AcquiredStreams};
pub use backend::{CaptureBackend, CaptureError, CaptureOptions};
pub use synthetic::{DevicePolicy, SyntheticCapture, SyntheticCaptureConfig};
