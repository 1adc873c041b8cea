//! Errors surfaced to whoever pressed "start"

use thiserror::Error;

use crate::capture::CaptureError;
use crate::controller::ControllerState;

#[derive(Error, Debug)]
pub enum StartError {
    /// The start control is disabled in the current state
    #[error("Recording cannot start while {0:?}")]
    StartDisabled(ControllerState),

    #[error(transparent)]
    Capture(#[from] CaptureError),

    #[error("Failed to start recording: {0:#}")]
    Failed(#[from] anyhow::Error),
}

impl StartError {
    /// Text of the blocking alert shown to the user
    pub fn alert_message(&self) -> String {
        match self {
            StartError::StartDisabled(_) => "A recording is already in progress.".to_string(),
            StartError::Capture(CaptureError::Denied(_)) => {
                "Screen capture permission was denied. Recording did not start.".to_string()
            }
            StartError::Capture(CaptureError::Unavailable(_)) => {
                "No capture device is available. Recording did not start.".to_string()
            }
            StartError::Capture(CaptureError::Failed(_)) | StartError::Failed(_) => {
                "Failed to start recording. Check the log for details.".to_string()
            }
        }
    }

    /// Stable machine-readable code
    pub fn code(&self) -> &'static str {
        match self {
            StartError::StartDisabled(_) => "START_DISABLED",
            StartError::Capture(CaptureError::Denied(_)) => "CAPTURE_DENIED",
            StartError::Capture(CaptureError::Unavailable(_)) => "CAPTURE_UNAVAILABLE",
            StartError::Capture(CaptureError::Failed(_)) => "CAPTURE_FAILED",
            StartError::Failed(_) => "START_FAILED",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_denied_alert() {
        let err = StartError::from(CaptureError::Denied("user declined".to_string()));
        assert_eq!(err.code(), "CAPTURE_DENIED");
        assert!(err.alert_message().contains("denied"));
        assert!(err.to_string().contains("user declined"));
    }

    #[test]
    fn test_generic_failure_alert() {
        let err = StartError::from(anyhow::anyhow!("recorder exploded"));
        assert_eq!(err.code(), "START_FAILED");
        assert_eq!(
            err.alert_message(),
            "Failed to start recording. Check the log for details."
        );
    }
}
