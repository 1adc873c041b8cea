//! Capture session management
//!
//! This module provides the `CaptureSession` abstraction that manages:
//! - Display and microphone acquisition (all-or-nothing)
//! - Audio mixing into a single combined stream
//! - The recorder and the task collecting its chunks
//! - Finalization into a recording and release of every resource

mod config;
mod session;
mod stats;

pub use config::SessionConfig;
pub use session::CaptureSession;
pub use stats::SessionStats;
