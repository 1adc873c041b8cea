//! Finished recordings
//!
//! Artifacts live in memory for the lifetime of the process. Each one is
//! reachable through a revocable reference and listed in an append-only
//! list that starts out showing a placeholder.

mod artifact;
mod library;
mod list;
mod registry;

pub use artifact::{file_name_for, FinalizedRecording, RecordingArtifact};
pub use library::RecordingLibrary;
pub use list::{ListItem, RecordingEntry, RecordingList};
pub use registry::BlobRegistry;
