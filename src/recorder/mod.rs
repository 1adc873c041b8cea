pub mod backend;
pub mod buffer;
pub mod synthetic;

pub use backend::{CodecProfile, RecorderBackend, RecorderFactory, RecorderState};
pub use buffer::{collect_chunks, CollectorStats, RecordingBuffer};
pub use synthetic::{SyntheticRecorder, SyntheticRecorderConfig, SyntheticRecorderFactory, EBML_MAGIC};
