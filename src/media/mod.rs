//! Media primitives shared by every platform boundary
//!
//! Tracks and streams are plain handles: the platform owns the devices
//! behind them, we only observe and release them.

pub mod constraints;
pub mod stream;
pub mod track;

pub use constraints::{AudioConstraints, CursorMode, DisplayMediaConstraints, UserMediaConstraints};
pub use stream::{MediaStream, StreamLayout};
pub use track::{MediaTrack, TrackKind, TrackState};
