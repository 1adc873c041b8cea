//! HTTP UI surface
//!
//! This module exposes the recorder UI as a REST API:
//! - GET /health - Health check
//! - GET /ui - Controller state, button enablement, preview and session stats
//! - POST /recording/start - Start recording (audio toggles in the body)
//! - POST /recording/stop - Stop recording
//! - GET /recordings - Recordings list (placeholder or entries)
//! - GET /recordings/:id - Recording bytes
//! - GET /recordings/:id/download - Recording bytes as an attachment

mod handlers;
mod routes;
mod state;

pub use routes::create_router;
pub use state::AppState;
