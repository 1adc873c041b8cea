use super::state::AppState;
use crate::capture::{CaptureError, CaptureOptions};
use crate::controller::UiSnapshot;
use crate::error::StartError;
use crate::library::{ListItem, RecordingArtifact, RecordingEntry};
use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Json, Response},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, info};
use uuid::Uuid;

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Default, Deserialize)]
pub struct StartRecordingRequest {
    /// Include system audio of the shared display
    #[serde(default)]
    pub system_audio: bool,

    /// Include the microphone
    #[serde(default)]
    pub microphone: bool,
}

#[derive(Debug, Serialize)]
pub struct StopRecordingResponse {
    /// Finalized recording; null if nothing was recording
    pub entry: Option<RecordingEntry>,
    pub ui: UiSnapshot,
}

#[derive(Debug, Serialize)]
pub struct RecordingsResponse {
    pub items: Vec<ListItem>,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub code: String,
    pub error: String,
    /// Message to show in a blocking alert
    pub alert: Option<String>,
}

impl ErrorResponse {
    fn not_found(what: &str) -> Self {
        Self {
            code: "NOT_FOUND".to_string(),
            error: format!("{} not found", what),
            alert: None,
        }
    }
}

fn start_error_status(err: &StartError) -> StatusCode {
    match err {
        StartError::StartDisabled(_) => StatusCode::CONFLICT,
        StartError::Capture(CaptureError::Denied(_)) => StatusCode::FORBIDDEN,
        StartError::Capture(CaptureError::Unavailable(_)) => StatusCode::SERVICE_UNAVAILABLE,
        StartError::Capture(CaptureError::Failed(_)) | StartError::Failed(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

// ============================================================================
// Handlers
// ============================================================================

/// GET /health
/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}

/// GET /ui
/// Current controller state and button enablement
pub async fn get_ui(State(state): State<AppState>) -> impl IntoResponse {
    (StatusCode::OK, Json(state.controller.snapshot().await))
}

/// POST /recording/start
/// Start a recording with the requested audio sources; without a JSON body
/// both sources stay off
pub async fn start_recording(
    State(state): State<AppState>,
    body: Option<Json<StartRecordingRequest>>,
) -> impl IntoResponse {
    let req = body.map(|Json(req)| req).unwrap_or_default();
    let options = CaptureOptions {
        system_audio: req.system_audio,
        microphone: req.microphone,
    };

    info!("Start requested: {:?}", options);

    match state.controller.start(options).await {
        Ok(()) => (StatusCode::OK, Json(state.controller.snapshot().await)).into_response(),
        Err(e) => {
            error!("Failed to start recording: {}", e);
            (
                start_error_status(&e),
                Json(ErrorResponse {
                    code: e.code().to_string(),
                    error: e.to_string(),
                    alert: Some(e.alert_message()),
                }),
            )
                .into_response()
        }
    }
}

/// POST /recording/stop
/// Stop the current recording; harmless while idle
pub async fn stop_recording(State(state): State<AppState>) -> impl IntoResponse {
    let entry = state.controller.stop().await;
    let ui = state.controller.snapshot().await;

    (StatusCode::OK, Json(StopRecordingResponse { entry, ui }))
}

/// GET /recordings
/// Recordings list as displayed
pub async fn list_recordings(State(state): State<AppState>) -> impl IntoResponse {
    let items = state.controller.recordings().await;
    (StatusCode::OK, Json(RecordingsResponse { items }))
}

/// GET /recordings/:id
/// Recording bytes for inline playback
pub async fn get_recording(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Response {
    match state.controller.artifact(&id).await {
        Some(artifact) => artifact_response(artifact, false),
        None => (StatusCode::NOT_FOUND, Json(ErrorResponse::not_found("Recording"))).into_response(),
    }
}

/// GET /recordings/:id/download
/// Recording bytes as an attachment named after the recording
pub async fn download_recording(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Response {
    match state.controller.artifact(&id).await {
        Some(artifact) => artifact_response(artifact, true),
        None => (StatusCode::NOT_FOUND, Json(ErrorResponse::not_found("Recording"))).into_response(),
    }
}

fn artifact_response(artifact: Arc<RecordingArtifact>, attachment: bool) -> Response {
    let disposition = format!(
        "{}; filename=\"{}\"",
        if attachment { "attachment" } else { "inline" },
        artifact.file_name
    );

    (
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, artifact.mime_type.clone()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        artifact.data.clone(),
    )
        .into_response()
}
