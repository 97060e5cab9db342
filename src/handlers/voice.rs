use std::sync::Arc;

use axum::{
    extract::{Multipart, State, multipart::MultipartRejection},
    response::Json,
};
use tracing::info;

use super::{multipart_rejection, read_audio_field};
use crate::core::{PipelineResult, Stage};
use crate::errors::AppResult;
use crate::state::AppState;

const ROUTE: &str = "/api/voice";

/// Multipart field carrying the recording
pub const VOICE_FILE_FIELD: &str = "file";

/// `POST /api/voice`: transcribe an uploaded recording, reply to it and
/// voice the reply.
pub async fn voice_handler(
    State(state): State<Arc<AppState>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> AppResult<Json<PipelineResult>> {
    let mut multipart =
        multipart.map_err(|e| state.reject(ROUTE, multipart_rejection(ROUTE, e)))?;
    let upload = read_audio_field(&mut multipart, VOICE_FILE_FIELD)
        .await
        .map_err(|e| state.reject(ROUTE, e))?;
    Stage::Validated.trace(ROUTE);

    info!(
        route = ROUTE,
        filename = %upload.filename,
        mime_type = %upload.mime_type,
        bytes = upload.bytes.len(),
        "Voice request"
    );
    Stage::Processing.trace(ROUTE);
    let result = state
        .pipeline
        .respond_to_audio(&upload)
        .await
        .map_err(|e| state.reject(ROUTE, e.into()))?;

    Stage::Responded.trace(ROUTE);
    Ok(Json(result))
}
