//! Single-provider endpoints: synthesis and transcription without the
//! language model in between.

use std::sync::Arc;

use axum::{
    extract::{Multipart, State, multipart::MultipartRejection, rejection::JsonRejection},
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Json, Response},
};
use serde::Deserialize;
use serde_json::Value;
use tracing::info;

use super::{json_rejection, multipart_rejection, read_audio_field};
use crate::core::Stage;
use crate::errors::{AppError, AppResult};
use crate::state::AppState;

const TTS_ROUTE: &str = "/api/tts";
const STT_ROUTE: &str = "/api/stt";

/// Multipart field carrying the audio for `/api/stt`
pub const STT_FILE_FIELD: &str = "audio";

#[derive(Debug, Deserialize)]
pub struct TtsRequest {
    #[serde(default)]
    pub text: Option<String>,
}

/// `POST /api/tts`: synthesize `text` and stream the audio back.
pub async fn tts_handler(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<TtsRequest>, JsonRejection>,
) -> AppResult<Response> {
    let Json(request) =
        payload.map_err(|e| state.reject(TTS_ROUTE, json_rejection(TTS_ROUTE, e)))?;

    let text = request.text.unwrap_or_default();
    if text.is_empty() {
        return Err(state.reject(TTS_ROUTE, AppError::bad_request("Empty text")));
    }
    Stage::Validated.trace(TTS_ROUTE);

    Stage::Processing.trace(TTS_ROUTE);
    let audio = state
        .pipeline
        .speak(&text)
        .await
        .map_err(|e| state.reject(TTS_ROUTE, e.into()))?;

    info!(route = TTS_ROUTE, bytes = audio.bytes.len(), content_type = %audio.content_type, "Speech synthesized");
    let content_type = HeaderValue::from_str(&audio.content_type)
        .unwrap_or(HeaderValue::from_static("application/octet-stream"));

    Stage::Responded.trace(TTS_ROUTE);
    Ok((
        StatusCode::OK,
        [(header::CONTENT_TYPE, content_type)],
        audio.bytes,
    )
        .into_response())
}

/// `POST /api/stt`: transcribe an uploaded file and return the provider's
/// JSON response unchanged.
pub async fn stt_handler(
    State(state): State<Arc<AppState>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> AppResult<Json<Value>> {
    let mut multipart =
        multipart.map_err(|e| state.reject(STT_ROUTE, multipart_rejection(STT_ROUTE, e)))?;
    let upload = read_audio_field(&mut multipart, STT_FILE_FIELD)
        .await
        .map_err(|e| state.reject(STT_ROUTE, e))?;
    Stage::Validated.trace(STT_ROUTE);

    Stage::Processing.trace(STT_ROUTE);
    let transcription = state
        .pipeline
        .transcribe(&upload)
        .await
        .map_err(|e| state.reject(STT_ROUTE, e.into()))?;

    info!(route = STT_ROUTE, chars = transcription.text.len(), "Audio transcribed");
    Stage::Responded.trace(STT_ROUTE);
    Ok(Json(transcription.raw))
}
