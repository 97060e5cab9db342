use std::sync::Arc;

use axum::{
    extract::{State, rejection::JsonRejection},
    response::Json,
};
use serde::Deserialize;
use tracing::info;

use super::json_rejection;
use crate::core::{PipelineResult, Stage};
use crate::errors::{AppError, AppResult};
use crate::state::AppState;

const ROUTE: &str = "/text";

#[derive(Debug, Deserialize)]
pub struct TextRequest {
    #[serde(default)]
    pub message: Option<String>,
}

/// `POST /text`: reply to a text message with text and synthesized audio.
pub async fn text_handler(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<TextRequest>, JsonRejection>,
) -> AppResult<Json<PipelineResult>> {
    let Json(request) = payload.map_err(|e| state.reject(ROUTE, json_rejection(ROUTE, e)))?;

    let message = request.message.unwrap_or_default();
    if message.is_empty() {
        return Err(state.reject(ROUTE, AppError::bad_request("Empty message")));
    }
    Stage::Validated.trace(ROUTE);

    info!(route = ROUTE, chars = message.len(), "Text request");
    Stage::Processing.trace(ROUTE);
    let result = state
        .pipeline
        .respond_to_text(&message)
        .await
        .map_err(|e| state.reject(ROUTE, e.into()))?;

    Stage::Responded.trace(ROUTE);
    Ok(Json(result))
}
