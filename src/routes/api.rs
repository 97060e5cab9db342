use axum::{Router, routing::post};
use tower_http::trace::TraceLayer;

use crate::handlers::{speech, text, voice};
use crate::state::AppState;
use std::sync::Arc;

/// Create the API router with protected routes
///
/// Note: Authentication middleware is applied by [`super::create_router`]
pub fn create_api_router() -> Router<Arc<AppState>> {
    Router::new()
        // Protected routes (auth required when AUTH_REQUIRED=true)
        .route("/text", post(text::text_handler))
        .route("/api/voice", post(voice::voice_handler))
        .route("/api/tts", post(speech::tts_handler))
        .route("/api/stt", post(speech::stt_handler))
        .layer(TraceLayer::new_for_http())
}
