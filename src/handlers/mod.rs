//! HTTP request handlers
//!
//! - `api` - Health check endpoint
//! - `text` - Text in, spoken reply out (`POST /text`)
//! - `voice` - Audio in, spoken reply out (`POST /api/voice`)
//! - `speech` - Direct synthesis and transcription (`POST /api/tts`, `POST /api/stt`)

pub mod api;
pub mod speech;
pub mod text;
pub mod voice;

use axum::extract::Multipart;
use axum::extract::multipart::{MultipartError, MultipartRejection};
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use tracing::debug;

use crate::core::AudioUpload;
use crate::errors::AppError;

const DEFAULT_AUDIO_MIME_TYPE: &str = "application/octet-stream";

/// Map a JSON extractor rejection: over the body limit is 413, anything
/// else is `Invalid JSON body`.
pub(crate) fn json_rejection(route: &str, rejection: JsonRejection) -> AppError {
    debug!(route, error = %rejection.body_text(), "Rejected JSON body");
    if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge
    } else {
        AppError::bad_request("Invalid JSON body")
    }
}

/// Map a multipart extractor rejection (wrong or missing content type).
pub(crate) fn multipart_rejection(route: &str, rejection: MultipartRejection) -> AppError {
    debug!(route, error = %rejection.body_text(), "Rejected multipart body");
    if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge
    } else {
        AppError::bad_request("No audio file provided")
    }
}

fn multipart_error(error: MultipartError) -> AppError {
    if error.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge
    } else {
        AppError::bad_request(format!("Invalid multipart body: {}", error.body_text()))
    }
}

/// Read the first file part named `field_name` from a multipart body.
///
/// Parts without a filename are plain form fields and are skipped.
pub(crate) async fn read_audio_field(
    multipart: &mut Multipart,
    field_name: &str,
) -> Result<AudioUpload, AppError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(multipart_error)?
    {
        if field.name() != Some(field_name) {
            continue;
        }
        let Some(filename) = field.file_name().map(str::to_string) else {
            continue;
        };
        if filename.is_empty() {
            return Err(AppError::bad_request("Empty filename"));
        }

        let mime_type = field
            .content_type()
            .unwrap_or(DEFAULT_AUDIO_MIME_TYPE)
            .to_string();
        let bytes = field.bytes().await.map_err(multipart_error)?;
        if bytes.is_empty() {
            return Err(AppError::bad_request("Empty audio file"));
        }

        return Ok(AudioUpload {
            bytes,
            filename,
            mime_type,
        });
    }

    Err(AppError::bad_request("No audio file provided"))
}
