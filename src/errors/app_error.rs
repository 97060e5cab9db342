use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

use crate::core::ProviderError;

/// Errors that end a request in the `Failed` stage.
///
/// Every variant renders as `{"error": "<message>"}` with its status code.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Missing or unknown token
    #[error("Unauthorized")]
    Unauthorized,

    /// Empty or missing payload
    #[error("{0}")]
    BadRequest(String),

    /// Body exceeds the configured upload limit
    #[error("Request payload is too large")]
    PayloadTooLarge,

    /// An outbound provider call failed
    #[error(transparent)]
    Provider(#[from] ProviderError),
}

impl AppError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest(message.into())
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            Self::Provider(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;
