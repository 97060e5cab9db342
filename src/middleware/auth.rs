use crate::core::Stage;
use crate::errors::AppError;
use crate::state::AppState;
use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};
use std::sync::Arc;

/// Authentication middleware that validates the `Authorization` header
///
/// The header value is checked against the static token set loaded at
/// startup (`Authorization: <token>` or `Authorization: Bearer <token>`).
///
/// The middleware:
/// 1. Passes the request through untouched when `AUTH_REQUIRED=false`
/// 2. Reads the `Authorization` header (a missing or non-UTF-8 header never matches)
/// 3. On a match, runs the next handler
/// 4. Otherwise records one failure with the notifier and returns 401
///    `{"error": "Unauthorized"}`
pub async fn auth_middleware(
    State(state): State<Arc<AppState>>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let request_path = request.uri().path().to_string();
    Stage::Received.trace(&request_path);

    // Skip authentication if auth is not required
    if !state.config.auth_required {
        tracing::debug!(path = %request_path, "Authentication disabled");
        Stage::Authenticated.trace(&request_path);
        return Ok(next.run(request).await);
    }

    let header_value = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok());

    if state.credentials.authenticate(header_value) {
        Stage::Authenticated.trace(&request_path);
        return Ok(next.run(request).await);
    }

    tracing::warn!(
        method = %request.method(),
        path = %request_path,
        has_header = header_value.is_some(),
        "Authentication failed: missing or unknown token"
    );
    Err(state.reject(&request_path, AppError::Unauthorized))
}
