pub mod api;
mod layers;

pub use layers::{cors_layer, with_security_headers};

use std::sync::Arc;

use axum::{Router, extract::DefaultBodyLimit, middleware, routing::get};
use tower_http::services::ServeDir;

use crate::core::storage::AUDIO_ROUTE_PREFIX;
use crate::handlers;
use crate::middleware::auth_middleware;
use crate::state::AppState;

/// Build the full application router.
///
/// - Public: `GET /` health check and `GET /audio/{file}` for published audio
/// - Protected: the API routes behind [`auth_middleware`], with the request
///   body limit raised to `max_upload_bytes`
///
/// Server-wide layers ([`cors_layer`], rate limiting, [`with_security_headers`])
/// are added by the binary.
pub fn create_router(state: Arc<AppState>) -> Router {
    let protected_routes = api::create_api_router()
        .layer(DefaultBodyLimit::max(state.config.max_upload_bytes))
        .route_layer(middleware::from_fn_with_state(state.clone(), auth_middleware));

    let public_routes = Router::new()
        .route("/", get(handlers::api::health_check))
        .nest_service(AUDIO_ROUTE_PREFIX, ServeDir::new(&state.config.audio_dir));

    public_routes.merge(protected_routes).with_state(state)
}
