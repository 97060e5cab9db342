//! Server-wide layers applied on top of [`super::create_router`].

use axum::Router;
use http::{
    HeaderValue, Method,
    header::{AUTHORIZATION, CONTENT_TYPE, X_CONTENT_TYPE_OPTIONS, X_FRAME_OPTIONS},
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::set_header::SetResponseHeaderLayer;
use tracing::{info, warn};

/// Build the CORS layer for `CORS_ALLOWED_ORIGINS`.
///
/// `None` keeps the browser default (same-origin only), `"*"` allows any
/// origin without credentials, and a comma-separated list allows exactly
/// those origins with credentials.
pub fn cors_layer(allowed_origins: Option<&str>) -> CorsLayer {
    let base = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([AUTHORIZATION, CONTENT_TYPE]);

    match allowed_origins.map(str::trim) {
        None | Some("") => {
            info!("CORS not configured, cross-origin requests are not allowed");
            base
        }
        Some("*") => base.allow_origin(Any),
        Some(list) => {
            let origins: Vec<HeaderValue> = list
                .split(',')
                .map(str::trim)
                .filter(|origin| !origin.is_empty())
                .filter_map(|origin| match HeaderValue::from_str(origin) {
                    // A wildcard inside a list is not a valid credentialed origin.
                    Ok(value) if origin != "*" => Some(value),
                    _ => {
                        warn!(origin, "Ignoring invalid CORS origin");
                        None
                    }
                })
                .collect();
            base.allow_origin(origins).allow_credentials(true)
        }
    }
}

/// Add `X-Content-Type-Options: nosniff` and `X-Frame-Options: DENY` to every response.
pub fn with_security_headers(router: Router) -> Router {
    router
        .layer(SetResponseHeaderLayer::overriding(
            X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            X_FRAME_OPTIONS,
            HeaderValue::from_static("DENY"),
        ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::routing::get;
    use http::{Request, StatusCode};
    use tower::ServiceExt;

    fn app(allowed_origins: Option<&str>) -> Router {
        Router::new()
            .route("/", get(|| async { "ok" }))
            .layer(cors_layer(allowed_origins))
    }

    fn preflight(origin: &str) -> Request<Body> {
        Request::builder()
            .method(Method::OPTIONS)
            .uri("/")
            .header("origin", origin)
            .header("access-control-request-method", "POST")
            .body(Body::empty())
            .unwrap()
    }

    #[tokio::test]
    async fn test_cors_listed_origin_is_allowed_with_credentials() {
        let response = app(Some("https://a.example, https://b.example"))
            .oneshot(preflight("https://b.example"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let headers = response.headers();
        assert_eq!(headers["access-control-allow-origin"], "https://b.example");
        assert_eq!(headers["access-control-allow-credentials"], "true");
    }

    #[tokio::test]
    async fn test_cors_unlisted_origin_gets_no_allow_header() {
        let response = app(Some("https://a.example,*"))
            .oneshot(preflight("https://evil.example"))
            .await
            .unwrap();

        assert!(!response.headers().contains_key("access-control-allow-origin"));
    }

    #[tokio::test]
    async fn test_cors_wildcard_allows_any_origin() {
        let response = app(Some("*"))
            .oneshot(preflight("https://anywhere.example"))
            .await
            .unwrap();

        assert_eq!(response.headers()["access-control-allow-origin"], "*");
        assert!(!response.headers().contains_key("access-control-allow-credentials"));
    }

    #[tokio::test]
    async fn test_cors_unset_allows_no_origin() {
        let response = app(None)
            .oneshot(preflight("https://a.example"))
            .await
            .unwrap();

        assert!(!response.headers().contains_key("access-control-allow-origin"));
    }

    #[tokio::test]
    async fn test_security_headers_are_set() {
        let router = with_security_headers(Router::new().route("/", get(|| async { "ok" })));
        let response = router
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.headers()["x-content-type-options"], "nosniff");
        assert_eq!(response.headers()["x-frame-options"], "DENY");
    }
}
