use axum::http::{HeaderName, HeaderValue, Method, header};
use tower_http::cors::{AllowOrigin, CorsLayer};

use super::request_id::REQUEST_ID_HEADER;

/// Creates a CORS layer for the configured origins
///
/// A `*` entry allows any origin. Only the methods the API serves are
/// allowed, and the request id header is exposed to browsers.
pub fn create_cors_layer(allowed_origins: Vec<String>) -> CorsLayer {
    let request_id = HeaderName::from_static(REQUEST_ID_HEADER);

    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT, request_id.clone()])
        .expose_headers([request_id]);

    if allowed_origins.iter().any(|origin| origin == "*") {
        return layer.allow_origin(AllowOrigin::any());
    }

    let origins = allowed_origins
        .into_iter()
        .filter_map(|s| s.parse::<HeaderValue>().ok())
        .collect::<Vec<_>>();

    layer.allow_origin(AllowOrigin::list(origins))
}
