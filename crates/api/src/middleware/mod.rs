//! HTTP middleware.

pub mod content_type;
pub mod security;

use axum::Router;
use tower_http::limit::RequestBodyLimitLayer;

use crate::AppState;

/// Largest accepted request body.
pub const MAX_BODY_BYTES: usize = 64 * 1024;

/// Applies the request guards and response headers every route gets.
pub fn apply(router: Router<AppState>) -> Router<AppState> {
    let guarded = router
        .layer(axum::middleware::from_fn(content_type::require_json))
        .layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES));
    security::headers(guarded)
}
