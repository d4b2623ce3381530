//! HTTP API layer with Axum routes and middleware.
//!
//! This crate provides:
//! - REST API routes over the credit service
//! - Security and content-type middleware
//! - Request extractors
//! - The JSON error envelope

pub mod error;
pub mod extractors;
pub mod middleware;
pub mod routes;

use std::sync::Arc;

use axum::Router;
use axum::http::{HeaderValue, Method, header};
use kredit_core::CreditService;
use kredit_shared::CorsConfig;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::warn;

pub use error::ApiError;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// Credit service facade.
    pub service: Arc<CreditService>,
}

impl AppState {
    /// Wraps a service for sharing across handlers.
    pub fn new(service: CreditService) -> Self {
        Self {
            service: Arc::new(service),
        }
    }
}

/// Creates the main application router.
pub fn create_router(state: AppState, cors: &CorsConfig) -> Router {
    let router = Router::new()
        .merge(routes::health::routes())
        .nest("/api", routes::api_routes());

    middleware::apply(router)
        .layer(cors_layer(cors))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn cors_layer(cors: &CorsConfig) -> CorsLayer {
    let origin = match HeaderValue::from_str(&cors.allowed_origin) {
        Ok(origin) => AllowOrigin::exact(origin),
        Err(_) => {
            warn!(origin = %cors.allowed_origin, "Invalid CORS origin, cross-origin requests disabled");
            AllowOrigin::list(Vec::<HeaderValue>::new())
        }
    };

    CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
        .max_age(std::time::Duration::from_secs(3600))
}
