//! Content-type guard for request bodies.

use axum::extract::Request;
use axum::http::{Method, header};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use kredit_shared::AppError;

use crate::error::ApiError;

/// Rejects POST and PUT requests that do not declare a JSON body.
pub async fn require_json(request: Request, next: Next) -> Response {
    let needs_body = matches!(*request.method(), Method::POST | Method::PUT);
    let is_json = request
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value.contains("application/json"));

    if needs_body && !is_json {
        return ApiError(AppError::Validation(
            "Content-Type must be application/json".to_string(),
        ))
        .into_response();
    }

    next.run(request).await
}
