//! JSON error responses.

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use kredit_core::CreditError;
use kredit_shared::AppError;
use serde_json::json;
use tracing::{error, warn};

/// An error rendered as `{"error": <message>}` with the mapped status code.
#[derive(Debug)]
pub struct ApiError(pub AppError);

impl ApiError {
    /// 400 for a request that could not be decoded.
    pub fn invalid_format() -> Self {
        Self(AppError::Validation("invalid request format".to_string()))
    }

    /// 400 for a missing or malformed `id` query parameter.
    pub fn invalid_id() -> Self {
        Self(AppError::Validation("invalid ID".to_string()))
    }
}

impl From<CreditError> for ApiError {
    fn from(err: CreditError) -> Self {
        Self(err.into())
    }
}

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        Self(err)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        warn!(error = %rejection.body_text(), "Rejected request body");
        Self::invalid_format()
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.0.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        if self.0.is_server_error() {
            error!(error = %self.0, code = self.0.error_code(), "Request failed");
        }

        (status, Json(json!({ "error": self.0.public_message() }))).into_response()
    }
}
