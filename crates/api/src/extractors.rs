//! Request extractors.

use std::str::FromStr;

use axum::extract::{FromRequest, FromRequestParts, Query};
use axum::http::request::Parts;
use serde::Deserialize;

use crate::error::ApiError;

/// JSON body whose rejections render as `{"error": "invalid request format"}`.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct JsonBody<T>(pub T);

#[derive(Debug, Deserialize)]
struct IdQuery {
    id: Option<String>,
}

/// A typed ID taken from the `?id=` query parameter.
///
/// Missing, non-numeric, and non-positive values are rejected with 400.
#[derive(Debug, Clone, Copy)]
pub struct IdParam<T>(pub T);

impl<S, T> FromRequestParts<S> for IdParam<T>
where
    S: Send + Sync,
    T: FromStr + Send,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(query) = Query::<IdQuery>::from_request_parts(parts, state)
            .await
            .map_err(|_| ApiError::invalid_id())?;

        query
            .id
            .as_deref()
            .and_then(|raw| T::from_str(raw.trim()).ok())
            .map(Self)
            .ok_or_else(ApiError::invalid_id)
    }
}
