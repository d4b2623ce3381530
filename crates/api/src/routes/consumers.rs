//! Consumer and credit limit routes.

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use kredit_core::consumer::NewConsumer;
use kredit_shared::types::ConsumerId;
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::json;

use crate::{
    AppState,
    error::ApiError,
    extractors::{IdParam, JsonBody},
};

/// Creates the consumer routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/consumers", post(register_consumer))
        .route("/consumers/get", get(get_consumer))
        .route("/consumers/limits", post(assign_limit))
        .route("/consumers/limits/get", get(get_consumer_limits))
}

/// Request body for assigning a limit.
#[derive(Debug, Deserialize)]
pub struct AssignLimitRequest {
    /// Consumer receiving the limit.
    #[serde(default)]
    pub consumer_id: i64,
    /// Tenor in months.
    #[serde(default)]
    pub tenor: i64,
    /// Granted amount.
    #[serde(default)]
    pub limit_amount: Decimal,
}

/// POST `/api/consumers`
async fn register_consumer(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<NewConsumer>,
) -> Result<impl IntoResponse, ApiError> {
    let consumer = state.service.register_consumer(payload).await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "Consumer registered successfully",
            "data": consumer,
        })),
    ))
}

/// GET `/api/consumers/get?id=`
async fn get_consumer(
    State(state): State<AppState>,
    IdParam(id): IdParam<ConsumerId>,
) -> Result<impl IntoResponse, ApiError> {
    let consumer = state.service.get_consumer(id).await?;
    Ok(Json(consumer))
}

/// POST `/api/consumers/limits`
async fn assign_limit(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<AssignLimitRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let limit = state
        .service
        .assign_limit(
            ConsumerId::new(payload.consumer_id),
            payload.tenor,
            payload.limit_amount,
        )
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "Limit assigned successfully",
            "data": limit,
        })),
    ))
}

/// GET `/api/consumers/limits/get?id=`
async fn get_consumer_limits(
    State(state): State<AppState>,
    IdParam(id): IdParam<ConsumerId>,
) -> Result<impl IntoResponse, ApiError> {
    let limits = state.service.get_consumer_limits(id).await?;
    Ok(Json(limits))
}
