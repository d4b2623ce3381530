//! Transaction routes.

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post, put},
};
use kredit_core::admission::AdmissionRequest;
use kredit_core::transaction::TransactionTerms;
use kredit_shared::types::{ConsumerId, TransactionId};
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::json;

use crate::{
    AppState,
    error::ApiError,
    extractors::{IdParam, JsonBody},
};

/// Creates the transaction routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/transactions", post(create_transaction))
        .route("/transactions/get", get(get_transaction))
        .route("/transactions/consumer", get(get_consumer_transactions))
        .route("/transactions/status", put(update_transaction_status))
}

// ============================================================================
// Request Types
// ============================================================================

/// Request body for creating a transaction.
///
/// Absent fields default to zero or empty and are then rejected by
/// admission with the matching validation message.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct CreateTransactionRequest {
    /// Consumer drawing on the limit.
    pub consumer_id: i64,
    /// Tenor in months.
    pub tenor: i64,
    /// Contract number.
    pub contract_number: String,
    /// Financed principal.
    pub otr: Decimal,
    /// Administration fee.
    pub admin_fee: Decimal,
    /// Monthly installment.
    pub installment_amount: Decimal,
    /// Total interest.
    pub interest_amount: Decimal,
    /// Financed asset.
    pub asset_name: Option<String>,
}

impl From<CreateTransactionRequest> for AdmissionRequest {
    fn from(req: CreateTransactionRequest) -> Self {
        Self {
            consumer_id: ConsumerId::new(req.consumer_id),
            tenor: req.tenor,
            contract_number: req.contract_number,
            amount: req.otr,
            terms: TransactionTerms {
                admin_fee: req.admin_fee,
                installment_amount: req.installment_amount,
                interest_amount: req.interest_amount,
                asset_name: req.asset_name,
            },
        }
    }
}

/// Request body for a status change.
#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
    /// `ACTIVE`, `COMPLETED` or `DEFAULTED`.
    #[serde(default)]
    pub status: String,
}

// ============================================================================
// Route Handlers
// ============================================================================

/// POST `/api/transactions`
async fn create_transaction(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<CreateTransactionRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let transaction = state.service.create_transaction(payload.into()).await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "Transaction created successfully",
            "data": transaction,
        })),
    ))
}

/// GET `/api/transactions/get?id=`
async fn get_transaction(
    State(state): State<AppState>,
    IdParam(id): IdParam<TransactionId>,
) -> Result<impl IntoResponse, ApiError> {
    let transaction = state.service.get_transaction(id).await?;
    Ok(Json(transaction))
}

/// GET `/api/transactions/consumer?id=`
async fn get_consumer_transactions(
    State(state): State<AppState>,
    IdParam(id): IdParam<ConsumerId>,
) -> Result<impl IntoResponse, ApiError> {
    let transactions = state.service.get_consumer_transactions(id).await?;
    Ok(Json(transactions))
}

/// PUT `/api/transactions/status?id=`
async fn update_transaction_status(
    State(state): State<AppState>,
    IdParam(id): IdParam<TransactionId>,
    JsonBody(payload): JsonBody<UpdateStatusRequest>,
) -> Result<impl IntoResponse, ApiError> {
    state
        .service
        .update_transaction_status(id, &payload.status)
        .await?;

    Ok(Json(json!({
        "message": "Transaction status updated successfully",
    })))
}
