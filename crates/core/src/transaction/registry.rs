//! Transaction registry operations.

use std::str::FromStr;
use std::sync::Arc;

use chrono::Utc;
use kredit_shared::types::{ConsumerId, TransactionId};
use tracing::info;

use super::types::{Transaction, TransactionStatus};
use crate::error::{CreditError, CreditResult};
use crate::store::TransactionStore;

/// Looks up transactions and moves them through their lifecycle.
///
/// Creation is not exposed here; transactions only come into existence
/// through admission.
pub struct TransactionRegistry {
    store: Arc<dyn TransactionStore>,
}

impl TransactionRegistry {
    /// Creates a registry.
    pub fn new(store: Arc<dyn TransactionStore>) -> Self {
        Self { store }
    }

    /// Finds a transaction by ID.
    pub async fn get_by_id(&self, id: TransactionId) -> CreditResult<Transaction> {
        if !id.is_valid() {
            return Err(CreditError::validation("invalid transaction ID"));
        }
        self.store.find_by_id(id).await?.ok_or_else(not_found)
    }

    /// Finds a transaction by contract number.
    pub async fn get_by_contract_number(&self, contract_number: &str) -> CreditResult<Transaction> {
        self.store
            .find_by_contract_number(contract_number)
            .await?
            .ok_or_else(not_found)
    }

    /// Lists a consumer's transactions ordered by ID.
    pub async fn get_by_consumer(&self, consumer_id: ConsumerId) -> CreditResult<Vec<Transaction>> {
        Ok(self.store.list_by_consumer(consumer_id).await?)
    }

    /// Sets a transaction's status.
    ///
    /// Any of the three statuses may follow any other.
    pub async fn update_status(&self, id: TransactionId, status: &str) -> CreditResult<Transaction> {
        let status = TransactionStatus::from_str(status)?;
        if !id.is_valid() {
            return Err(CreditError::validation("invalid transaction ID"));
        }

        let transaction = self
            .store
            .set_status(id, status, Utc::now())
            .await?
            .ok_or_else(not_found)?;

        info!(transaction_id = %id, status = %status, "Transaction status updated");
        Ok(transaction)
    }
}

fn not_found() -> CreditError {
    CreditError::not_found("transaction not found")
}
