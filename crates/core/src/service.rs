//! Credit service facade.
//!
//! Wires the registries, the limit ledger and the admission controller over
//! one set of stores and one lock table, and is the only entry point the
//! HTTP layer talks to.

use std::sync::Arc;

use kredit_shared::types::{ConsumerId, TransactionId};
use rust_decimal::Decimal;

use crate::admission::{AdmissionController, AdmissionRequest, KeyedLocks};
use crate::consumer::{Consumer, ConsumerRegistry, ConsumerUpdate, EligibilityRules, NewConsumer};
use crate::error::CreditResult;
use crate::limit::{CreditLimit, LimitLedger};
use crate::store::{ConsumerStore, LimitStore, MemoryStore, TransactionStore};
use crate::transaction::{Transaction, TransactionRegistry};

/// Public operations of the credit backend.
pub struct CreditService {
    consumers: ConsumerRegistry,
    limits: LimitLedger,
    admission: AdmissionController,
    transactions: TransactionRegistry,
}

impl CreditService {
    /// Builds the service over the given stores.
    pub fn new(
        consumer_store: Arc<dyn ConsumerStore>,
        limit_store: Arc<dyn LimitStore>,
        transaction_store: Arc<dyn TransactionStore>,
        rules: EligibilityRules,
    ) -> Self {
        let locks = Arc::new(KeyedLocks::new());
        Self {
            consumers: ConsumerRegistry::new(Arc::clone(&consumer_store), rules),
            limits: LimitLedger::new(
                Arc::clone(&limit_store),
                consumer_store,
                Arc::clone(&locks),
            ),
            admission: AdmissionController::new(
                limit_store,
                Arc::clone(&transaction_store),
                locks,
            ),
            transactions: TransactionRegistry::new(transaction_store),
        }
    }

    /// Builds the service over a fresh in-memory store.
    #[must_use]
    pub fn in_memory(rules: EligibilityRules) -> Self {
        let store = Arc::new(MemoryStore::new());
        Self::new(store.clone(), store.clone(), store, rules)
    }

    // ========================================================================
    // Consumers
    // ========================================================================

    /// Registers a consumer.
    pub async fn register_consumer(&self, input: NewConsumer) -> CreditResult<Consumer> {
        self.consumers.register(input).await
    }

    /// Gets a consumer by ID.
    pub async fn get_consumer(&self, id: ConsumerId) -> CreditResult<Consumer> {
        self.consumers.get_by_id(id).await
    }

    /// Gets a consumer by national ID.
    pub async fn get_consumer_by_nik(&self, nik: &str) -> CreditResult<Consumer> {
        self.consumers.get_by_nik(nik).await
    }

    /// Updates a consumer's profile.
    pub async fn update_consumer(
        &self,
        id: ConsumerId,
        update: ConsumerUpdate,
    ) -> CreditResult<Consumer> {
        self.consumers.update(id, update).await
    }

    /// Soft-deletes a consumer.
    pub async fn delete_consumer(&self, id: ConsumerId) -> CreditResult<()> {
        self.consumers.delete(id).await
    }

    // ========================================================================
    // Limits
    // ========================================================================

    /// Assigns a limit for one tenor.
    pub async fn assign_limit(
        &self,
        consumer_id: ConsumerId,
        tenor: i64,
        limit_amount: Decimal,
    ) -> CreditResult<CreditLimit> {
        self.limits.assign(consumer_id, tenor, limit_amount).await
    }

    /// Gets the limit for a consumer and tenor.
    pub async fn get_limit(&self, consumer_id: ConsumerId, tenor: i64) -> CreditResult<CreditLimit> {
        self.limits
            .get_by_consumer_and_tenor(consumer_id, tenor)
            .await
    }

    /// Lists an existing consumer's limits.
    pub async fn get_consumer_limits(&self, consumer_id: ConsumerId) -> CreditResult<Vec<CreditLimit>> {
        self.consumers.get_by_id(consumer_id).await?;
        self.limits.get_by_consumer(consumer_id).await
    }

    /// Changes the granted amount of a limit.
    pub async fn update_limit(
        &self,
        consumer_id: ConsumerId,
        tenor: i64,
        limit_amount: Decimal,
    ) -> CreditResult<CreditLimit> {
        self.limits.update(consumer_id, tenor, limit_amount).await
    }

    /// Returns reserved credit to a limit.
    pub async fn release_limit(
        &self,
        consumer_id: ConsumerId,
        tenor: i64,
        amount: Decimal,
    ) -> CreditResult<CreditLimit> {
        self.admission.release(consumer_id, tenor, amount).await
    }

    // ========================================================================
    // Transactions
    // ========================================================================

    /// Admits and records a transaction.
    pub async fn create_transaction(&self, request: AdmissionRequest) -> CreditResult<Transaction> {
        self.admission.admit(request).await
    }

    /// Gets a transaction by ID.
    pub async fn get_transaction(&self, id: TransactionId) -> CreditResult<Transaction> {
        self.transactions.get_by_id(id).await
    }

    /// Gets a transaction by contract number.
    pub async fn get_transaction_by_contract(&self, contract_number: &str) -> CreditResult<Transaction> {
        self.transactions.get_by_contract_number(contract_number).await
    }

    /// Lists an existing consumer's transactions.
    pub async fn get_consumer_transactions(
        &self,
        consumer_id: ConsumerId,
    ) -> CreditResult<Vec<Transaction>> {
        self.consumers.get_by_id(consumer_id).await?;
        self.transactions.get_by_consumer(consumer_id).await
    }

    /// Sets a transaction's status.
    pub async fn update_transaction_status(
        &self,
        id: TransactionId,
        status: &str,
    ) -> CreditResult<Transaction> {
        self.transactions.update_status(id, status).await
    }
}

#[cfg(test)]
#[path = "service_tests.rs"]
mod tests;
