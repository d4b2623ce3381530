//! Store contracts the domain depends on.
//!
//! The SQL implementation lives in `kredit-db`; [`memory::MemoryStore`]
//! implements the same contracts in process for tests and local runs.

pub mod memory;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use kredit_shared::types::{ConsumerId, CreditLimitId, TransactionId};
use rust_decimal::Decimal;

use crate::consumer::{Consumer, NewConsumer};
use crate::error::StoreError;
use crate::limit::{CreditLimit, NewCreditLimit, Tenor};
use crate::transaction::{NewTransaction, Transaction, TransactionStatus};

pub use memory::MemoryStore;

/// Unique constraint names reported through [`StoreError::Duplicate`].
pub mod constraints {
    /// One consumer per national ID.
    pub const CONSUMER_NIK: &str = "uq_consumers_nik";
    /// One limit per consumer and tenor.
    pub const LIMIT_CONSUMER_TENOR: &str = "uq_credit_limits_consumer_tenor";
    /// One transaction per contract number.
    pub const TRANSACTION_CONTRACT: &str = "uq_transactions_contract_number";
}

/// Persistence for consumers.
#[async_trait]
pub trait ConsumerStore: Send + Sync {
    /// Inserts a consumer. Fails with `Duplicate` if the NIK is taken.
    async fn insert(&self, consumer: NewConsumer, now: DateTime<Utc>)
    -> Result<Consumer, StoreError>;

    /// Finds a live (not soft-deleted) consumer by ID.
    async fn find_by_id(&self, id: ConsumerId) -> Result<Option<Consumer>, StoreError>;

    /// Finds a live consumer by NIK.
    async fn find_by_nik(&self, nik: &str) -> Result<Option<Consumer>, StoreError>;

    /// Overwrites the mutable fields of a live consumer.
    async fn update(&self, consumer: &Consumer) -> Result<Consumer, StoreError>;

    /// Soft-deletes a consumer. Returns false if no live consumer matched.
    async fn soft_delete(&self, id: ConsumerId, now: DateTime<Utc>) -> Result<bool, StoreError>;
}

/// Persistence for credit limits, including the admission commit.
#[async_trait]
pub trait LimitStore: Send + Sync {
    /// Inserts a limit with `used_amount = 0`.
    async fn insert(&self, limit: NewCreditLimit) -> Result<CreditLimit, StoreError>;

    /// Finds the limit for a consumer and tenor.
    async fn find(
        &self,
        consumer_id: ConsumerId,
        tenor: Tenor,
    ) -> Result<Option<CreditLimit>, StoreError>;

    /// Lists a consumer's limits ordered by tenor.
    async fn list_by_consumer(&self, consumer_id: ConsumerId)
    -> Result<Vec<CreditLimit>, StoreError>;

    /// Sets a new granted amount.
    ///
    /// Fails with `LimitExceeded` if the new amount is below `used_amount`.
    async fn set_limit_amount(
        &self,
        id: CreditLimitId,
        limit_amount: Decimal,
        now: DateTime<Utc>,
    ) -> Result<CreditLimit, StoreError>;

    /// Adds `amount` to `used_amount` and records `transaction` as one
    /// indivisible write.
    ///
    /// Fails with `LimitExceeded` when the reservation would push
    /// `used_amount` past `limit_amount`, and with `Duplicate` when the
    /// contract number exists. Neither write is visible on failure.
    async fn reserve(
        &self,
        id: CreditLimitId,
        amount: Decimal,
        transaction: NewTransaction,
    ) -> Result<Transaction, StoreError>;

    /// Subtracts `amount` from `used_amount`, clamped at zero.
    async fn release(
        &self,
        id: CreditLimitId,
        amount: Decimal,
        now: DateTime<Utc>,
    ) -> Result<CreditLimit, StoreError>;
}

/// Read and status access to recorded transactions.
///
/// Transactions are only created through [`LimitStore::reserve`].
#[async_trait]
pub trait TransactionStore: Send + Sync {
    /// Finds a transaction by ID.
    async fn find_by_id(&self, id: TransactionId) -> Result<Option<Transaction>, StoreError>;

    /// Finds a transaction by contract number.
    async fn find_by_contract_number(
        &self,
        contract_number: &str,
    ) -> Result<Option<Transaction>, StoreError>;

    /// Lists a consumer's transactions ordered by ID.
    async fn list_by_consumer(&self, consumer_id: ConsumerId)
    -> Result<Vec<Transaction>, StoreError>;

    /// Overwrites the status. Returns `None` if the transaction is unknown.
    async fn set_status(
        &self,
        id: TransactionId,
        status: TransactionStatus,
        now: DateTime<Utc>,
    ) -> Result<Option<Transaction>, StoreError>;
}
