//! SeaORM implementations of the store contracts.
//!
//! Repositories hide the `SeaORM` details from the domain: they take and
//! return `kredit-core` types and report failures as [`StoreError`].

pub mod consumer;
pub mod credit_limit;
pub mod transaction;

pub use consumer::ConsumerRepository;
pub use credit_limit::CreditLimitRepository;
pub use transaction::TransactionRepository;

use chrono::{DateTime, Utc};
use kredit_core::StoreError;
use kredit_core::store::constraints;
use sea_orm::prelude::DateTimeWithTimeZone;
use sea_orm::{DbErr, SqlErr};
use tracing::error;

const UNIQUE_CONSTRAINTS: [&str; 3] = [
    constraints::CONSUMER_NIK,
    constraints::LIMIT_CONSUMER_TENOR,
    constraints::TRANSACTION_CONTRACT,
];

/// Maps a database error onto the store contract.
///
/// Unique violations become `Duplicate` carrying the constraint name; the
/// rest are logged and reported as `Backend`.
pub(crate) fn store_error(err: DbErr) -> StoreError {
    if let Some(SqlErr::UniqueConstraintViolation(message)) = err.sql_err() {
        let constraint = UNIQUE_CONSTRAINTS
            .into_iter()
            .find(|name| message.contains(name))
            .map_or(message, ToString::to_string);
        return StoreError::Duplicate(constraint);
    }
    error!(error = %err, "Database error");
    StoreError::Backend(err.to_string())
}

pub(crate) fn to_utc(timestamp: DateTimeWithTimeZone) -> DateTime<Utc> {
    timestamp.with_timezone(&Utc)
}
