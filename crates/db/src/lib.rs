//! Database layer with `SeaORM` entities and repositories.
//!
//! This crate provides:
//! - `SeaORM` entity definitions
//! - Repository implementations of the `kredit-core` store contracts
//! - Database migrations

pub mod entities;
pub mod migration;
pub mod repositories;

pub use repositories::{ConsumerRepository, CreditLimitRepository, TransactionRepository};

use std::sync::Arc;

use kredit_core::CreditService;
use kredit_core::consumer::EligibilityRules;
use kredit_shared::DatabaseConfig;
use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr};

/// Establishes a connection pool to the database.
///
/// # Errors
///
/// Returns an error if the connection cannot be established.
pub async fn connect(config: &DatabaseConfig) -> Result<DatabaseConnection, DbErr> {
    let mut options = ConnectOptions::new(config.url.clone());
    options
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .sqlx_logging(false);
    Database::connect(options).await
}

/// Builds the credit service over the SQL repositories.
#[must_use]
pub fn credit_service(db: &DatabaseConnection, rules: EligibilityRules) -> CreditService {
    CreditService::new(
        Arc::new(ConsumerRepository::new(db.clone())),
        Arc::new(CreditLimitRepository::new(db.clone())),
        Arc::new(TransactionRepository::new(db.clone())),
        rules,
    )
}
