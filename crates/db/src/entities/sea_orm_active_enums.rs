//! `SeaORM` active enums backed by Postgres enum types.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "transaction_status")]
pub enum TransactionStatus {
    #[sea_orm(string_value = "ACTIVE")]
    Active,
    #[sea_orm(string_value = "COMPLETED")]
    Completed,
    #[sea_orm(string_value = "DEFAULTED")]
    Defaulted,
}

impl From<kredit_core::transaction::TransactionStatus> for TransactionStatus {
    fn from(status: kredit_core::transaction::TransactionStatus) -> Self {
        use kredit_core::transaction::TransactionStatus as Domain;
        match status {
            Domain::Active => Self::Active,
            Domain::Completed => Self::Completed,
            Domain::Defaulted => Self::Defaulted,
        }
    }
}

impl From<TransactionStatus> for kredit_core::transaction::TransactionStatus {
    fn from(status: TransactionStatus) -> Self {
        match status {
            TransactionStatus::Active => Self::Active,
            TransactionStatus::Completed => Self::Completed,
            TransactionStatus::Defaulted => Self::Defaulted,
        }
    }
}
