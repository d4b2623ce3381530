//! Transaction repository.
//!
//! Transactions are inserted by [`super::CreditLimitRepository::reserve`];
//! this repository reads them and updates their status.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use kredit_core::StoreError;
use kredit_core::limit::Tenor;
use kredit_core::store::TransactionStore;
use kredit_core::transaction::{Transaction, TransactionStatus};
use kredit_shared::types::{ConsumerId, TransactionId};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
    QueryOrder, Set,
};

use super::{store_error, to_utc};
use crate::entities::transactions;

/// Transaction repository backed by the `transactions` table.
#[derive(Debug, Clone)]
pub struct TransactionRepository {
    db: DatabaseConnection,
}

impl TransactionRepository {
    /// Creates a new transaction repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

impl transactions::Model {
    /// Converts the row into the domain type.
    pub fn into_domain(self) -> Result<Transaction, StoreError> {
        let tenor = Tenor::try_from(self.tenor).map_err(|_| {
            StoreError::Backend(format!("transaction {} has invalid tenor {}", self.id, self.tenor))
        })?;
        Ok(Transaction {
            id: TransactionId::new(self.id),
            consumer_id: ConsumerId::new(self.consumer_id),
            contract_number: self.contract_number,
            tenor,
            otr: self.otr,
            admin_fee: self.admin_fee,
            installment_amount: self.installment_amount,
            interest_amount: self.interest_amount,
            asset_name: self.asset_name,
            status: self.status.into(),
            created_at: to_utc(self.created_at),
            updated_at: to_utc(self.updated_at),
        })
    }
}

#[async_trait]
impl TransactionStore for TransactionRepository {
    async fn find_by_id(&self, id: TransactionId) -> Result<Option<Transaction>, StoreError> {
        transactions::Entity::find_by_id(id.into_inner())
            .one(&self.db)
            .await
            .map_err(store_error)?
            .map(transactions::Model::into_domain)
            .transpose()
    }

    async fn find_by_contract_number(
        &self,
        contract_number: &str,
    ) -> Result<Option<Transaction>, StoreError> {
        transactions::Entity::find()
            .filter(transactions::Column::ContractNumber.eq(contract_number))
            .one(&self.db)
            .await
            .map_err(store_error)?
            .map(transactions::Model::into_domain)
            .transpose()
    }

    async fn list_by_consumer(
        &self,
        consumer_id: ConsumerId,
    ) -> Result<Vec<Transaction>, StoreError> {
        transactions::Entity::find()
            .filter(transactions::Column::ConsumerId.eq(consumer_id.into_inner()))
            .order_by_asc(transactions::Column::Id)
            .all(&self.db)
            .await
            .map_err(store_error)?
            .into_iter()
            .map(transactions::Model::into_domain)
            .collect()
    }

    async fn set_status(
        &self,
        id: TransactionId,
        status: TransactionStatus,
        now: DateTime<Utc>,
    ) -> Result<Option<Transaction>, StoreError> {
        let updated = transactions::ActiveModel {
            id: Set(id.into_inner()),
            status: Set(status.into()),
            updated_at: Set(now.into()),
            ..Default::default()
        }
        .update(&self.db)
        .await;

        match updated {
            Ok(model) => model.into_domain().map(Some),
            Err(DbErr::RecordNotUpdated) => Ok(None),
            Err(err) => Err(store_error(err)),
        }
    }
}
