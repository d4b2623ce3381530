//! Credit limit repository.
//!
//! Every write to `used_amount` is a single conditional `UPDATE`, so the
//! `0 <= used_amount <= limit_amount` invariant holds even when several
//! server processes share the database.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use kredit_core::StoreError;
use kredit_core::limit::{CreditLimit, NewCreditLimit, Tenor};
use kredit_core::store::LimitStore;
use kredit_core::transaction::{NewTransaction, Transaction};
use kredit_shared::types::{ConsumerId, CreditLimitId};
use rust_decimal::Decimal;
use sea_orm::sea_query::{Expr, Func};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, Set, TransactionTrait,
};
use tracing::debug;

use super::{store_error, to_utc};
use crate::entities::sea_orm_active_enums::TransactionStatus;
use crate::entities::{credit_limits, transactions};

/// Credit limit repository backed by the `credit_limits` table.
#[derive(Debug, Clone)]
pub struct CreditLimitRepository {
    db: DatabaseConnection,
}

impl CreditLimitRepository {
    /// Creates a new credit limit repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

impl credit_limits::Model {
    /// Converts the row into the domain type.
    pub fn into_domain(self) -> Result<CreditLimit, StoreError> {
        let tenor = Tenor::try_from(self.tenor).map_err(|_| {
            StoreError::Backend(format!("credit limit {} has invalid tenor {}", self.id, self.tenor))
        })?;
        Ok(CreditLimit {
            id: CreditLimitId::new(self.id),
            consumer_id: ConsumerId::new(self.consumer_id),
            tenor,
            limit_amount: self.limit_amount,
            used_amount: self.used_amount,
            created_at: to_utc(self.created_at),
            updated_at: to_utc(self.updated_at),
        })
    }
}

async fn fetch<C: ConnectionTrait>(conn: &C, id: CreditLimitId) -> Result<CreditLimit, StoreError> {
    credit_limits::Entity::find_by_id(id.into_inner())
        .one(conn)
        .await
        .map_err(store_error)?
        .ok_or_else(|| not_found(id))?
        .into_domain()
}

fn not_found(id: CreditLimitId) -> StoreError {
    StoreError::NotFound(format!("credit limit {id}"))
}

#[async_trait]
impl LimitStore for CreditLimitRepository {
    async fn insert(&self, limit: NewCreditLimit) -> Result<CreditLimit, StoreError> {
        credit_limits::ActiveModel {
            consumer_id: Set(limit.consumer_id.into_inner()),
            tenor: Set(limit.tenor.months()),
            limit_amount: Set(limit.limit_amount),
            used_amount: Set(Decimal::ZERO),
            created_at: Set(limit.created_at.into()),
            updated_at: Set(limit.created_at.into()),
            ..Default::default()
        }
        .insert(&self.db)
        .await
        .map_err(store_error)?
        .into_domain()
    }

    async fn find(
        &self,
        consumer_id: ConsumerId,
        tenor: Tenor,
    ) -> Result<Option<CreditLimit>, StoreError> {
        credit_limits::Entity::find()
            .filter(credit_limits::Column::ConsumerId.eq(consumer_id.into_inner()))
            .filter(credit_limits::Column::Tenor.eq(tenor.months()))
            .one(&self.db)
            .await
            .map_err(store_error)?
            .map(credit_limits::Model::into_domain)
            .transpose()
    }

    async fn list_by_consumer(
        &self,
        consumer_id: ConsumerId,
    ) -> Result<Vec<CreditLimit>, StoreError> {
        credit_limits::Entity::find()
            .filter(credit_limits::Column::ConsumerId.eq(consumer_id.into_inner()))
            .order_by_asc(credit_limits::Column::Tenor)
            .all(&self.db)
            .await
            .map_err(store_error)?
            .into_iter()
            .map(credit_limits::Model::into_domain)
            .collect()
    }

    async fn set_limit_amount(
        &self,
        id: CreditLimitId,
        limit_amount: Decimal,
        now: DateTime<Utc>,
    ) -> Result<CreditLimit, StoreError> {
        let txn = self.db.begin().await.map_err(store_error)?;

        let result = credit_limits::Entity::update_many()
            .col_expr(credit_limits::Column::LimitAmount, Expr::value(limit_amount))
            .col_expr(credit_limits::Column::UpdatedAt, Expr::value(now))
            .filter(credit_limits::Column::Id.eq(id.into_inner()))
            .filter(credit_limits::Column::UsedAmount.lte(limit_amount))
            .exec(&txn)
            .await
            .map_err(store_error)?;

        // Zero rows means either no such limit or one already used past the new amount.
        let limit = fetch(&txn, id).await?;
        if result.rows_affected == 0 {
            return Err(StoreError::LimitExceeded);
        }

        txn.commit().await.map_err(store_error)?;
        Ok(limit)
    }

    async fn reserve(
        &self,
        id: CreditLimitId,
        amount: Decimal,
        transaction: NewTransaction,
    ) -> Result<Transaction, StoreError> {
        let now = transaction.created_at;
        let txn = self.db.begin().await.map_err(store_error)?;

        let result = credit_limits::Entity::update_many()
            .col_expr(
                credit_limits::Column::UsedAmount,
                Expr::col(credit_limits::Column::UsedAmount).add(amount),
            )
            .col_expr(credit_limits::Column::UpdatedAt, Expr::value(now))
            .filter(credit_limits::Column::Id.eq(id.into_inner()))
            .filter(
                Expr::col(credit_limits::Column::UsedAmount)
                    .lte(Expr::col(credit_limits::Column::LimitAmount).sub(amount)),
            )
            .exec(&txn)
            .await
            .map_err(store_error)?;

        if result.rows_affected == 0 {
            fetch(&txn, id).await?;
            debug!(credit_limit_id = %id, amount = %amount, "Conditional reserve matched no row");
            return Err(StoreError::LimitExceeded);
        }

        // A duplicate contract number fails here and the dropped transaction
        // rolls the reservation back.
        let model = transactions::ActiveModel {
            consumer_id: Set(transaction.consumer_id.into_inner()),
            contract_number: Set(transaction.contract_number),
            tenor: Set(transaction.tenor.months()),
            otr: Set(transaction.otr),
            admin_fee: Set(transaction.terms.admin_fee),
            installment_amount: Set(transaction.terms.installment_amount),
            interest_amount: Set(transaction.terms.interest_amount),
            asset_name: Set(transaction.terms.asset_name),
            status: Set(TransactionStatus::Active),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
            ..Default::default()
        }
        .insert(&txn)
        .await
        .map_err(store_error)?;

        txn.commit().await.map_err(store_error)?;
        model.into_domain()
    }

    async fn release(
        &self,
        id: CreditLimitId,
        amount: Decimal,
        now: DateTime<Utc>,
    ) -> Result<CreditLimit, StoreError> {
        let txn = self.db.begin().await.map_err(store_error)?;

        let result = credit_limits::Entity::update_many()
            .col_expr(
                credit_limits::Column::UsedAmount,
                Func::greatest([
                    Expr::col(credit_limits::Column::UsedAmount).sub(amount),
                    Expr::value(Decimal::ZERO),
                ])
                .into(),
            )
            .col_expr(credit_limits::Column::UpdatedAt, Expr::value(now))
            .filter(credit_limits::Column::Id.eq(id.into_inner()))
            .exec(&txn)
            .await
            .map_err(store_error)?;

        if result.rows_affected == 0 {
            return Err(not_found(id));
        }

        let limit = fetch(&txn, id).await?;
        txn.commit().await.map_err(store_error)?;
        Ok(limit)
    }
}
