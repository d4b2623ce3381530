//! Limit ledger operations.

use std::sync::Arc;

use chrono::Utc;
use kredit_shared::types::ConsumerId;
use rust_decimal::Decimal;
use tracing::info;

use super::types::{CreditLimit, LimitKey, NewCreditLimit, Tenor};
use crate::admission::KeyedLocks;
use crate::bounds::check_money;
use crate::error::{CreditError, CreditResult, StoreError};
use crate::store::{ConsumerStore, LimitStore};

/// Assigns and maintains credit limits.
///
/// Writes take the same per-key locks as admission, so a limit change never
/// interleaves with a reservation on that limit.
pub struct LimitLedger {
    limits: Arc<dyn LimitStore>,
    consumers: Arc<dyn ConsumerStore>,
    locks: Arc<KeyedLocks<LimitKey>>,
}

impl LimitLedger {
    /// Creates a ledger.
    pub fn new(
        limits: Arc<dyn LimitStore>,
        consumers: Arc<dyn ConsumerStore>,
        locks: Arc<KeyedLocks<LimitKey>>,
    ) -> Self {
        Self {
            limits,
            consumers,
            locks,
        }
    }

    /// Grants a consumer a limit for one tenor, starting with nothing used.
    ///
    /// A consumer holds at most one limit per tenor; a second assignment is
    /// a `Conflict`.
    pub async fn assign(
        &self,
        consumer_id: ConsumerId,
        tenor: i64,
        limit_amount: Decimal,
    ) -> CreditResult<CreditLimit> {
        let tenor = Tenor::try_from(tenor)?;
        if limit_amount <= Decimal::ZERO {
            return Err(CreditError::validation("non-positive limit amount"));
        }
        check_money(limit_amount)?;
        if !consumer_id.is_valid() {
            return Err(CreditError::validation("invalid consumer ID"));
        }
        if self.consumers.find_by_id(consumer_id).await?.is_none() {
            return Err(CreditError::not_found("consumer not found"));
        }

        let _guard = self.locks.acquire(LimitKey::new(consumer_id, tenor)).await;

        if self.limits.find(consumer_id, tenor).await?.is_some() {
            return Err(duplicate_limit());
        }

        let limit = self
            .limits
            .insert(NewCreditLimit {
                consumer_id,
                tenor,
                limit_amount,
                created_at: Utc::now(),
            })
            .await
            .map_err(|err| match err {
                StoreError::Duplicate(_) => duplicate_limit(),
                other => CreditError::Store(other),
            })?;

        info!(
            limit_id = %limit.id,
            consumer_id = %consumer_id,
            tenor = %tenor,
            limit_amount = %limit_amount,
            "Credit limit assigned"
        );
        Ok(limit)
    }

    /// Finds the limit for a consumer and tenor.
    pub async fn get_by_consumer_and_tenor(
        &self,
        consumer_id: ConsumerId,
        tenor: i64,
    ) -> CreditResult<CreditLimit> {
        let tenor = Tenor::try_from(tenor)?;
        self.limits
            .find(consumer_id, tenor)
            .await?
            .ok_or_else(|| CreditError::not_found("no limit for tenor"))
    }

    /// Lists a consumer's limits ordered by tenor.
    pub async fn get_by_consumer(&self, consumer_id: ConsumerId) -> CreditResult<Vec<CreditLimit>> {
        Ok(self.limits.list_by_consumer(consumer_id).await?)
    }

    /// Changes the granted amount of an existing limit.
    ///
    /// The used amount is untouched; the new amount may not fall below it.
    pub async fn update(
        &self,
        consumer_id: ConsumerId,
        tenor: i64,
        limit_amount: Decimal,
    ) -> CreditResult<CreditLimit> {
        let tenor = Tenor::try_from(tenor)?;
        if limit_amount <= Decimal::ZERO {
            return Err(CreditError::validation("non-positive limit amount"));
        }
        check_money(limit_amount)?;

        let _guard = self.locks.acquire(LimitKey::new(consumer_id, tenor)).await;

        let limit = self
            .limits
            .find(consumer_id, tenor)
            .await?
            .ok_or_else(|| CreditError::not_found("no limit for tenor"))?;
        if limit_amount < limit.used_amount {
            return Err(below_used());
        }

        let limit = self
            .limits
            .set_limit_amount(limit.id, limit_amount, Utc::now())
            .await
            .map_err(|err| match err {
                StoreError::LimitExceeded => below_used(),
                other => CreditError::Store(other),
            })?;

        info!(
            limit_id = %limit.id,
            limit_amount = %limit.limit_amount,
            used_amount = %limit.used_amount,
            "Credit limit updated"
        );
        Ok(limit)
    }
}

fn duplicate_limit() -> CreditError {
    CreditError::conflict("limit already assigned for tenor")
}

fn below_used() -> CreditError {
    CreditError::validation("limit below used amount")
}
