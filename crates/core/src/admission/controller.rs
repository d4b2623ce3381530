//! The admission controller.

use std::sync::Arc;

use chrono::Utc;
use kredit_shared::types::ConsumerId;
use rust_decimal::Decimal;
use tracing::{info, warn};

use super::locks::KeyedLocks;
use crate::bounds::{MAX_CONTRACT_NUMBER_LEN, MAX_NAME_LEN, check_len, check_money, check_opt_len};
use crate::error::{CreditError, CreditResult, StoreError};
use crate::limit::{CreditLimit, LimitKey, Tenor};
use crate::store::{LimitStore, TransactionStore};
use crate::transaction::{NewTransaction, Transaction, TransactionTerms};

/// A proposed transaction awaiting admission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdmissionRequest {
    /// Consumer drawing on the limit.
    pub consumer_id: ConsumerId,
    /// Requested tenor in months, not yet validated.
    pub tenor: i64,
    /// Contract number, unique across all consumers.
    pub contract_number: String,
    /// Financed principal (OTR).
    pub amount: Decimal,
    /// Pricing terms recorded with the transaction.
    pub terms: TransactionTerms,
}

/// Serializes check-then-reserve per `(consumer, tenor)`.
///
/// Admissions on the same key run one at a time and each sees every earlier
/// reservation; admissions on different keys run in parallel.
pub struct AdmissionController {
    limits: Arc<dyn LimitStore>,
    transactions: Arc<dyn TransactionStore>,
    locks: Arc<KeyedLocks<LimitKey>>,
}

impl AdmissionController {
    /// Creates a controller over the given stores and lock table.
    ///
    /// Every component that writes a credit limit must share `locks`.
    pub fn new(
        limits: Arc<dyn LimitStore>,
        transactions: Arc<dyn TransactionStore>,
        locks: Arc<KeyedLocks<LimitKey>>,
    ) -> Self {
        Self {
            limits,
            transactions,
            locks,
        }
    }

    /// Admits a transaction against the consumer's limit for its tenor.
    ///
    /// Steps, each failing fast:
    /// 1. consumer ID and contract number present, amount positive, tenor
    ///    offered, terms non-negative, every field storable
    /// 2. contract number not yet used
    /// 3. a limit exists for the consumer and tenor
    /// 4. the amount fits in the remaining headroom
    /// 5. reserve the amount and record the transaction in one store write
    ///
    /// Steps 2 to 5 run under the key's lock.
    pub async fn admit(&self, request: AdmissionRequest) -> CreditResult<Transaction> {
        if !request.consumer_id.is_valid() || request.contract_number.trim().is_empty() {
            return Err(CreditError::validation("missing required field"));
        }
        check_len(&request.contract_number, MAX_CONTRACT_NUMBER_LEN)?;
        if request.amount <= Decimal::ZERO {
            return Err(CreditError::validation("non-positive amount"));
        }
        check_money(request.amount)?;
        let tenor = Tenor::try_from(request.tenor)?;
        if !request.terms.is_non_negative() {
            return Err(CreditError::validation("negative fee"));
        }
        for amount in request.terms.amounts() {
            check_money(amount)?;
        }
        check_opt_len(request.terms.asset_name.as_deref(), MAX_NAME_LEN)?;

        let key = LimitKey::new(request.consumer_id, tenor);
        let _guard = self.locks.acquire(key).await;

        if self
            .transactions
            .find_by_contract_number(&request.contract_number)
            .await?
            .is_some()
        {
            warn!(contract_number = %request.contract_number, "Duplicate contract number");
            return Err(duplicate_contract());
        }

        let limit = self
            .limits
            .find(request.consumer_id, tenor)
            .await?
            .ok_or_else(|| CreditError::not_found("no limit for tenor"))?;

        if !limit.can_admit(request.amount) {
            warn!(
                consumer_id = %request.consumer_id,
                tenor = %tenor,
                requested = %request.amount,
                headroom = %limit.headroom(),
                "Admission rejected: insufficient limit"
            );
            return Err(CreditError::InsufficientLimit {
                requested: request.amount,
                headroom: limit.headroom(),
            });
        }

        let new_tx = NewTransaction {
            consumer_id: request.consumer_id,
            contract_number: request.contract_number,
            tenor,
            otr: request.amount,
            terms: request.terms,
            created_at: Utc::now(),
        };

        let transaction = self
            .limits
            .reserve(limit.id, request.amount, new_tx)
            .await
            .map_err(|err| match err {
                StoreError::Duplicate(_) => duplicate_contract(),
                // Another process reserved on this row between our read and write.
                StoreError::LimitExceeded => CreditError::InsufficientLimit {
                    requested: request.amount,
                    headroom: limit.headroom(),
                },
                other => CreditError::Store(other),
            })?;

        info!(
            transaction_id = %transaction.id,
            consumer_id = %transaction.consumer_id,
            tenor = %tenor,
            contract_number = %transaction.contract_number,
            amount = %transaction.otr,
            "Transaction admitted"
        );
        Ok(transaction)
    }

    /// Returns `amount` of reserved credit to the limit, never below zero.
    pub async fn release(
        &self,
        consumer_id: ConsumerId,
        tenor: i64,
        amount: Decimal,
    ) -> CreditResult<CreditLimit> {
        if amount <= Decimal::ZERO {
            return Err(CreditError::validation("non-positive amount"));
        }
        check_money(amount)?;
        let tenor = Tenor::try_from(tenor)?;

        let _guard = self.locks.acquire(LimitKey::new(consumer_id, tenor)).await;

        let limit = self
            .limits
            .find(consumer_id, tenor)
            .await?
            .ok_or_else(|| CreditError::not_found("no limit for tenor"))?;

        let limit = self.limits.release(limit.id, amount, Utc::now()).await?;
        info!(
            consumer_id = %consumer_id,
            tenor = %tenor,
            amount = %amount,
            used_amount = %limit.used_amount,
            "Limit released"
        );
        Ok(limit)
    }
}

fn duplicate_contract() -> CreditError {
    CreditError::conflict("duplicate contract number")
}
