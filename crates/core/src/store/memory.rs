//! In-process store backed by ordered maps behind one lock.
//!
//! Every write takes the single write lock, which makes `reserve` atomic the
//! same way a database transaction does for the SQL store.

use std::collections::BTreeMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use kredit_shared::types::{ConsumerId, CreditLimitId, TransactionId};
use rust_decimal::Decimal;

use super::{ConsumerStore, LimitStore, TransactionStore, constraints};
use crate::consumer::{Consumer, NewConsumer};
use crate::error::StoreError;
use crate::limit::{CreditLimit, NewCreditLimit, Tenor};
use crate::transaction::{NewTransaction, Transaction, TransactionStatus};

#[derive(Debug, Default)]
struct MemoryState {
    consumers: BTreeMap<ConsumerId, Consumer>,
    limits: BTreeMap<CreditLimitId, CreditLimit>,
    transactions: BTreeMap<TransactionId, Transaction>,
    last_consumer_id: i64,
    last_limit_id: i64,
    last_transaction_id: i64,
}

/// In-memory implementation of every store contract.
#[derive(Debug, Default)]
pub struct MemoryStore {
    state: RwLock<MemoryState>,
}

impl MemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, MemoryState>, StoreError> {
        self.state
            .read()
            .map_err(|_| StoreError::Backend("memory store lock poisoned".to_string()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, MemoryState>, StoreError> {
        self.state
            .write()
            .map_err(|_| StoreError::Backend("memory store lock poisoned".to_string()))
    }
}

fn limit_mut(
    state: &mut MemoryState,
    id: CreditLimitId,
) -> Result<&mut CreditLimit, StoreError> {
    state
        .limits
        .get_mut(&id)
        .ok_or_else(|| StoreError::NotFound(format!("credit limit {id}")))
}

#[async_trait]
impl ConsumerStore for MemoryStore {
    async fn insert(
        &self,
        consumer: NewConsumer,
        now: DateTime<Utc>,
    ) -> Result<Consumer, StoreError> {
        let mut state = self.write()?;
        // NIKs stay reserved by soft-deleted rows, like the SQL unique index.
        if state.consumers.values().any(|c| c.nik == consumer.nik) {
            return Err(StoreError::Duplicate(constraints::CONSUMER_NIK.to_string()));
        }

        state.last_consumer_id += 1;
        let id = ConsumerId::new(state.last_consumer_id);
        let record = Consumer {
            id,
            nik: consumer.nik,
            full_name: consumer.full_name,
            legal_name: consumer.legal_name,
            place_of_birth: consumer.place_of_birth,
            date_of_birth: consumer.date_of_birth,
            salary: consumer.salary,
            ktp_photo: consumer.ktp_photo,
            selfie_photo: consumer.selfie_photo,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        };
        state.consumers.insert(id, record.clone());
        Ok(record)
    }

    async fn find_by_id(&self, id: ConsumerId) -> Result<Option<Consumer>, StoreError> {
        let state = self.read()?;
        Ok(state.consumers.get(&id).filter(|c| !c.is_deleted()).cloned())
    }

    async fn find_by_nik(&self, nik: &str) -> Result<Option<Consumer>, StoreError> {
        let state = self.read()?;
        Ok(state
            .consumers
            .values()
            .find(|c| c.nik == nik && !c.is_deleted())
            .cloned())
    }

    async fn update(&self, consumer: &Consumer) -> Result<Consumer, StoreError> {
        let mut state = self.write()?;
        let stored = state
            .consumers
            .get_mut(&consumer.id)
            .filter(|c| !c.is_deleted())
            .ok_or_else(|| StoreError::NotFound(format!("consumer {}", consumer.id)))?;

        stored.full_name.clone_from(&consumer.full_name);
        stored.legal_name.clone_from(&consumer.legal_name);
        stored.place_of_birth.clone_from(&consumer.place_of_birth);
        stored.date_of_birth = consumer.date_of_birth;
        stored.salary = consumer.salary;
        stored.ktp_photo.clone_from(&consumer.ktp_photo);
        stored.selfie_photo.clone_from(&consumer.selfie_photo);
        stored.updated_at = consumer.updated_at;
        Ok(stored.clone())
    }

    async fn soft_delete(&self, id: ConsumerId, now: DateTime<Utc>) -> Result<bool, StoreError> {
        let mut state = self.write()?;
        match state.consumers.get_mut(&id).filter(|c| !c.is_deleted()) {
            Some(consumer) => {
                consumer.deleted_at = Some(now);
                consumer.updated_at = now;
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

#[async_trait]
impl LimitStore for MemoryStore {
    async fn insert(&self, limit: NewCreditLimit) -> Result<CreditLimit, StoreError> {
        let mut state = self.write()?;
        if state
            .limits
            .values()
            .any(|l| l.consumer_id == limit.consumer_id && l.tenor == limit.tenor)
        {
            return Err(StoreError::Duplicate(
                constraints::LIMIT_CONSUMER_TENOR.to_string(),
            ));
        }

        state.last_limit_id += 1;
        let id = CreditLimitId::new(state.last_limit_id);
        let record = CreditLimit {
            id,
            consumer_id: limit.consumer_id,
            tenor: limit.tenor,
            limit_amount: limit.limit_amount,
            used_amount: Decimal::ZERO,
            created_at: limit.created_at,
            updated_at: limit.created_at,
        };
        state.limits.insert(id, record.clone());
        Ok(record)
    }

    async fn find(
        &self,
        consumer_id: ConsumerId,
        tenor: Tenor,
    ) -> Result<Option<CreditLimit>, StoreError> {
        let state = self.read()?;
        Ok(state
            .limits
            .values()
            .find(|l| l.consumer_id == consumer_id && l.tenor == tenor)
            .cloned())
    }

    async fn list_by_consumer(
        &self,
        consumer_id: ConsumerId,
    ) -> Result<Vec<CreditLimit>, StoreError> {
        let state = self.read()?;
        let mut limits: Vec<CreditLimit> = state
            .limits
            .values()
            .filter(|l| l.consumer_id == consumer_id)
            .cloned()
            .collect();
        limits.sort_by_key(|l| l.tenor);
        Ok(limits)
    }

    async fn set_limit_amount(
        &self,
        id: CreditLimitId,
        limit_amount: Decimal,
        now: DateTime<Utc>,
    ) -> Result<CreditLimit, StoreError> {
        let mut state = self.write()?;
        let limit = limit_mut(&mut state, id)?;
        if limit.used_amount > limit_amount {
            return Err(StoreError::LimitExceeded);
        }
        limit.limit_amount = limit_amount;
        limit.updated_at = now;
        Ok(limit.clone())
    }

    async fn reserve(
        &self,
        id: CreditLimitId,
        amount: Decimal,
        transaction: NewTransaction,
    ) -> Result<Transaction, StoreError> {
        let mut state = self.write()?;
        if state
            .transactions
            .values()
            .any(|t| t.contract_number == transaction.contract_number)
        {
            return Err(StoreError::Duplicate(
                constraints::TRANSACTION_CONTRACT.to_string(),
            ));
        }

        let now = transaction.created_at;
        let limit = limit_mut(&mut state, id)?;
        if !limit.can_admit(amount) {
            return Err(StoreError::LimitExceeded);
        }
        limit.used_amount += amount;
        limit.updated_at = now;

        state.last_transaction_id += 1;
        let tx_id = TransactionId::new(state.last_transaction_id);
        let record = transaction.into_transaction(tx_id);
        state.transactions.insert(tx_id, record.clone());
        Ok(record)
    }

    async fn release(
        &self,
        id: CreditLimitId,
        amount: Decimal,
        now: DateTime<Utc>,
    ) -> Result<CreditLimit, StoreError> {
        let mut state = self.write()?;
        let limit = limit_mut(&mut state, id)?;
        limit.used_amount = (limit.used_amount - amount).max(Decimal::ZERO);
        limit.updated_at = now;
        Ok(limit.clone())
    }
}

#[async_trait]
impl TransactionStore for MemoryStore {
    async fn find_by_id(&self, id: TransactionId) -> Result<Option<Transaction>, StoreError> {
        let state = self.read()?;
        Ok(state.transactions.get(&id).cloned())
    }

    async fn find_by_contract_number(
        &self,
        contract_number: &str,
    ) -> Result<Option<Transaction>, StoreError> {
        let state = self.read()?;
        Ok(state
            .transactions
            .values()
            .find(|t| t.contract_number == contract_number)
            .cloned())
    }

    async fn list_by_consumer(
        &self,
        consumer_id: ConsumerId,
    ) -> Result<Vec<Transaction>, StoreError> {
        let state = self.read()?;
        Ok(state
            .transactions
            .values()
            .filter(|t| t.consumer_id == consumer_id)
            .cloned()
            .collect())
    }

    async fn set_status(
        &self,
        id: TransactionId,
        status: TransactionStatus,
        now: DateTime<Utc>,
    ) -> Result<Option<Transaction>, StoreError> {
        let mut state = self.write()?;
        Ok(state.transactions.get_mut(&id).map(|tx| {
            tx.status = status;
            tx.updated_at = now;
            tx.clone()
        }))
    }
}
