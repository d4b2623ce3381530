//! Consumer registry operations.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use kredit_shared::types::ConsumerId;
use tracing::info;

use super::rules::EligibilityRules;
use super::types::{Consumer, ConsumerUpdate, NewConsumer};
use crate::error::{CreditError, CreditResult, StoreError};
use crate::store::ConsumerStore;

/// Registers and maintains consumers.
pub struct ConsumerRegistry {
    store: Arc<dyn ConsumerStore>,
    rules: EligibilityRules,
}

impl ConsumerRegistry {
    /// Creates a registry enforcing `rules`.
    pub fn new(store: Arc<dyn ConsumerStore>, rules: EligibilityRules) -> Self {
        Self { store, rules }
    }

    /// Eligibility rules in force.
    #[must_use]
    pub const fn rules(&self) -> &EligibilityRules {
        &self.rules
    }

    /// Validates and stores a new consumer.
    pub async fn register(&self, input: NewConsumer) -> CreditResult<Consumer> {
        self.register_at(input, Utc::now()).await
    }

    pub(crate) async fn register_at(
        &self,
        mut input: NewConsumer,
        now: DateTime<Utc>,
    ) -> CreditResult<Consumer> {
        input.nik = input.nik.trim().to_string();
        self.rules.validate_registration(&input, now.date_naive())?;

        let consumer = self.store.insert(input, now).await.map_err(|err| match err {
            StoreError::Duplicate(_) => CreditError::conflict("duplicate national ID"),
            other => CreditError::Store(other),
        })?;

        info!(consumer_id = %consumer.id, "Consumer registered");
        Ok(consumer)
    }

    /// Finds a consumer by ID.
    pub async fn get_by_id(&self, id: ConsumerId) -> CreditResult<Consumer> {
        ensure_valid(id)?;
        self.store.find_by_id(id).await?.ok_or_else(not_found)
    }

    /// Finds a consumer by national ID.
    pub async fn get_by_nik(&self, nik: &str) -> CreditResult<Consumer> {
        self.store
            .find_by_nik(nik.trim())
            .await?
            .ok_or_else(not_found)
    }

    /// Replaces a consumer's profile fields after re-validating them.
    pub async fn update(&self, id: ConsumerId, update: ConsumerUpdate) -> CreditResult<Consumer> {
        ensure_valid(id)?;
        let now = Utc::now();
        self.rules.validate_update(&update, now.date_naive())?;

        let mut consumer = self.get_by_id(id).await?;
        consumer.apply(update, now);

        let consumer = self.store.update(&consumer).await.map_err(|err| match err {
            StoreError::NotFound(_) => not_found(),
            other => CreditError::Store(other),
        })?;
        info!(consumer_id = %consumer.id, "Consumer updated");
        Ok(consumer)
    }

    /// Soft-deletes a consumer.
    pub async fn delete(&self, id: ConsumerId) -> CreditResult<()> {
        ensure_valid(id)?;
        if !self.store.soft_delete(id, Utc::now()).await? {
            return Err(not_found());
        }
        info!(consumer_id = %id, "Consumer deleted");
        Ok(())
    }
}

fn ensure_valid(id: ConsumerId) -> CreditResult<()> {
    if id.is_valid() {
        Ok(())
    } else {
        Err(CreditError::validation("invalid consumer ID"))
    }
}

fn not_found() -> CreditError {
    CreditError::not_found("consumer not found")
}
