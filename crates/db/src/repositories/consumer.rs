//! Consumer repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use kredit_core::StoreError;
use kredit_core::consumer::{Consumer, NewConsumer};
use kredit_core::store::ConsumerStore;
use kredit_shared::types::ConsumerId;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, Set,
};

use super::{store_error, to_utc};
use crate::entities::consumers;

/// Consumer repository backed by the `consumers` table.
#[derive(Debug, Clone)]
pub struct ConsumerRepository {
    db: DatabaseConnection,
}

impl ConsumerRepository {
    /// Creates a new consumer repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

impl From<consumers::Model> for Consumer {
    fn from(model: consumers::Model) -> Self {
        Self {
            id: ConsumerId::new(model.id),
            nik: model.nik,
            full_name: model.full_name,
            legal_name: model.legal_name,
            place_of_birth: model.place_of_birth,
            date_of_birth: model.date_of_birth,
            salary: model.salary,
            ktp_photo: model.ktp_photo,
            selfie_photo: model.selfie_photo,
            created_at: to_utc(model.created_at),
            updated_at: to_utc(model.updated_at),
            deleted_at: model.deleted_at.map(to_utc),
        }
    }
}

#[async_trait]
impl ConsumerStore for ConsumerRepository {
    async fn insert(
        &self,
        consumer: NewConsumer,
        now: DateTime<Utc>,
    ) -> Result<Consumer, StoreError> {
        let model = consumers::ActiveModel {
            nik: Set(consumer.nik),
            full_name: Set(consumer.full_name),
            legal_name: Set(consumer.legal_name),
            place_of_birth: Set(consumer.place_of_birth),
            date_of_birth: Set(consumer.date_of_birth),
            salary: Set(consumer.salary),
            ktp_photo: Set(consumer.ktp_photo),
            selfie_photo: Set(consumer.selfie_photo),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
            deleted_at: Set(None),
            ..Default::default()
        }
        .insert(&self.db)
        .await
        .map_err(store_error)?;

        Ok(model.into())
    }

    async fn find_by_id(&self, id: ConsumerId) -> Result<Option<Consumer>, StoreError> {
        let model = consumers::Entity::find_by_id(id.into_inner())
            .filter(consumers::Column::DeletedAt.is_null())
            .one(&self.db)
            .await
            .map_err(store_error)?;
        Ok(model.map(Into::into))
    }

    async fn find_by_nik(&self, nik: &str) -> Result<Option<Consumer>, StoreError> {
        let model = consumers::Entity::find()
            .filter(consumers::Column::Nik.eq(nik))
            .filter(consumers::Column::DeletedAt.is_null())
            .one(&self.db)
            .await
            .map_err(store_error)?;
        Ok(model.map(Into::into))
    }

    async fn update(&self, consumer: &Consumer) -> Result<Consumer, StoreError> {
        let active = consumers::ActiveModel {
            id: Set(consumer.id.into_inner()),
            full_name: Set(consumer.full_name.clone()),
            legal_name: Set(consumer.legal_name.clone()),
            place_of_birth: Set(consumer.place_of_birth.clone()),
            date_of_birth: Set(consumer.date_of_birth),
            salary: Set(consumer.salary),
            ktp_photo: Set(consumer.ktp_photo.clone()),
            selfie_photo: Set(consumer.selfie_photo.clone()),
            updated_at: Set(consumer.updated_at.into()),
            ..Default::default()
        };

        let model = consumers::Entity::update(active)
            .filter(consumers::Column::DeletedAt.is_null())
            .exec(&self.db)
            .await
            .map_err(|err| match err {
                DbErr::RecordNotUpdated => StoreError::NotFound(format!("consumer {}", consumer.id)),
                other => store_error(other),
            })?;

        Ok(model.into())
    }

    async fn soft_delete(&self, id: ConsumerId, now: DateTime<Utc>) -> Result<bool, StoreError> {
        let result = consumers::Entity::update_many()
            .col_expr(consumers::Column::DeletedAt, Expr::value(now))
            .col_expr(consumers::Column::UpdatedAt, Expr::value(now))
            .filter(consumers::Column::Id.eq(id.into_inner()))
            .filter(consumers::Column::DeletedAt.is_null())
            .exec(&self.db)
            .await
            .map_err(store_error)?;

        Ok(result.rows_affected > 0)
    }
}
