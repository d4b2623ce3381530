//! `SeaORM` Entity for credit_limits table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "credit_limits")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub consumer_id: i64,
    pub tenor: i16,
    #[sea_orm(column_type = "Decimal(Some((15, 2)))")]
    pub limit_amount: Decimal,
    #[sea_orm(column_type = "Decimal(Some((15, 2)))")]
    pub used_amount: Decimal,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::consumers::Entity",
        from = "Column::ConsumerId",
        to = "super::consumers::Column::Id"
    )]
    Consumers,
}

impl Related<super::consumers::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Consumers.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
