//! `SeaORM` Entity for transactions table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::TransactionStatus;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "transactions")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub consumer_id: i64,
    #[sea_orm(unique)]
    pub contract_number: String,
    pub tenor: i16,
    #[sea_orm(column_type = "Decimal(Some((15, 2)))")]
    pub otr: Decimal,
    #[sea_orm(column_type = "Decimal(Some((15, 2)))")]
    pub admin_fee: Decimal,
    #[sea_orm(column_type = "Decimal(Some((15, 2)))")]
    pub installment_amount: Decimal,
    #[sea_orm(column_type = "Decimal(Some((15, 2)))")]
    pub interest_amount: Decimal,
    pub asset_name: Option<String>,
    pub status: TransactionStatus,
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
