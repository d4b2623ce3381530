//! `SeaORM` Entity for consumers table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "consumers")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(unique)]
    pub nik: String,
    pub full_name: String,
    pub legal_name: String,
    pub place_of_birth: Option<String>,
    pub date_of_birth: Option<Date>,
    #[sea_orm(column_type = "Decimal(Some((15, 2)))")]
    pub salary: Decimal,
    pub ktp_photo: Option<String>,
    pub selfie_photo: Option<String>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
    pub deleted_at: Option<DateTimeWithTimeZone>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::credit_limits::Entity")]
    CreditLimits,
    #[sea_orm(has_many = "super::transactions::Entity")]
    Transactions,
}

impl Related<super::credit_limits::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CreditLimits.def()
    }
}

impl Related<super::transactions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Transactions.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
