//! `SeaORM` entity definitions.

pub mod prelude;

pub mod consumers;
pub mod credit_limits;
pub mod sea_orm_active_enums;
pub mod transactions;
