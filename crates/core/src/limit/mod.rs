//! Limit ledger: per-tenor credit limits and their used amounts.

pub mod ledger;
pub mod types;

pub use ledger::LimitLedger;
pub use types::{CreditLimit, LimitKey, NewCreditLimit, Tenor};
