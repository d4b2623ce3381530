//! Core business logic for Kredit.
//!
//! This crate contains pure business logic with ZERO web or database dependencies.
//! All domain types, validation rules, and the admission algorithm live here;
//! persistence is reached through the traits in [`store`].
//!
//! # Modules
//!
//! - `consumer` - Consumer registry and eligibility rules
//! - `limit` - Per-tenor credit limits
//! - `transaction` - Financed transactions and their status
//! - `admission` - Check-then-reserve under per-key exclusivity
//! - `bounds` - Amount and text limits shared by every store
//! - `store` - Store contracts and the in-memory implementation
//! - `service` - Facade combining all of the above

pub mod admission;
pub mod bounds;
pub mod consumer;
pub mod error;
pub mod limit;
pub mod service;
pub mod store;
pub mod transaction;

pub use error::{CreditError, CreditResult, StoreError};
pub use service::CreditService;
