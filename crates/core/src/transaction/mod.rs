//! Transaction registry: financed purchases and their lifecycle.

pub mod registry;
pub mod types;

pub use registry::TransactionRegistry;
pub use types::{NewTransaction, Transaction, TransactionStatus, TransactionTerms};
