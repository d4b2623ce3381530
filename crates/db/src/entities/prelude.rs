//! Entity re-exports.

pub use super::consumers::Entity as Consumers;
pub use super::credit_limits::Entity as CreditLimits;
pub use super::transactions::Entity as Transactions;
