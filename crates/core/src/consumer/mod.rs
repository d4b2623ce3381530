//! Consumer registry: identity records and registration eligibility.

pub mod registry;
pub mod rules;
pub mod types;

pub use registry::ConsumerRegistry;
pub use rules::EligibilityRules;
pub use types::{Consumer, ConsumerUpdate, NewConsumer};
