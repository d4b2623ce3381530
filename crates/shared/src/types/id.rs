//! Typed IDs for type-safe entity references.
//!
//! Rows are keyed by store-assigned positive integers. Wrapping them keeps a
//! `ConsumerId` from being passed where a `TransactionId` is expected.

use serde::{Deserialize, Serialize};

/// Error returned when an ID cannot be parsed or is not positive.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid ID: {0}")]
pub struct InvalidId(pub String);

/// Macro to generate typed ID wrappers.
macro_rules! typed_id {
    ($name:ident, $doc:expr) => {
        #[doc = $doc]
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(pub i64);

        impl $name {
            /// Wraps a raw row ID.
            #[must_use]
            pub const fn new(id: i64) -> Self {
                Self(id)
            }

            /// Returns the inner row ID.
            #[must_use]
            pub const fn into_inner(self) -> i64 {
                self.0
            }

            /// Returns true if the ID could refer to a stored row.
            #[must_use]
            pub const fn is_valid(self) -> bool {
                self.0 > 0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl std::str::FromStr for $name {
            type Err = InvalidId;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.trim().parse::<i64>() {
                    Ok(id) if id > 0 => Ok(Self(id)),
                    _ => Err(InvalidId(s.to_string())),
                }
            }
        }

        impl From<$name> for i64 {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

typed_id!(ConsumerId, "Unique identifier for a consumer.");
typed_id!(CreditLimitId, "Unique identifier for a credit limit.");
typed_id!(TransactionId, "Unique identifier for a financing transaction.");

#[cfg(test)]
#[path = "id_tests.rs"]
mod tests;
