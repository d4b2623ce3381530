//! Error types for credit operations.
//!
//! `CreditError` is what every registry, the admission controller, and the
//! service facade return. Store implementations report `StoreError`, which
//! the domain layer translates into the appropriate `CreditError`.

use rust_decimal::Decimal;
use thiserror::Error;

use kredit_shared::AppError;

/// Result alias for credit operations.
pub type CreditResult<T> = Result<T, CreditError>;

/// Errors raised by the credit domain.
#[derive(Debug, Error)]
pub enum CreditError {
    /// Malformed or out-of-range input.
    #[error("{0}")]
    Validation(String),

    /// A uniqueness rule would be violated.
    #[error("{0}")]
    Conflict(String),

    /// A referenced entity does not exist.
    #[error("{0}")]
    NotFound(String),

    /// The requested amount exceeds the remaining headroom of the limit.
    #[error("insufficient limit: requested {requested}, available {headroom}")]
    InsufficientLimit {
        /// Amount the caller tried to admit.
        requested: Decimal,
        /// Headroom left on the limit at decision time.
        headroom: Decimal,
    },

    /// The backing store failed.
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl CreditError {
    pub(crate) fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub(crate) fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }

    pub(crate) fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }
}

/// Failures reported by store implementations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// A unique constraint rejected the write. Carries the constraint name.
    #[error("duplicate value violates {0}")]
    Duplicate(String),

    /// The row to modify does not exist.
    #[error("record not found: {0}")]
    NotFound(String),

    /// A conditional limit update matched no row.
    #[error("limit update rejected by guard condition")]
    LimitExceeded,

    /// Any other backend failure.
    #[error("store backend error: {0}")]
    Backend(String),
}

impl From<CreditError> for AppError {
    fn from(err: CreditError) -> Self {
        match err {
            CreditError::Validation(msg) => Self::Validation(msg),
            CreditError::Conflict(msg) => Self::Conflict(msg),
            CreditError::NotFound(msg) => Self::NotFound(msg),
            err @ CreditError::InsufficientLimit { .. } => Self::InsufficientLimit(err.to_string()),
            CreditError::Store(err) => Self::Database(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_insufficient_limit_message() {
        let err = CreditError::InsufficientLimit {
            requested: dec!(500000),
            headroom: dec!(400000),
        };
        assert_eq!(
            err.to_string(),
            "insufficient limit: requested 500000, available 400000"
        );
    }

    #[test]
    fn test_into_app_error() {
        let app: AppError = CreditError::validation("invalid tenor").into();
        assert_eq!(app.status_code(), 400);
        assert_eq!(app.public_message(), "invalid tenor");

        let app: AppError = CreditError::conflict("duplicate contract number").into();
        assert_eq!(app.status_code(), 409);

        let app: AppError = CreditError::not_found("no limit for tenor").into();
        assert_eq!(app.status_code(), 404);

        let app: AppError = CreditError::InsufficientLimit {
            requested: dec!(2),
            headroom: dec!(1),
        }
        .into();
        assert_eq!(app.status_code(), 400);
        assert_eq!(app.error_code(), "INSUFFICIENT_LIMIT");

        let app: AppError = CreditError::Store(StoreError::Backend("boom".into())).into();
        assert_eq!(app.status_code(), 500);
        assert_eq!(app.public_message(), "internal server error");
    }
}
