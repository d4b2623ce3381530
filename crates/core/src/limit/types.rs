//! Credit limit data types.

use chrono::{DateTime, Utc};
use kredit_shared::types::{ConsumerId, CreditLimitId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::CreditError;

/// Financing term in months.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i16", into = "i16")]
pub enum Tenor {
    /// One month.
    One,
    /// Two months.
    Two,
    /// Three months.
    Three,
    /// Six months.
    Six,
}

impl Tenor {
    /// All tenors offered, shortest first.
    pub const ALL: [Self; 4] = [Self::One, Self::Two, Self::Three, Self::Six];

    /// Number of months.
    #[must_use]
    pub const fn months(self) -> i16 {
        match self {
            Self::One => 1,
            Self::Two => 2,
            Self::Three => 3,
            Self::Six => 6,
        }
    }
}

impl TryFrom<i64> for Tenor {
    type Error = CreditError;

    fn try_from(months: i64) -> Result<Self, Self::Error> {
        match months {
            1 => Ok(Self::One),
            2 => Ok(Self::Two),
            3 => Ok(Self::Three),
            6 => Ok(Self::Six),
            _ => Err(CreditError::validation("invalid tenor")),
        }
    }
}

impl TryFrom<i16> for Tenor {
    type Error = CreditError;

    fn try_from(months: i16) -> Result<Self, Self::Error> {
        Self::try_from(i64::from(months))
    }
}

impl From<Tenor> for i16 {
    fn from(tenor: Tenor) -> Self {
        tenor.months()
    }
}

impl std::fmt::Display for Tenor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.months())
    }
}

/// The unit of admission exclusivity: one consumer's limit for one tenor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LimitKey {
    /// Owning consumer.
    pub consumer_id: ConsumerId,
    /// Tenor of the limit.
    pub tenor: Tenor,
}

impl LimitKey {
    /// Creates a key.
    #[must_use]
    pub const fn new(consumer_id: ConsumerId, tenor: Tenor) -> Self {
        Self { consumer_id, tenor }
    }
}

/// A consumer's credit limit for one tenor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreditLimit {
    /// Limit ID.
    pub id: CreditLimitId,
    /// Owning consumer.
    pub consumer_id: ConsumerId,
    /// Tenor.
    pub tenor: Tenor,
    /// Granted amount.
    pub limit_amount: Decimal,
    /// Amount reserved by admitted transactions.
    pub used_amount: Decimal,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

impl CreditLimit {
    /// Amount still available for admission.
    #[must_use]
    pub fn headroom(&self) -> Decimal {
        self.limit_amount - self.used_amount
    }

    /// Returns true if `amount` fits entirely in the remaining headroom.
    #[must_use]
    pub fn can_admit(&self, amount: Decimal) -> bool {
        amount <= self.headroom()
    }

    /// Returns true if `0 <= used_amount <= limit_amount`.
    #[must_use]
    pub fn is_consistent(&self) -> bool {
        self.used_amount >= Decimal::ZERO && self.used_amount <= self.limit_amount
    }

    /// The key this limit is locked under.
    #[must_use]
    pub const fn key(&self) -> LimitKey {
        LimitKey::new(self.consumer_id, self.tenor)
    }
}

/// Input for inserting a credit limit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCreditLimit {
    /// Owning consumer.
    pub consumer_id: ConsumerId,
    /// Tenor.
    pub tenor: Tenor,
    /// Granted amount.
    pub limit_amount: Decimal,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}
