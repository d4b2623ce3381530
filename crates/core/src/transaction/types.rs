//! Transaction data types.

use chrono::{DateTime, Utc};
use kredit_shared::types::{ConsumerId, TransactionId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::CreditError;
use crate::limit::Tenor;

/// Lifecycle state of a transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionStatus {
    /// Installments are still running.
    Active,
    /// Fully paid.
    Completed,
    /// The consumer defaulted.
    Defaulted,
}

impl TransactionStatus {
    /// Wire representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Active => "ACTIVE",
            Self::Completed => "COMPLETED",
            Self::Defaulted => "DEFAULTED",
        }
    }
}

impl std::fmt::Display for TransactionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for TransactionStatus {
    type Err = CreditError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ACTIVE" => Ok(Self::Active),
            "COMPLETED" => Ok(Self::Completed),
            "DEFAULTED" => Ok(Self::Defaulted),
            _ => Err(CreditError::validation("invalid status")),
        }
    }
}

/// Pricing terms supplied with a transaction. Stored as given.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionTerms {
    /// Administration fee.
    #[serde(default)]
    pub admin_fee: Decimal,
    /// Monthly installment.
    #[serde(default)]
    pub installment_amount: Decimal,
    /// Total interest.
    #[serde(default)]
    pub interest_amount: Decimal,
    /// Financed asset description.
    #[serde(default)]
    pub asset_name: Option<String>,
}

impl TransactionTerms {
    /// Returns true if every monetary term is non-negative.
    #[must_use]
    pub fn is_non_negative(&self) -> bool {
        self.amounts().iter().all(|amount| *amount >= Decimal::ZERO)
    }

    /// The monetary terms: admin fee, installment, interest.
    #[must_use]
    pub const fn amounts(&self) -> [Decimal; 3] {
        [self.admin_fee, self.installment_amount, self.interest_amount]
    }
}

/// A financed purchase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    /// Transaction ID.
    pub id: TransactionId,
    /// Owning consumer.
    pub consumer_id: ConsumerId,
    /// Globally unique contract number.
    pub contract_number: String,
    /// Tenor the transaction draws on.
    pub tenor: Tenor,
    /// Financed principal (on-the-road price).
    pub otr: Decimal,
    /// Administration fee.
    pub admin_fee: Decimal,
    /// Monthly installment.
    pub installment_amount: Decimal,
    /// Total interest.
    pub interest_amount: Decimal,
    /// Financed asset description.
    pub asset_name: Option<String>,
    /// Lifecycle status.
    pub status: TransactionStatus,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// A transaction that passed admission and is about to be recorded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTransaction {
    /// Owning consumer.
    pub consumer_id: ConsumerId,
    /// Contract number.
    pub contract_number: String,
    /// Tenor.
    pub tenor: Tenor,
    /// Financed principal.
    pub otr: Decimal,
    /// Pricing terms.
    pub terms: TransactionTerms,
    /// Admission timestamp.
    pub created_at: DateTime<Utc>,
}

impl NewTransaction {
    /// Materializes the stored row once the store has assigned an ID.
    #[must_use]
    pub fn into_transaction(self, id: TransactionId) -> Transaction {
        Transaction {
            id,
            consumer_id: self.consumer_id,
            contract_number: self.contract_number,
            tenor: self.tenor,
            otr: self.otr,
            admin_fee: self.terms.admin_fee,
            installment_amount: self.terms.installment_amount,
            interest_amount: self.terms.interest_amount,
            asset_name: self.terms.asset_name,
            status: TransactionStatus::Active,
            created_at: self.created_at,
            updated_at: self.created_at,
        }
    }
}
