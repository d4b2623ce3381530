//! Consumer data types.

use chrono::{DateTime, NaiveDate, Utc};
use kredit_shared::types::ConsumerId;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A registered consumer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Consumer {
    /// Consumer ID.
    pub id: ConsumerId,
    /// National ID number (NIK), 16 digits.
    pub nik: String,
    /// Full name.
    pub full_name: String,
    /// Legal name as printed on the ID card.
    pub legal_name: String,
    /// Place of birth.
    pub place_of_birth: Option<String>,
    /// Date of birth.
    pub date_of_birth: Option<NaiveDate>,
    /// Declared monthly income.
    pub salary: Decimal,
    /// Reference to the ID card photo.
    pub ktp_photo: Option<String>,
    /// Reference to the selfie photo.
    pub selfie_photo: Option<String>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
    /// Soft-deletion timestamp.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deleted_at: Option<DateTime<Utc>>,
}

/// Registration input for a consumer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewConsumer {
    /// National ID number (NIK).
    #[serde(default)]
    pub nik: String,
    /// Full name.
    #[serde(default)]
    pub full_name: String,
    /// Legal name.
    #[serde(default)]
    pub legal_name: String,
    /// Place of birth.
    pub place_of_birth: Option<String>,
    /// Date of birth.
    pub date_of_birth: Option<NaiveDate>,
    /// Declared monthly income.
    #[serde(default)]
    pub salary: Decimal,
    /// Reference to the ID card photo.
    pub ktp_photo: Option<String>,
    /// Reference to the selfie photo.
    pub selfie_photo: Option<String>,
}

/// Mutable profile fields of an existing consumer.
///
/// The NIK is the consumer's identity and cannot be changed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsumerUpdate {
    /// Full name.
    pub full_name: String,
    /// Legal name.
    pub legal_name: String,
    /// Place of birth.
    pub place_of_birth: Option<String>,
    /// Date of birth.
    pub date_of_birth: Option<NaiveDate>,
    /// Declared monthly income.
    pub salary: Decimal,
    /// Reference to the ID card photo.
    pub ktp_photo: Option<String>,
    /// Reference to the selfie photo.
    pub selfie_photo: Option<String>,
}

impl Consumer {
    /// Returns true once the consumer has been soft-deleted.
    #[must_use]
    pub const fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }

    /// Applies a profile update, keeping identity and creation time.
    pub fn apply(&mut self, update: ConsumerUpdate, now: DateTime<Utc>) {
        self.full_name = update.full_name;
        self.legal_name = update.legal_name;
        self.place_of_birth = update.place_of_birth;
        self.date_of_birth = update.date_of_birth;
        self.salary = update.salary;
        self.ktp_photo = update.ktp_photo;
        self.selfie_photo = update.selfie_photo;
        self.updated_at = now;
    }
}
