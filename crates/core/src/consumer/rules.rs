//! Registration eligibility rules.
//!
//! Rules run in a fixed order and stop at the first violation, so callers
//! always see the same message for the same bad input.

use chrono::NaiveDate;
use rust_decimal::Decimal;

use super::types::{ConsumerUpdate, NewConsumer};
use crate::bounds::{MAX_NAME_LEN, MAX_PLACE_LEN, check_len, check_money, check_opt_len};
use crate::error::{CreditError, CreditResult};

/// Length of an Indonesian national ID number.
pub const NIK_LENGTH: usize = 16;

/// Eligibility policy for consumers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EligibilityRules {
    /// Lowest accepted declared monthly income.
    pub minimum_income: Decimal,
}

impl Default for EligibilityRules {
    fn default() -> Self {
        Self {
            minimum_income: Decimal::from(1_000_000),
        }
    }
}

impl EligibilityRules {
    /// Creates rules with the given income threshold.
    #[must_use]
    pub const fn new(minimum_income: Decimal) -> Self {
        Self { minimum_income }
    }

    /// Validates a registration.
    ///
    /// 1. names and NIK present
    /// 2. NIK format
    /// 3. names and place of birth within column widths
    /// 4. income not negative and storable
    /// 5. income at or above the minimum
    /// 6. birth date not after `today`
    pub fn validate_registration(&self, input: &NewConsumer, today: NaiveDate) -> CreditResult<()> {
        if is_blank(&input.full_name) || is_blank(&input.legal_name) || is_blank(&input.nik) {
            return Err(CreditError::validation("missing required field"));
        }
        validate_nik(&input.nik)?;
        validate_lengths(&input.full_name, &input.legal_name, input.place_of_birth.as_deref())?;
        self.validate_income(input.salary)?;
        validate_birth_date(input.date_of_birth, today)
    }

    /// Validates a profile update. Same rules as registration minus the NIK.
    pub fn validate_update(&self, update: &ConsumerUpdate, today: NaiveDate) -> CreditResult<()> {
        if is_blank(&update.full_name) || is_blank(&update.legal_name) {
            return Err(CreditError::validation("missing required field"));
        }
        validate_lengths(&update.full_name, &update.legal_name, update.place_of_birth.as_deref())?;
        self.validate_income(update.salary)?;
        validate_birth_date(update.date_of_birth, today)
    }

    fn validate_income(&self, salary: Decimal) -> CreditResult<()> {
        if salary < Decimal::ZERO {
            return Err(CreditError::validation("negative income"));
        }
        check_money(salary)?;
        if salary < self.minimum_income {
            return Err(CreditError::validation("income below minimum"));
        }
        Ok(())
    }
}

/// Checks that a NIK is exactly 16 ASCII digits.
pub fn validate_nik(nik: &str) -> CreditResult<()> {
    if nik.len() == NIK_LENGTH && nik.bytes().all(|b| b.is_ascii_digit()) {
        Ok(())
    } else {
        Err(CreditError::validation("invalid national ID"))
    }
}

fn validate_lengths(full_name: &str, legal_name: &str, place_of_birth: Option<&str>) -> CreditResult<()> {
    check_len(full_name, MAX_NAME_LEN)?;
    check_len(legal_name, MAX_NAME_LEN)?;
    check_opt_len(place_of_birth, MAX_PLACE_LEN)
}

fn validate_birth_date(date_of_birth: Option<NaiveDate>, today: NaiveDate) -> CreditResult<()> {
    match date_of_birth {
        Some(dob) if dob > today => Err(CreditError::validation("invalid birth date")),
        _ => Ok(()),
    }
}

fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 1).unwrap()
    }

    fn valid_input() -> NewConsumer {
        NewConsumer {
            nik: "1234567890123456".to_string(),
            full_name: "John Doe".to_string(),
            legal_name: "John Doe".to_string(),
            salary: dec!(5000000),
            date_of_birth: NaiveDate::from_ymd_opt(1990, 1, 1),
            ..Default::default()
        }
    }

    fn message(result: CreditResult<()>) -> String {
        match result {
            Err(CreditError::Validation(msg)) => msg,
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_valid_registration() {
        let rules = EligibilityRules::default();
        assert!(rules.validate_registration(&valid_input(), today()).is_ok());
    }

    #[rstest]
    #[case("INVALID")]
    #[case("123456789012345")]
    #[case("12345678901234567")]
    #[case("12345678901234a6")]
    #[case("１２３４５６７８９０１２３４")]
    fn test_invalid_nik(#[case] nik: &str) {
        let rules = EligibilityRules::default();
        let input = NewConsumer {
            nik: nik.to_string(),
            ..valid_input()
        };
        assert_eq!(
            message(rules.validate_registration(&input, today())),
            "invalid national ID"
        );
    }

    #[test]
    fn test_missing_fields_checked_first() {
        let rules = EligibilityRules::default();
        let input = NewConsumer {
            nik: "bad".to_string(),
            full_name: "   ".to_string(),
            salary: dec!(-1),
            ..valid_input()
        };
        assert_eq!(
            message(rules.validate_registration(&input, today())),
            "missing required field"
        );
    }

    #[test]
    fn test_negative_income_before_minimum() {
        let rules = EligibilityRules::default();
        let input = NewConsumer {
            salary: dec!(-100),
            ..valid_input()
        };
        assert_eq!(
            message(rules.validate_registration(&input, today())),
            "negative income"
        );
    }

    #[rstest]
    #[case(dec!(0), false)]
    #[case(dec!(999999.99), false)]
    #[case(dec!(1000000), true)]
    #[case(dec!(1000000.01), true)]
    fn test_minimum_income_boundary(#[case] salary: Decimal, #[case] accepted: bool) {
        let rules = EligibilityRules::default();
        let input = NewConsumer {
            salary,
            ..valid_input()
        };
        let result = rules.validate_registration(&input, today());
        if accepted {
            assert!(result.is_ok());
        } else {
            assert_eq!(message(result), "income below minimum");
        }
    }

    #[test]
    fn test_configured_minimum() {
        let rules = EligibilityRules::new(dec!(10000000));
        assert_eq!(
            message(rules.validate_registration(&valid_input(), today())),
            "income below minimum"
        );
    }

    #[rstest]
    #[case("a".repeat(256), None)]
    #[case("John Doe".to_string(), Some("x".repeat(101)))]
    fn test_overlong_fields(#[case] full_name: String, #[case] place_of_birth: Option<String>) {
        let rules = EligibilityRules::default();
        let input = NewConsumer {
            full_name,
            place_of_birth,
            ..valid_input()
        };
        assert_eq!(
            message(rules.validate_registration(&input, today())),
            "field too long"
        );
    }

    #[rstest]
    #[case(dec!(5000000.001))]
    #[case(dec!(100000000000000))]
    fn test_unstorable_income(#[case] salary: Decimal) {
        let rules = EligibilityRules::default();
        let input = NewConsumer {
            salary,
            ..valid_input()
        };
        assert_eq!(
            message(rules.validate_registration(&input, today())),
            "invalid amount"
        );
    }

    #[test]
    fn test_birth_date_in_future() {
        let rules = EligibilityRules::default();
        let input = NewConsumer {
            date_of_birth: NaiveDate::from_ymd_opt(2025, 6, 2),
            ..valid_input()
        };
        assert_eq!(
            message(rules.validate_registration(&input, today())),
            "invalid birth date"
        );

        let born_today = NewConsumer {
            date_of_birth: Some(today()),
            ..valid_input()
        };
        assert!(rules.validate_registration(&born_today, today()).is_ok());

        let no_date = NewConsumer {
            date_of_birth: None,
            ..valid_input()
        };
        assert!(rules.validate_registration(&no_date, today()).is_ok());
    }

    #[test]
    fn test_update_rules() {
        let rules = EligibilityRules::default();
        let update = ConsumerUpdate {
            full_name: "Jane".to_string(),
            legal_name: "Jane".to_string(),
            salary: dec!(2000000),
            ..Default::default()
        };
        assert!(rules.validate_update(&update, today()).is_ok());

        let blank = ConsumerUpdate {
            legal_name: String::new(),
            ..update.clone()
        };
        assert_eq!(
            message(rules.validate_update(&blank, today())),
            "missing required field"
        );

        let poor = ConsumerUpdate {
            salary: dec!(10),
            ..update
        };
        assert_eq!(
            message(rules.validate_update(&poor, today())),
            "income below minimum"
        );

        let long_legal = ConsumerUpdate {
            full_name: "Jane".to_string(),
            legal_name: "L".repeat(256),
            salary: dec!(2000000),
            ..Default::default()
        };
        assert_eq!(
            message(rules.validate_update(&long_legal, today())),
            "field too long"
        );
    }
}
