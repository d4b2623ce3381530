//! Field bounds every store can hold.
//!
//! Money is stored as `NUMERIC(15, 2)` and text columns have fixed widths.
//! Input outside these bounds is a validation error, never a store failure.

use rust_decimal::Decimal;

use crate::error::{CreditError, CreditResult};

/// Decimal places kept for money.
pub const MONEY_SCALE: u32 = 2;

/// Largest storable amount: 9,999,999,999,999.99.
pub const MAX_MONEY: Decimal = Decimal::from_parts(0xA4C6_7FFF, 0x0003_8D7E, 0, false, MONEY_SCALE);

/// Width of name and asset columns.
pub const MAX_NAME_LEN: usize = 255;

/// Width of the place-of-birth column.
pub const MAX_PLACE_LEN: usize = 100;

/// Width of the contract number column.
pub const MAX_CONTRACT_NUMBER_LEN: usize = 255;

/// Checks that `amount` has at most two decimal places and fits the money
/// column. Sign checks are left to the caller.
pub fn check_money(amount: Decimal) -> CreditResult<()> {
    if amount.normalize().scale() > MONEY_SCALE || amount.abs() > MAX_MONEY {
        return Err(CreditError::validation("invalid amount"));
    }
    Ok(())
}

/// Checks that `value` fits a column of `max` characters.
pub fn check_len(value: &str, max: usize) -> CreditResult<()> {
    if value.chars().count() > max {
        return Err(CreditError::validation("field too long"));
    }
    Ok(())
}

/// Like [`check_len`] for optional columns.
pub fn check_opt_len(value: Option<&str>, max: usize) -> CreditResult<()> {
    value.map_or(Ok(()), |v| check_len(v, max))
}
