//! Money
//!
//! Amounts are carried as integer minor units (pence/cents) throughout the
//! storefront. Percentages are applied in decimal space and rounded back to
//! whole minor units.

use decimal_percentage::Percentage;
use rust_decimal::{
    Decimal, RoundingStrategy,
    prelude::{FromPrimitive, ToPrimitive},
};
use rusty_money::{Money, iso};
use thiserror::Error;

/// Errors raised by minor-unit arithmetic.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MoneyError {
    /// The result does not fit in minor units.
    #[error("amount overflowed")]
    Overflow,
}

/// Calculate `percent` of an amount in minor units, rounding half away from zero.
///
/// # Errors
///
/// Returns [`MoneyError::Overflow`] if the result cannot be represented as `u64`.
pub fn percent_of_minor(percent: Percentage, minor: u64) -> Result<u64, MoneyError> {
    let applied = percent * Decimal::from(minor);

    applied
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_u64()
        .ok_or(MoneyError::Overflow)
}

/// Multiply a unit price by a quantity.
///
/// # Errors
///
/// Returns [`MoneyError::Overflow`] on overflow.
pub fn line_total(unit_price: u64, quantity: u32) -> Result<u64, MoneyError> {
    unit_price
        .checked_mul(u64::from(quantity))
        .ok_or(MoneyError::Overflow)
}

/// Sum a sequence of amounts.
///
/// # Errors
///
/// Returns [`MoneyError::Overflow`] on overflow.
pub fn sum_minor(amounts: impl IntoIterator<Item = u64>) -> Result<u64, MoneyError> {
    amounts
        .into_iter()
        .try_fold(0_u64, |acc, amount| acc.checked_add(amount))
        .ok_or(MoneyError::Overflow)
}

/// Render minor units as a display string in the store currency (USD).
#[must_use]
pub fn format_minor(minor: u64) -> String {
    match i64::try_from(minor) {
        Ok(minor) => Money::from_minor(minor, iso::USD).to_string(),
        Err(_overflow) => format!("{} USD", to_major(minor)),
    }
}

/// Convert minor units to a major-unit decimal (e.g. `12_345` to `123.45`).
#[must_use]
pub fn to_major(minor: u64) -> Decimal {
    Decimal::from_u64(minor).map_or(Decimal::ZERO, |value| value / Decimal::ONE_HUNDRED)
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[test]
    fn percent_of_minor_rounds_half_away_from_zero() -> TestResult {
        let rate = Percentage::from(Decimal::new(8, 2));

        assert_eq!(percent_of_minor(rate, 10_000)?, 800);
        assert_eq!(percent_of_minor(rate, 10_001)?, 800);
        assert_eq!(percent_of_minor(rate, 1_250)?, 100);
        assert_eq!(percent_of_minor(rate, 1_256)?, 100);
        assert_eq!(percent_of_minor(rate, 1_257)?, 101);

        Ok(())
    }

    #[test]
    fn percent_of_zero_is_zero() -> TestResult {
        assert_eq!(percent_of_minor(Percentage::from(Decimal::new(8, 2)), 0)?, 0);

        Ok(())
    }

    #[test]
    fn line_total_multiplies() -> TestResult {
        assert_eq!(line_total(50_00, 2)?, 100_00);

        Ok(())
    }

    #[test]
    fn line_total_overflow_is_reported() {
        assert_eq!(line_total(u64::MAX, 2), Err(MoneyError::Overflow));
    }

    #[test]
    fn sum_minor_adds_and_detects_overflow() -> TestResult {
        assert_eq!(sum_minor([100, 200, 300])?, 600);
        assert_eq!(sum_minor([u64::MAX, 1]), Err(MoneyError::Overflow));

        Ok(())
    }

    #[test]
    fn to_major_divides_by_one_hundred() {
        assert_eq!(to_major(12_345), Decimal::new(12_345, 2));
    }

    #[test]
    fn format_minor_includes_major_units() {
        let formatted = format_minor(123_00);

        assert!(formatted.contains("123"), "unexpected format: {formatted}");
    }
}
