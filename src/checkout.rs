//! Checkout
//!
//! Order pricing: subtotal, tax, shipping and grand total.

use decimal_percentage::Percentage;
use rust_decimal::Decimal;

use crate::money::{MoneyError, percent_of_minor, sum_minor};

/// Default tax rate (8%).
pub const DEFAULT_TAX_RATE_BASIS_POINTS: i64 = 800;

/// Default free-shipping threshold (100.00). Subtotals strictly above ship free.
pub const DEFAULT_FREE_SHIPPING_OVER: u64 = 100_00;

/// Default flat shipping charge (15.00).
pub const DEFAULT_FLAT_SHIPPING: u64 = 15_00;

/// Pricing rules applied when an order is placed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CheckoutPolicy {
    /// Tax applied to the subtotal, as a fraction (`0.08` is 8%).
    pub tax_rate: Decimal,

    /// Subtotals strictly greater than this ship free.
    pub free_shipping_over: u64,

    /// Shipping charged otherwise.
    pub flat_shipping: u64,
}

impl Default for CheckoutPolicy {
    fn default() -> Self {
        Self {
            tax_rate: Decimal::new(DEFAULT_TAX_RATE_BASIS_POINTS, 4),
            free_shipping_over: DEFAULT_FREE_SHIPPING_OVER,
            flat_shipping: DEFAULT_FLAT_SHIPPING,
        }
    }
}

/// Computed order totals, all in minor units.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderTotals {
    /// Sum of line totals.
    pub subtotal: u64,

    /// Tax on the subtotal.
    pub tax_amount: u64,

    /// Shipping charge.
    pub shipping_cost: u64,

    /// `subtotal + tax_amount + shipping_cost`.
    pub total_amount: u64,
}

impl CheckoutPolicy {
    /// Shipping charge for a subtotal.
    pub fn shipping_for(&self, subtotal: u64) -> u64 {
        if subtotal > self.free_shipping_over {
            0
        } else {
            self.flat_shipping
        }
    }

    /// Tax due on a subtotal, rounded half away from zero.
    ///
    /// # Errors
    ///
    /// Returns [`MoneyError::Overflow`] if the result does not fit.
    pub fn tax_for(&self, subtotal: u64) -> Result<u64, MoneyError> {
        percent_of_minor(Percentage::from(self.tax_rate), subtotal)
    }

    /// Price an order from its line totals.
    ///
    /// # Errors
    ///
    /// Returns [`MoneyError::Overflow`] if any sum overflows.
    pub fn totals(
        &self,
        line_totals: impl IntoIterator<Item = u64>,
    ) -> Result<OrderTotals, MoneyError> {
        let subtotal = sum_minor(line_totals)?;
        let tax_amount = self.tax_for(subtotal)?;
        let shipping_cost = self.shipping_for(subtotal);

        Ok(OrderTotals {
            subtotal,
            tax_amount,
            shipping_cost,
            total_amount: sum_minor([subtotal, tax_amount, shipping_cost])?,
        })
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[test]
    fn two_items_at_fifty_pay_tax_and_shipping() -> TestResult {
        let totals = CheckoutPolicy::default().totals([50_00 * 2])?;

        assert_eq!(
            totals,
            OrderTotals {
                subtotal: 100_00,
                tax_amount: 8_00,
                shipping_cost: 15_00,
                total_amount: 123_00,
            }
        );

        Ok(())
    }

    #[test]
    fn subtotal_just_over_threshold_ships_free() -> TestResult {
        let totals = CheckoutPolicy::default().totals([100_01])?;

        assert_eq!(totals.shipping_cost, 0);
        assert_eq!(totals.tax_amount, 8_00);
        assert_eq!(totals.total_amount, 108_01);

        Ok(())
    }

    #[test]
    fn subtotal_is_sum_of_line_totals() -> TestResult {
        let totals = CheckoutPolicy::default().totals([10_00, 20_00, 5_50])?;

        assert_eq!(totals.subtotal, 35_50);
        assert_eq!(totals.tax_amount, 2_84);
        assert_eq!(totals.shipping_cost, 15_00);
        assert_eq!(totals.total_amount, 53_34);

        Ok(())
    }

    #[test]
    fn custom_policy_is_respected() -> TestResult {
        let policy = CheckoutPolicy {
            tax_rate: Decimal::new(20, 2),
            free_shipping_over: 50_00,
            flat_shipping: 4_99,
        };

        let totals = policy.totals([25_00])?;

        assert_eq!(totals.tax_amount, 5_00);
        assert_eq!(totals.shipping_cost, 4_99);
        assert_eq!(totals.total_amount, 34_99);

        Ok(())
    }

    #[test]
    fn overflowing_subtotal_is_an_error() {
        let result = CheckoutPolicy::default().totals([u64::MAX, 1]);

        assert_eq!(result, Err(MoneyError::Overflow));
    }
}
