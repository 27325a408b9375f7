//! Cart
//!
//! Pure cart rules. Totals are always derived from the current lines; there
//! is no way to set them independently.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    money::{MoneyError, line_total, sum_minor},
    variants::{Variant, VariantKey},
};

/// Errors raised by cart quantity rules.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum QuantityError {
    /// Quantity must be at least one.
    #[error("quantity must be at least 1")]
    BelowMinimum,

    /// Quantity is too large to represent.
    #[error("quantity overflowed")]
    Overflow,
}

/// A priced line in a cart.
pub trait CartLine {
    /// Product identifier type.
    type Product: PartialEq;

    /// Product this line refers to.
    fn product(&self) -> &Self::Product;

    /// Variant options as chosen by the shopper.
    fn variants(&self) -> &[Variant];

    /// Price snapshot per unit, in minor units.
    fn unit_price(&self) -> u64;

    /// Units on this line.
    fn quantity(&self) -> u32;
}

/// Derived cart totals.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartTotals {
    /// Sum of line quantities.
    pub total_items: u64,

    /// Sum of `unit_price * quantity`, in minor units.
    pub total_amount: u64,
}

/// Cart summary as exposed to shoppers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartSummary {
    /// Sum of line quantities.
    pub total_items: u64,

    /// Sum of `unit_price * quantity`, in minor units.
    pub total_amount: u64,

    /// Number of distinct lines.
    pub item_count: u64,
}

/// Recompute totals from the given lines.
///
/// # Errors
///
/// Returns [`MoneyError::Overflow`] if any sum overflows.
pub fn totals<L: CartLine>(lines: &[L]) -> Result<CartTotals, MoneyError> {
    let total_items = sum_minor(lines.iter().map(|line| u64::from(line.quantity())))?;

    let line_totals = lines
        .iter()
        .map(|line| line_total(line.unit_price(), line.quantity()))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(CartTotals {
        total_items,
        total_amount: sum_minor(line_totals)?,
    })
}

/// Summarise the given lines.
///
/// # Errors
///
/// Returns [`MoneyError::Overflow`] if any sum overflows.
pub fn summary<L: CartLine>(lines: &[L]) -> Result<CartSummary, MoneyError> {
    let CartTotals {
        total_items,
        total_amount,
    } = totals(lines)?;

    Ok(CartSummary {
        total_items,
        total_amount,
        item_count: u64::try_from(lines.len()).map_err(|_overflow| MoneyError::Overflow)?,
    })
}

/// Find the line sharing identity with `(product, variants)`.
pub fn find_line<'a, L: CartLine>(
    lines: &'a [L],
    product: &L::Product,
    variants: &[Variant],
) -> Option<&'a L> {
    let key = VariantKey::new(variants);

    lines
        .iter()
        .find(|line| line.product() == product && VariantKey::new(line.variants()) == key)
}

/// Validate a requested line quantity.
///
/// # Errors
///
/// Returns [`QuantityError::BelowMinimum`] for zero.
pub const fn validate_quantity(quantity: u32) -> Result<u32, QuantityError> {
    if quantity == 0 {
        return Err(QuantityError::BelowMinimum);
    }

    Ok(quantity)
}

/// Quantity after adding `requested` units to an existing line.
///
/// # Errors
///
/// Returns [`QuantityError::Overflow`] if the sum does not fit.
pub fn merged_quantity(existing: u32, requested: u32) -> Result<u32, QuantityError> {
    existing
        .checked_add(requested)
        .ok_or(QuantityError::Overflow)
}
