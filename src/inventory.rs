//! Inventory
//!
//! Stock policy for a single product: whether a requested quantity can be
//! taken, and how the remaining level is reported to shoppers.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default quantity at or below which a product is reported as low on stock.
pub const DEFAULT_LOW_STOCK_THRESHOLD: i64 = 10;

/// Errors raised when checking stock.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum StockError {
    /// Fewer units are on hand than were requested.
    #[error("insufficient stock: {available} available")]
    Insufficient {
        /// Units on hand at the time of the check.
        available: u64,
    },
}

/// Stock level as shown to shoppers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StockStatus {
    /// Plenty on hand, or stock is not tracked.
    InStock,

    /// At or below the low-stock threshold.
    LowStock,

    /// Nothing on hand.
    OutOfStock,
}

impl StockStatus {
    /// Wire name.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::InStock => "in_stock",
            Self::LowStock => "low_stock",
            Self::OutOfStock => "out_of_stock",
        }
    }
}

/// A product's inventory settings and current quantity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Stock {
    /// Units on hand. May be negative when backorders are allowed.
    pub quantity: i64,

    /// Whether quantity is enforced at all.
    pub track_quantity: bool,

    /// Whether a tracked product may be sold past zero.
    pub allow_backorder: bool,

    /// Low-stock reporting threshold.
    pub low_stock_threshold: i64,
}

impl Stock {
    /// Units that can be reported as available (never negative).
    pub fn available(&self) -> u64 {
        self.quantity.max(0).unsigned_abs()
    }

    /// Whether `requested` units may be taken.
    ///
    /// # Errors
    ///
    /// Returns [`StockError::Insufficient`] when quantity is tracked, backorders
    /// are not allowed and fewer than `requested` units are on hand.
    pub fn check(&self, requested: u32) -> Result<(), StockError> {
        if !self.track_quantity || self.allow_backorder {
            return Ok(());
        }

        if i64::from(requested) > self.quantity {
            return Err(StockError::Insufficient {
                available: self.available(),
            });
        }

        Ok(())
    }

    /// Reported stock level.
    pub fn status(&self) -> StockStatus {
        if !self.track_quantity {
            StockStatus::InStock
        } else if self.quantity <= 0 {
            StockStatus::OutOfStock
        } else if self.quantity <= self.low_stock_threshold {
            StockStatus::LowStock
        } else {
            StockStatus::InStock
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tracked(quantity: i64) -> Stock {
        Stock {
            quantity,
            track_quantity: true,
            allow_backorder: false,
            low_stock_threshold: DEFAULT_LOW_STOCK_THRESHOLD,
        }
    }

    #[test]
    fn check_allows_up_to_quantity_on_hand() {
        assert_eq!(tracked(2).check(2), Ok(()));
        assert_eq!(tracked(2).check(1), Ok(()));
    }

    #[test]
    fn check_rejects_more_than_on_hand() {
        assert_eq!(
            tracked(1).check(2),
            Err(StockError::Insufficient { available: 1 })
        );
    }

    #[test]
    fn check_reports_zero_available_when_sold_out() {
        assert_eq!(
            tracked(0).check(1),
            Err(StockError::Insufficient { available: 0 })
        );
    }

    #[test]
    fn untracked_stock_always_passes() {
        let stock = Stock {
            track_quantity: false,
            ..tracked(0)
        };

        assert_eq!(stock.check(1_000), Ok(()));
    }

    #[test]
    fn backorders_pass_past_zero() {
        let stock = Stock {
            allow_backorder: true,
            ..tracked(1)
        };

        assert_eq!(stock.check(5), Ok(()));
    }

    #[test]
    fn negative_quantity_is_reported_as_zero_available() {
        assert_eq!(tracked(-3).available(), 0);
    }

    #[test]
    fn status_reflects_threshold() {
        assert_eq!(tracked(11).status(), StockStatus::InStock);
        assert_eq!(tracked(10).status(), StockStatus::LowStock);
        assert_eq!(tracked(1).status(), StockStatus::LowStock);
        assert_eq!(tracked(0).status(), StockStatus::OutOfStock);
        assert_eq!(tracked(-1).status(), StockStatus::OutOfStock);
    }

    #[test]
    fn untracked_status_is_in_stock() {
        let stock = Stock {
            track_quantity: false,
            ..tracked(0)
        };

        assert_eq!(stock.status(), StockStatus::InStock);
    }
}
