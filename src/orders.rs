//! Orders
//!
//! Order, payment and payment-method vocabularies plus the lifecycle rules
//! that decide which transitions are permitted and which ones hand stock back.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised by the order lifecycle rules.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TransitionError {
    /// The status string is not one of the known statuses.
    #[error("unknown order status: {0}")]
    UnknownStatus(String),

    /// The payment method string is not one of the known methods.
    #[error("unknown payment method: {0}")]
    UnknownPaymentMethod(String),

    /// The payment status string is not one of the known statuses.
    #[error("unknown payment status: {0}")]
    UnknownPaymentStatus(String),

    /// The order cannot be cancelled from its current status.
    #[error("order cannot be cancelled once {0}")]
    NotCancellable(OrderStatus),
}

/// Order lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    /// Awaiting payment confirmation.
    Pending,
    /// Payment confirmed.
    Confirmed,
    /// Being prepared for dispatch.
    Processing,
    /// Handed to the carrier.
    Shipped,
    /// Received by the customer.
    Delivered,
    /// Cancelled by the owner or an administrator.
    Cancelled,
    /// Returned after delivery.
    Returned,
}

impl OrderStatus {
    /// Every status, in lifecycle order.
    pub const ALL: [Self; 7] = [
        Self::Pending,
        Self::Confirmed,
        Self::Processing,
        Self::Shipped,
        Self::Delivered,
        Self::Cancelled,
        Self::Returned,
    ];

    /// Wire name.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Confirmed => "confirmed",
            Self::Processing => "processing",
            Self::Shipped => "shipped",
            Self::Delivered => "delivered",
            Self::Cancelled => "cancelled",
            Self::Returned => "returned",
        }
    }

    /// Whether no further lifecycle progress is expected.
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Delivered | Self::Cancelled | Self::Returned)
    }

    /// Whether an order in this status keeps its lines reserved.
    pub const fn holds_stock(self) -> bool {
        !matches!(self, Self::Cancelled)
    }

    /// Whether the order owner may still cancel.
    pub const fn is_owner_cancellable(self) -> bool {
        !matches!(
            self,
            Self::Shipped | Self::Delivered | Self::Cancelled | Self::Returned
        )
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = TransitionError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == value)
            .ok_or_else(|| TransitionError::UnknownStatus(value.to_string()))
    }
}

/// Payment status of an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    /// No outcome yet.
    Pending,
    /// Payment received.
    Paid,
    /// Payment attempt failed.
    Failed,
}

impl PaymentStatus {
    /// Wire name.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Paid => "paid",
            Self::Failed => "failed",
        }
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PaymentStatus {
    type Err = TransitionError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "pending" => Ok(Self::Pending),
            "paid" => Ok(Self::Paid),
            "failed" => Ok(Self::Failed),
            _ => Err(TransitionError::UnknownPaymentStatus(value.to_string())),
        }
    }
}

/// How the customer intends to pay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    CreditCard,
    DebitCard,
    Paypal,
    Stripe,
    CashOnDelivery,
}

impl PaymentMethod {
    /// Wire name.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::CreditCard => "credit_card",
            Self::DebitCard => "debit_card",
            Self::Paypal => "paypal",
            Self::Stripe => "stripe",
            Self::CashOnDelivery => "cash_on_delivery",
        }
    }

    /// Status and payment status a newly placed order starts in.
    ///
    /// Cash on delivery goes straight to `processing`; every other method
    /// waits in `pending` for a payment callback.
    pub const fn initial_state(self) -> (OrderStatus, PaymentStatus) {
        match self {
            Self::CashOnDelivery => (OrderStatus::Processing, PaymentStatus::Pending),
            Self::CreditCard | Self::DebitCard | Self::Paypal | Self::Stripe => {
                (OrderStatus::Pending, PaymentStatus::Pending)
            }
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PaymentMethod {
    type Err = TransitionError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "credit_card" => Ok(Self::CreditCard),
            "debit_card" => Ok(Self::DebitCard),
            "paypal" => Ok(Self::Paypal),
            "stripe" => Ok(Self::Stripe),
            "cash_on_delivery" => Ok(Self::CashOnDelivery),
            _ => Err(TransitionError::UnknownPaymentMethod(value.to_string())),
        }
    }
}

/// Outcome reported by the payment collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentOutcome {
    Succeeded,
    Failed,
}

impl PaymentOutcome {
    /// New `(status, payment status)` after applying this outcome.
    ///
    /// A successful payment confirms an order that is still in progress. An
    /// order that is already delivered, cancelled or returned keeps its status
    /// and is only marked paid. A failed payment leaves the status untouched.
    pub const fn apply(self, current: OrderStatus) -> (OrderStatus, PaymentStatus) {
        match self {
            Self::Succeeded if current.is_terminal() => (current, PaymentStatus::Paid),
            Self::Succeeded => (OrderStatus::Confirmed, PaymentStatus::Paid),
            Self::Failed => (current, PaymentStatus::Failed),
        }
    }
}

/// Check that the owner may cancel an order in `current`.
///
/// # Errors
///
/// Returns [`TransitionError::NotCancellable`] once the order has shipped or
/// reached a terminal status.
pub fn owner_cancel(current: OrderStatus) -> Result<(), TransitionError> {
    if current.is_owner_cancellable() {
        Ok(())
    } else {
        Err(TransitionError::NotCancellable(current))
    }
}

/// What a status change does to the stock an order holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StockMovement {
    /// Take the order's lines off the shelf again.
    Reserve,
    /// Hand the order's lines back.
    Release,
    /// Stock is untouched.
    None,
}

impl StockMovement {
    /// Movement needed when an order goes from `from` to `to`.
    ///
    /// Stock moves only when the order starts or stops holding it, so every
    /// release is paired with exactly one earlier reservation.
    pub const fn between(from: OrderStatus, to: OrderStatus) -> Self {
        match (from.holds_stock(), to.holds_stock()) {
            (true, false) => Self::Release,
            (false, true) => Self::Reserve,
            (true, true) | (false, false) => Self::None,
        }
    }
}

/// Human-readable order number: `ORD-<unix millis>-<6 hex>`.
pub fn order_number(unix_millis: i64, entropy: u32) -> String {
    format!("ORD-{unix_millis}-{:06X}", entropy & 0x00FF_FFFF)
}
