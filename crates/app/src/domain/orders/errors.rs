//! Orders service errors.

use sqlx::{
    Error,
    error::{DatabaseError, ErrorKind},
};
use storefront::{address::AddressError, money::MoneyError, orders::TransitionError};
use thiserror::Error;

use crate::domain::{inventory::InventoryError, products::models::ProductUuid};

#[derive(Debug, Error)]
pub enum OrdersServiceError {
    #[error("cart is empty")]
    EmptyCart,

    #[error("product {0} is not available")]
    ProductUnavailable(ProductUuid),

    #[error("insufficient stock for product {product}: {available} available")]
    InsufficientStock { product: ProductUuid, available: u64 },

    #[error("invalid address")]
    InvalidAddress(#[from] AddressError),

    #[error("order not found")]
    OrderNotFound,

    #[error("not permitted")]
    Unauthorized,

    #[error("invalid transition")]
    InvalidTransition(#[from] TransitionError),

    #[error("order already exists")]
    AlreadyExists,

    #[error("related resource not found")]
    InvalidReference,

    #[error("missing required data")]
    MissingRequiredData,

    #[error("invalid data")]
    InvalidData,

    #[error("order totals overflowed")]
    Overflow(#[from] MoneyError),

    #[error("storage error")]
    Sql(#[source] Error),
}

impl From<Error> for OrdersServiceError {
    fn from(error: Error) -> Self {
        if matches!(error, Error::RowNotFound) {
            return Self::OrderNotFound;
        }

        match error.as_database_error().map(DatabaseError::kind) {
            Some(ErrorKind::UniqueViolation) => Self::AlreadyExists,
            Some(ErrorKind::ForeignKeyViolation) => Self::InvalidReference,
            Some(ErrorKind::NotNullViolation) => Self::MissingRequiredData,
            Some(ErrorKind::CheckViolation) => Self::InvalidData,
            Some(ErrorKind::Other | _) | None => Self::Sql(error),
        }
    }
}

impl From<InventoryError> for OrdersServiceError {
    fn from(error: InventoryError) -> Self {
        match error {
            InventoryError::ProductNotFound(product) => Self::ProductUnavailable(product),
            InventoryError::InsufficientStock { product, available } => {
                Self::InsufficientStock { product, available }
            }
            InventoryError::InvalidQuantity => Self::InvalidData,
            InventoryError::Sql(error) => Self::from(error),
        }
    }
}
