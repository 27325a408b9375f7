//! Carts service errors.

use sqlx::{
    Error,
    error::{DatabaseError, ErrorKind},
};
use storefront::{cart::QuantityError, money::MoneyError};
use thiserror::Error;

use crate::domain::products::models::ProductUuid;

#[derive(Debug, Error)]
pub enum CartsServiceError {
    #[error("cart not found")]
    CartNotFound,

    #[error("cart item not found")]
    ItemNotFound,

    #[error("product {0} is not available")]
    ProductUnavailable(ProductUuid),

    #[error("insufficient stock for product {product}: {available} available")]
    InsufficientStock { product: ProductUuid, available: u64 },

    #[error("invalid quantity")]
    InvalidQuantity(#[from] QuantityError),

    #[error("related resource not found")]
    InvalidReference,

    #[error("missing required data")]
    MissingRequiredData,

    #[error("invalid data")]
    InvalidData,

    #[error("cart totals overflowed")]
    Overflow(#[from] MoneyError),

    #[error("storage error")]
    Sql(#[source] Error),
}

impl From<Error> for CartsServiceError {
    fn from(error: Error) -> Self {
        if matches!(error, Error::RowNotFound) {
            return Self::CartNotFound;
        }

        match error.as_database_error().map(DatabaseError::kind) {
            Some(ErrorKind::ForeignKeyViolation) => Self::InvalidReference,
            Some(ErrorKind::NotNullViolation) => Self::MissingRequiredData,
            Some(ErrorKind::CheckViolation) => Self::InvalidData,
            Some(ErrorKind::Other | _) | None => Self::Sql(error),
        }
    }
}
