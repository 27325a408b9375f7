//! Inventory ledger errors.

use sqlx::Error;
use thiserror::Error;

use crate::domain::products::models::ProductUuid;

#[derive(Debug, Error)]
pub enum InventoryError {
    #[error("product {0} not found")]
    ProductNotFound(ProductUuid),

    #[error("insufficient stock for product {product}: {available} available")]
    InsufficientStock { product: ProductUuid, available: u64 },

    #[error("invalid quantity")]
    InvalidQuantity,

    #[error("storage error")]
    Sql(#[source] Error),
}

impl From<Error> for InventoryError {
    fn from(error: Error) -> Self {
        Self::Sql(error)
    }
}
