//! Inventory Repository

use sqlx::{Postgres, Transaction, query_scalar};

use crate::domain::{inventory::errors::InventoryError, products::models::ProductUuid};

const RESERVE_STOCK_SQL: &str = include_str!("sql/reserve_stock.sql");
const RELEASE_STOCK_SQL: &str = include_str!("sql/release_stock.sql");
const RECORD_SALE_SQL: &str = include_str!("sql/record_sale.sql");
const STOCK_LEVEL_SQL: &str = include_str!("sql/stock_level.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgInventoryRepository;

impl PgInventoryRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    /// Take `quantity` units, failing when a tracked, non-backorderable product
    /// has fewer on hand. Returns the remaining quantity.
    pub(crate) async fn reserve(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        product: ProductUuid,
        quantity: u32,
    ) -> Result<i64, InventoryError> {
        let remaining: Option<i64> = query_scalar(RESERVE_STOCK_SQL)
            .bind(product.into_uuid())
            .bind(i64::from(quantity))
            .fetch_optional(&mut **tx)
            .await?;

        if let Some(remaining) = remaining {
            return Ok(remaining);
        }

        // Nothing updated: either the product is gone or the guard failed.
        let level: Option<i64> = query_scalar(STOCK_LEVEL_SQL)
            .bind(product.into_uuid())
            .fetch_optional(&mut **tx)
            .await?;

        match level {
            Some(level) => Err(InventoryError::InsufficientStock {
                product,
                available: level.max(0).unsigned_abs(),
            }),
            None => Err(InventoryError::ProductNotFound(product)),
        }
    }

    /// Hand `quantity` units back. Returns the new quantity.
    pub(crate) async fn release(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        product: ProductUuid,
        quantity: u32,
    ) -> Result<i64, InventoryError> {
        query_scalar(RELEASE_STOCK_SQL)
            .bind(product.into_uuid())
            .bind(i64::from(quantity))
            .fetch_optional(&mut **tx)
            .await?
            .ok_or(InventoryError::ProductNotFound(product))
    }

    pub(crate) async fn record_sale(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        product: ProductUuid,
        quantity: u32,
    ) -> Result<i64, InventoryError> {
        query_scalar(RECORD_SALE_SQL)
            .bind(product.into_uuid())
            .bind(i64::from(quantity))
            .fetch_optional(&mut **tx)
            .await?
            .ok_or(InventoryError::ProductNotFound(product))
    }
}
