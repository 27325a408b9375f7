//! Inventory service.
//!
//! Standalone ledger operations, each in its own transaction. Order placement
//! and cancellation use the repository directly so the stock movement commits
//! or rolls back with the order.

use async_trait::async_trait;
use mockall::automock;
use tracing::info;

use crate::{
    database::Db,
    domain::{
        inventory::{errors::InventoryError, repository::PgInventoryRepository},
        products::models::ProductUuid,
    },
};

#[derive(Debug, Clone)]
pub struct PgInventoryService {
    db: Db,
    repository: PgInventoryRepository,
}

impl PgInventoryService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            repository: PgInventoryRepository::new(),
        }
    }
}

#[async_trait]
impl InventoryService for PgInventoryService {
    async fn reserve(&self, product: ProductUuid, quantity: u32) -> Result<i64, InventoryError> {
        if quantity == 0 {
            return Err(InventoryError::InvalidQuantity);
        }

        let mut tx = self.db.begin().await?;

        let remaining = self.repository.reserve(&mut tx, product, quantity).await?;

        tx.commit().await?;

        info!(%product, quantity, remaining, "reserved stock");

        Ok(remaining)
    }

    async fn release(&self, product: ProductUuid, quantity: u32) -> Result<i64, InventoryError> {
        if quantity == 0 {
            return Err(InventoryError::InvalidQuantity);
        }

        let mut tx = self.db.begin().await?;

        let remaining = self.repository.release(&mut tx, product, quantity).await?;

        tx.commit().await?;

        info!(%product, quantity, remaining, "released stock");

        Ok(remaining)
    }

    async fn record_sale(&self, product: ProductUuid, quantity: u32) -> Result<(), InventoryError> {
        if quantity == 0 {
            return Err(InventoryError::InvalidQuantity);
        }

        let mut tx = self.db.begin().await?;

        self.repository
            .record_sale(&mut tx, product, quantity)
            .await?;

        tx.commit().await?;

        Ok(())
    }
}

#[automock]
#[async_trait]
pub trait InventoryService: Send + Sync {
    /// Take `quantity` units of a product, returning what remains on hand.
    async fn reserve(&self, product: ProductUuid, quantity: u32) -> Result<i64, InventoryError>;

    /// Return `quantity` units of a product, returning the new level.
    async fn release(&self, product: ProductUuid, quantity: u32) -> Result<i64, InventoryError>;

    /// Count a sale without touching on-hand quantity.
    async fn record_sale(&self, product: ProductUuid, quantity: u32) -> Result<(), InventoryError>;
}
