//! Products service.

use async_trait::async_trait;
use mockall::automock;

use crate::{
    database::Db,
    domain::products::{
        errors::ProductsServiceError,
        models::{NewProduct, Product, ProductUpdate, ProductUuid},
        repository::PgProductsRepository,
    },
};

#[derive(Debug, Clone)]
pub struct PgProductsService {
    db: Db,
    repository: PgProductsRepository,
}

impl PgProductsService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            repository: PgProductsRepository::new(),
        }
    }
}

#[async_trait]
impl ProductsService for PgProductsService {
    async fn list_products(&self) -> Result<Vec<Product>, ProductsServiceError> {
        let mut tx = self.db.begin().await?;

        let products = self.repository.list_products(&mut tx).await?;

        tx.commit().await?;

        Ok(products)
    }

    async fn get_product(&self, product: ProductUuid) -> Result<Product, ProductsServiceError> {
        let mut tx = self.db.begin().await?;

        let product = self.repository.get_product(&mut tx, product).await?;

        tx.commit().await?;

        Ok(product)
    }

    async fn create_product(&self, product: NewProduct) -> Result<Product, ProductsServiceError> {
        if product.name.trim().is_empty() || product.sku.trim().is_empty() {
            return Err(ProductsServiceError::MissingField);
        }

        if product.stock.low_stock_threshold < 0 {
            return Err(ProductsServiceError::Rejected);
        }

        let price = i64::try_from(product.price)?;

        let mut tx = self.db.begin().await?;

        let created = self
            .repository
            .create_product(&mut tx, &product, price)
            .await?;

        tx.commit().await?;

        Ok(created)
    }

    async fn update_product(
        &self,
        product: ProductUuid,
        update: ProductUpdate,
    ) -> Result<Product, ProductsServiceError> {
        let price = update.price.map(i64::try_from).transpose()?;

        let mut tx = self.db.begin().await?;

        let updated = self
            .repository
            .update_product(&mut tx, product, price, update.status)
            .await?;

        tx.commit().await?;

        Ok(updated)
    }

    async fn restock_product(
        &self,
        product: ProductUuid,
        delta: i64,
    ) -> Result<Product, ProductsServiceError> {
        let mut tx = self.db.begin().await?;

        let restocked = self
            .repository
            .restock_product(&mut tx, product, delta)
            .await?;

        tx.commit().await?;

        Ok(restocked)
    }
}

#[automock]
#[async_trait]
pub trait ProductsService: Send + Sync {
    /// Retrieves all products.
    async fn list_products(&self) -> Result<Vec<Product>, ProductsServiceError>;

    /// Retrieve a single product.
    async fn get_product(&self, product: ProductUuid) -> Result<Product, ProductsServiceError>;

    /// Creates a new product.
    async fn create_product(&self, product: NewProduct) -> Result<Product, ProductsServiceError>;

    /// Changes a product's price and/or status.
    async fn update_product(
        &self,
        product: ProductUuid,
        update: ProductUpdate,
    ) -> Result<Product, ProductsServiceError>;

    /// Adjusts on-hand quantity by `delta` units. Negative deltas write stock off.
    async fn restock_product(
        &self,
        product: ProductUuid,
        delta: i64,
    ) -> Result<Product, ProductsServiceError>;
}

#[cfg(test)]
mod tests {
    use storefront::inventory::StockStatus;
    use testresult::TestResult;

    use crate::{
        domain::products::models::ProductStatus,
        test::{TestContext, helpers::new_product},
    };

    use super::*;

    #[tokio::test]
    async fn create_product_returns_stored_fields() -> TestResult {
        let ctx = TestContext::new().await;
        let new = new_product("SKU-1", 12_50, 20);

        let product = ctx.products.create_product(new.clone()).await?;

        assert_eq!(product.uuid, new.uuid);
        assert_eq!(product.price, 12_50);
        assert_eq!(product.stock.quantity, 20);
        assert_eq!(product.sales_count, 0);
        assert_eq!(product.status, ProductStatus::Active);
        assert_eq!(product.stock_status(), StockStatus::InStock);

        Ok(())
    }

    #[tokio::test]
    async fn duplicate_sku_returns_already_exists() -> TestResult {
        let ctx = TestContext::new().await;

        ctx.products
            .create_product(new_product("SKU-DUP", 1_00, 1))
            .await?;

        let result = ctx
            .products
            .create_product(new_product("SKU-DUP", 2_00, 1))
            .await;

        assert!(
            matches!(result, Err(ProductsServiceError::DuplicateSku)),
            "expected DuplicateSku, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn blank_sku_returns_missing_required_data() {
        let ctx = TestContext::new().await;

        let result = ctx.products.create_product(new_product(" ", 1_00, 1)).await;

        assert!(
            matches!(result, Err(ProductsServiceError::MissingField)),
            "expected MissingField, got {result:?}"
        );
    }

    #[tokio::test]
    async fn price_beyond_bigint_returns_invalid_price() {
        let ctx = TestContext::new().await;

        let result = ctx
            .products
            .create_product(new_product("SKU-HUGE", u64::MAX, 1))
            .await;

        assert!(
            matches!(result, Err(ProductsServiceError::InvalidPrice(_))),
            "expected InvalidPrice, got {result:?}"
        );
    }

    #[tokio::test]
    async fn update_product_changes_only_given_fields() -> TestResult {
        let ctx = TestContext::new().await;
        let product = ctx
            .products
            .create_product(new_product("SKU-UPD", 5_00, 3))
            .await?;

        let updated = ctx
            .products
            .update_product(
                product.uuid,
                ProductUpdate {
                    price: None,
                    status: Some(ProductStatus::Inactive),
                },
            )
            .await?;

        assert_eq!(updated.price, 5_00);
        assert_eq!(updated.status, ProductStatus::Inactive);
        assert!(!updated.is_purchasable());

        Ok(())
    }

    #[tokio::test]
    async fn restock_adds_to_quantity() -> TestResult {
        let ctx = TestContext::new().await;
        let product = ctx
            .products
            .create_product(new_product("SKU-RST", 5_00, 3))
            .await?;

        let restocked = ctx.products.restock_product(product.uuid, 7).await?;

        assert_eq!(restocked.stock.quantity, 10);
        assert_eq!(restocked.stock_status(), StockStatus::LowStock);

        Ok(())
    }

    #[tokio::test]
    async fn unknown_product_returns_not_found() {
        let ctx = TestContext::new().await;

        let result = ctx.products.get_product(ProductUuid::new()).await;

        assert!(
            matches!(result, Err(ProductsServiceError::NotFound)),
            "expected NotFound, got {result:?}"
        );
    }

    #[tokio::test]
    async fn list_products_returns_in_creation_order() -> TestResult {
        let ctx = TestContext::new().await;

        let first = ctx
            .products
            .create_product(new_product("SKU-A", 1_00, 1))
            .await?;
        let second = ctx
            .products
            .create_product(new_product("SKU-B", 2_00, 1))
            .await?;

        let products = ctx.products.list_products().await?;
        let uuids: Vec<_> = products.iter().map(|product| product.uuid).collect();

        assert_eq!(uuids, vec![first.uuid, second.uuid]);

        Ok(())
    }
}
