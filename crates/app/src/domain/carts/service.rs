//! Carts service.

use async_trait::async_trait;
use mockall::automock;
use sqlx::{Postgres, Transaction};
use storefront::{
    cart::{self, CartSummary},
    inventory::StockError,
};
use tracing::debug;

use crate::{
    database::Db,
    domain::{
        carts::{
            errors::CartsServiceError,
            models::{Cart, CartItemUuid, NewCartItem},
            repositories::{PgCartItemsRepository, PgCartsRepository},
        },
        products::{
            models::{Product, ProductUuid},
            repository::PgProductsRepository,
        },
        users::models::UserUuid,
    },
};

#[derive(Debug, Clone)]
pub struct PgCartsService {
    db: Db,
    carts_repository: PgCartsRepository,
    items_repository: PgCartItemsRepository,
    products_repository: PgProductsRepository,
}

impl PgCartsService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            carts_repository: PgCartsRepository::new(),
            items_repository: PgCartItemsRepository::new(),
            products_repository: PgProductsRepository::new(),
        }
    }

    /// Load a purchasable product, or report it unavailable.
    async fn purchasable_product(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        product: ProductUuid,
    ) -> Result<Product, CartsServiceError> {
        match self.products_repository.get_product(tx, product).await {
            Ok(found) if found.is_purchasable() => Ok(found),
            Ok(_) | Err(sqlx::Error::RowNotFound) => {
                Err(CartsServiceError::ProductUnavailable(product))
            }
            Err(error) => Err(error.into()),
        }
    }

    /// Reload lines, recompute totals from them and persist the result.
    async fn refresh(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        cart: &Cart,
    ) -> Result<Cart, CartsServiceError> {
        let items = self.items_repository.get_cart_items(tx, cart.uuid).await?;
        let totals = cart::totals(&items)?;

        let mut refreshed = self
            .carts_repository
            .update_totals(tx, cart.uuid, totals)
            .await?;

        refreshed.items = items;

        Ok(refreshed)
    }
}

fn stock_error(product: ProductUuid, error: StockError) -> CartsServiceError {
    match error {
        StockError::Insufficient { available } => {
            CartsServiceError::InsufficientStock { product, available }
        }
    }
}

#[async_trait]
impl CartsService for PgCartsService {
    async fn get_cart(&self, user: UserUuid) -> Result<Cart, CartsServiceError> {
        let mut tx = self.db.begin().await?;

        let cart = self.carts_repository.upsert_cart(&mut tx, user).await?;

        let dropped = self
            .items_repository
            .delete_unavailable_items(&mut tx, cart.uuid)
            .await?;

        if dropped > 0 {
            debug!(%user, dropped, "removed unavailable cart lines");
        }

        let cart = self.refresh(&mut tx, &cart).await?;

        tx.commit().await?;

        Ok(cart)
    }

    async fn add_item(&self, user: UserUuid, item: NewCartItem) -> Result<Cart, CartsServiceError> {
        cart::validate_quantity(item.quantity)?;

        let mut tx = self.db.begin().await?;

        let cart = self.carts_repository.upsert_cart(&mut tx, user).await?;
        let product = self.purchasable_product(&mut tx, item.product_uuid).await?;

        let lines = self
            .items_repository
            .get_cart_items(&mut tx, cart.uuid)
            .await?;

        match cart::find_line(&lines, &item.product_uuid, &item.variants) {
            Some(existing) => {
                let quantity = cart::merged_quantity(existing.quantity, item.quantity)?;

                product
                    .stock
                    .check(quantity)
                    .map_err(|error| stock_error(product.uuid, error))?;

                self.items_repository
                    .update_cart_item(&mut tx, cart.uuid, existing.uuid, quantity, product.price)
                    .await?;
            }
            None => {
                product
                    .stock
                    .check(item.quantity)
                    .map_err(|error| stock_error(product.uuid, error))?;

                self.items_repository
                    .create_cart_item(&mut tx, cart.uuid, &item, product.price)
                    .await?;
            }
        }

        let cart = self.refresh(&mut tx, &cart).await?;

        tx.commit().await?;

        Ok(cart)
    }

    async fn update_item(
        &self,
        user: UserUuid,
        item: CartItemUuid,
        quantity: u32,
    ) -> Result<Cart, CartsServiceError> {
        cart::validate_quantity(quantity)?;

        let mut tx = self.db.begin().await?;

        let cart = self.carts_repository.upsert_cart(&mut tx, user).await?;

        let line = match self
            .items_repository
            .get_cart_item(&mut tx, cart.uuid, item)
            .await
        {
            Ok(line) => line,
            Err(sqlx::Error::RowNotFound) => return Err(CartsServiceError::ItemNotFound),
            Err(error) => return Err(error.into()),
        };

        let product = self.purchasable_product(&mut tx, line.product_uuid).await?;

        product
            .stock
            .check(quantity)
            .map_err(|error| stock_error(product.uuid, error))?;

        self.items_repository
            .update_cart_item(&mut tx, cart.uuid, item, quantity, product.price)
            .await?;

        let cart = self.refresh(&mut tx, &cart).await?;

        tx.commit().await?;

        Ok(cart)
    }

    async fn remove_item(
        &self,
        user: UserUuid,
        item: CartItemUuid,
    ) -> Result<Cart, CartsServiceError> {
        let mut tx = self.db.begin().await?;

        let cart = self.carts_repository.upsert_cart(&mut tx, user).await?;

        let rows_affected = self
            .items_repository
            .delete_cart_item(&mut tx, cart.uuid, item)
            .await?;

        if rows_affected == 0 {
            return Err(CartsServiceError::ItemNotFound);
        }

        let cart = self.refresh(&mut tx, &cart).await?;

        tx.commit().await?;

        Ok(cart)
    }

    async fn clear_cart(&self, user: UserUuid) -> Result<Cart, CartsServiceError> {
        let mut tx = self.db.begin().await?;

        let cart = self.carts_repository.upsert_cart(&mut tx, user).await?;

        self.items_repository
            .delete_cart_items(&mut tx, cart.uuid)
            .await?;

        let cart = self.refresh(&mut tx, &cart).await?;

        tx.commit().await?;

        Ok(cart)
    }

    async fn cart_summary(&self, user: UserUuid) -> Result<CartSummary, CartsServiceError> {
        let cart = self.get_cart(user).await?;

        Ok(cart::summary(&cart.items)?)
    }
}

#[automock]
#[async_trait]
pub trait CartsService: Send + Sync {
    /// Retrieve the user's cart, creating it on first access and dropping
    /// lines whose product is no longer purchasable.
    async fn get_cart(&self, user: UserUuid) -> Result<Cart, CartsServiceError>;

    /// Add units of a product. A line with the same product and variants is
    /// merged rather than duplicated.
    async fn add_item(&self, user: UserUuid, item: NewCartItem) -> Result<Cart, CartsServiceError>;

    /// Set the absolute quantity of a line.
    async fn update_item(
        &self,
        user: UserUuid,
        item: CartItemUuid,
        quantity: u32,
    ) -> Result<Cart, CartsServiceError>;

    /// Remove a line.
    async fn remove_item(
        &self,
        user: UserUuid,
        item: CartItemUuid,
    ) -> Result<Cart, CartsServiceError>;

    /// Remove every line.
    async fn clear_cart(&self, user: UserUuid) -> Result<Cart, CartsServiceError>;

    /// Totals and line count of the user's cart.
    async fn cart_summary(&self, user: UserUuid) -> Result<CartSummary, CartsServiceError>;
}
