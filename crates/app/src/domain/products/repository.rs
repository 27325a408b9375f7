//! Products Repository

use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query_as};
use storefront::inventory::Stock;

use crate::{
    database::try_get_amount,
    domain::products::models::{NewProduct, Product, ProductStatus, ProductUuid},
};

const LIST_PRODUCTS_SQL: &str = include_str!("sql/list_products.sql");
const GET_PRODUCT_SQL: &str = include_str!("sql/get_product.sql");
const CREATE_PRODUCT_SQL: &str = include_str!("sql/create_product.sql");
const UPDATE_PRODUCT_SQL: &str = include_str!("sql/update_product.sql");
const RESTOCK_PRODUCT_SQL: &str = include_str!("sql/restock_product.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgProductsRepository;

impl PgProductsRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn list_products(
        &self,
        tx: &mut Transaction<'_, Postgres>,
    ) -> Result<Vec<Product>, sqlx::Error> {
        query_as::<Postgres, Product>(LIST_PRODUCTS_SQL)
            .fetch_all(&mut **tx)
            .await
    }

    pub(crate) async fn get_product(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        product: ProductUuid,
    ) -> Result<Product, sqlx::Error> {
        query_as::<Postgres, Product>(GET_PRODUCT_SQL)
            .bind(product.into_uuid())
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn create_product(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        product: &NewProduct,
        price: i64,
    ) -> Result<Product, sqlx::Error> {
        query_as::<Postgres, Product>(CREATE_PRODUCT_SQL)
            .bind(product.uuid.into_uuid())
            .bind(product.name.trim())
            .bind(product.sku.trim())
            .bind(product.image_url.as_deref())
            .bind(price)
            .bind(product.status.as_str())
            .bind(product.stock.quantity)
            .bind(product.stock.track_quantity)
            .bind(product.stock.allow_backorder)
            .bind(product.stock.low_stock_threshold)
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn update_product(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        product: ProductUuid,
        price: Option<i64>,
        status: Option<ProductStatus>,
    ) -> Result<Product, sqlx::Error> {
        query_as::<Postgres, Product>(UPDATE_PRODUCT_SQL)
            .bind(product.into_uuid())
            .bind(price)
            .bind(status.map(ProductStatus::as_str))
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn restock_product(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        product: ProductUuid,
        delta: i64,
    ) -> Result<Product, sqlx::Error> {
        query_as::<Postgres, Product>(RESTOCK_PRODUCT_SQL)
            .bind(product.into_uuid())
            .bind(delta)
            .fetch_one(&mut **tx)
            .await
    }
}

impl<'r> FromRow<'r, PgRow> for Product {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        let status: String = row.try_get("status")?;

        Ok(Self {
            uuid: ProductUuid::from_uuid(row.try_get("uuid")?),
            name: row.try_get("name")?,
            sku: row.try_get("sku")?,
            image_url: row.try_get("image_url")?,
            price: try_get_amount(row, "price")?,
            status: status.parse().map_err(|e| sqlx::Error::ColumnDecode {
                index: "status".to_string(),
                source: Box::new(e),
            })?,
            stock: Stock {
                quantity: row.try_get("inventory_quantity")?,
                track_quantity: row.try_get("track_quantity")?,
                allow_backorder: row.try_get("allow_backorder")?,
                low_stock_threshold: row.try_get("low_stock_threshold")?,
            },
            sales_count: try_get_amount(row, "sales_count")?,
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
        })
    }
}
