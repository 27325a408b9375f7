//! Order Items Repository

use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query_as, types::Json};
use storefront::variants::Variant;
use uuid::Uuid;

use crate::{
    database::{amount_to_bigint, quantity_to_integer, try_get_amount, try_get_quantity},
    domain::{
        orders::models::{OrderItem, OrderItemUuid, OrderUuid},
        products::models::ProductUuid,
    },
};

const CREATE_ORDER_ITEM_SQL: &str = include_str!("../sql/create_order_item.sql");
const GET_ORDER_ITEMS_SQL: &str = include_str!("../sql/get_order_items.sql");

/// An order item together with the order it belongs to.
#[derive(Debug, Clone)]
pub(crate) struct OrderItemRow {
    pub order: OrderUuid,
    pub item: OrderItem,
}

#[derive(Debug, Clone, Default)]
pub(crate) struct PgOrderItemsRepository;

impl PgOrderItemsRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn create_order_items(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: OrderUuid,
        items: &[OrderItem],
    ) -> Result<Vec<OrderItem>, sqlx::Error> {
        let mut created = Vec::with_capacity(items.len());

        for (position, item) in items.iter().enumerate() {
            let position = i32::try_from(position).map_err(|e| sqlx::Error::ColumnDecode {
                index: "position".to_string(),
                source: Box::new(e),
            })?;

            let row = query_as::<Postgres, OrderItemRow>(CREATE_ORDER_ITEM_SQL)
                .bind(item.uuid.into_uuid())
                .bind(order.into_uuid())
                .bind(position)
                .bind(item.product_uuid.into_uuid())
                .bind(&item.product_name)
                .bind(item.product_image.as_deref())
                .bind(&item.sku)
                .bind(quantity_to_integer(item.quantity, "quantity")?)
                .bind(Json(&item.variants))
                .bind(amount_to_bigint(item.unit_price, "unit_price")?)
                .bind(amount_to_bigint(item.line_total, "line_total")?)
                .fetch_one(&mut **tx)
                .await?;

            created.push(row.item);
        }

        Ok(created)
    }

    /// Items of every given order, grouped by order and in placement order.
    pub(crate) async fn get_order_items(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        orders: &[Uuid],
    ) -> Result<Vec<OrderItemRow>, sqlx::Error> {
        query_as::<Postgres, OrderItemRow>(GET_ORDER_ITEMS_SQL)
            .bind(orders)
            .fetch_all(&mut **tx)
            .await
    }
}

impl<'r> FromRow<'r, PgRow> for OrderItemRow {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            order: OrderUuid::from_uuid(row.try_get("order_uuid")?),
            item: OrderItem {
                uuid: OrderItemUuid::from_uuid(row.try_get("uuid")?),
                product_uuid: ProductUuid::from_uuid(row.try_get("product_uuid")?),
                product_name: row.try_get("product_name")?,
                product_image: row.try_get("product_image")?,
                sku: row.try_get("sku")?,
                quantity: try_get_quantity(row, "quantity")?,
                variants: row.try_get::<Json<Vec<Variant>>, _>("variants")?.0,
                unit_price: try_get_amount(row, "unit_price")?,
                line_total: try_get_amount(row, "line_total")?,
            },
        })
    }
}
