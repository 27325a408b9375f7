//! Orders Repository

use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query_as, query_scalar, types::Json};
use storefront::{
    address::Address,
    checkout::OrderTotals,
    orders::{OrderStatus, PaymentMethod, PaymentStatus},
};
use uuid::Uuid;

use crate::{
    database::{amount_to_bigint, try_get_amount},
    domain::{
        orders::models::{Order, OrderFilter, OrderUuid},
        users::models::UserUuid,
    },
};

const CREATE_ORDER_SQL: &str = include_str!("../sql/create_order.sql");
const GET_ORDER_SQL: &str = include_str!("../sql/get_order.sql");
const LOCK_ORDER_SQL: &str = include_str!("../sql/lock_order.sql");
const UPDATE_ORDER_STATUS_SQL: &str = include_str!("../sql/update_order_status.sql");
const UPDATE_ORDER_PAYMENT_SQL: &str = include_str!("../sql/update_order_payment.sql");
const LIST_ORDERS_SQL: &str = include_str!("../sql/list_orders.sql");
const COUNT_ORDERS_SQL: &str = include_str!("../sql/count_orders.sql");

/// Header row of a newly placed order.
#[derive(Debug)]
pub(crate) struct NewOrder<'a> {
    pub uuid: OrderUuid,
    pub order_number: &'a str,
    pub user: UserUuid,
    pub totals: OrderTotals,
    pub shipping_address: &'a Address,
    pub billing_address: &'a Address,
    pub payment_method: PaymentMethod,
    pub payment_status: PaymentStatus,
    pub status: OrderStatus,
    pub customer_notes: Option<&'a str>,
}

/// Cancellation details stamped when an order enters `cancelled`.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Cancellation<'a> {
    pub reason: Option<&'a str>,
    pub by: UserUuid,
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct StatusChange<'a> {
    pub status: OrderStatus,
    pub tracking_number: Option<&'a str>,
    pub cancellation: Option<Cancellation<'a>>,
    pub delivered: bool,
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct OrderQuery<'a> {
    pub user: Option<UserUuid>,
    pub filter: &'a OrderFilter,
    pub limit: u32,
    pub offset: u64,
}

#[derive(Debug, Clone, Default)]
pub(crate) struct PgOrdersRepository;

impl PgOrdersRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn create_order(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: &NewOrder<'_>,
    ) -> Result<Order, sqlx::Error> {
        query_as::<Postgres, Order>(CREATE_ORDER_SQL)
            .bind(order.uuid.into_uuid())
            .bind(order.order_number)
            .bind(order.user.into_uuid())
            .bind(amount_to_bigint(order.totals.subtotal, "subtotal")?)
            .bind(amount_to_bigint(order.totals.tax_amount, "tax_amount")?)
            .bind(amount_to_bigint(order.totals.shipping_cost, "shipping_cost")?)
            .bind(amount_to_bigint(order.totals.total_amount, "total_amount")?)
            .bind(Json(order.shipping_address))
            .bind(Json(order.billing_address))
            .bind(order.payment_method.as_str())
            .bind(order.payment_status.as_str())
            .bind(order.status.as_str())
            .bind(order.customer_notes)
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn get_order(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: OrderUuid,
    ) -> Result<Order, sqlx::Error> {
        query_as::<Postgres, Order>(GET_ORDER_SQL)
            .bind(order.into_uuid())
            .fetch_one(&mut **tx)
            .await
    }

    /// Fetch an order and hold its row lock until the transaction ends.
    pub(crate) async fn lock_order(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: OrderUuid,
    ) -> Result<Order, sqlx::Error> {
        query_as::<Postgres, Order>(LOCK_ORDER_SQL)
            .bind(order.into_uuid())
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn update_status(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: OrderUuid,
        change: StatusChange<'_>,
    ) -> Result<Order, sqlx::Error> {
        query_as::<Postgres, Order>(UPDATE_ORDER_STATUS_SQL)
            .bind(order.into_uuid())
            .bind(change.status.as_str())
            .bind(change.tracking_number)
            .bind(change.cancellation.is_some())
            .bind(change.cancellation.and_then(|cancellation| cancellation.reason))
            .bind(change.cancellation.map(|cancellation| cancellation.by.into_uuid()))
            .bind(change.delivered)
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn update_payment(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: OrderUuid,
        status: OrderStatus,
        payment_status: PaymentStatus,
    ) -> Result<Order, sqlx::Error> {
        query_as::<Postgres, Order>(UPDATE_ORDER_PAYMENT_SQL)
            .bind(order.into_uuid())
            .bind(status.as_str())
            .bind(payment_status.as_str())
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn list_orders(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order_query: OrderQuery<'_>,
    ) -> Result<Vec<Order>, sqlx::Error> {
        let offset = i64::try_from(order_query.offset).map_err(|e| sqlx::Error::ColumnDecode {
            index: "offset".to_string(),
            source: Box::new(e),
        })?;

        let filter = order_query.filter;

        query_as::<Postgres, Order>(LIST_ORDERS_SQL)
            .bind(order_query.user.map(UserUuid::into_uuid))
            .bind(filter.status.map(OrderStatus::as_str))
            .bind(filter.payment_status.map(PaymentStatus::as_str))
            .bind(filter.created_from.map(SqlxTimestamp::from))
            .bind(filter.created_to.map(SqlxTimestamp::from))
            .bind(filter.order_number.as_deref().map(like_pattern))
            .bind(i64::from(order_query.limit))
            .bind(offset)
            .fetch_all(&mut **tx)
            .await
    }

    pub(crate) async fn count_orders(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order_query: OrderQuery<'_>,
    ) -> Result<u64, sqlx::Error> {
        let filter = order_query.filter;

        let count: i64 = query_scalar(COUNT_ORDERS_SQL)
            .bind(order_query.user.map(UserUuid::into_uuid))
            .bind(filter.status.map(OrderStatus::as_str))
            .bind(filter.payment_status.map(PaymentStatus::as_str))
            .bind(filter.created_from.map(SqlxTimestamp::from))
            .bind(filter.created_to.map(SqlxTimestamp::from))
            .bind(filter.order_number.as_deref().map(like_pattern))
            .fetch_one(&mut **tx)
            .await?;

        Ok(count.max(0).unsigned_abs())
    }
}

/// Escape `LIKE` metacharacters so order numbers match literally.
fn like_pattern(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());

    for ch in value.chars() {
        if matches!(ch, '\\' | '%' | '_') {
            escaped.push('\\');
        }

        escaped.push(ch);
    }

    escaped
}

fn parse_column<T: std::str::FromStr>(row: &PgRow, col: &str) -> Result<T, sqlx::Error>
where
    T::Err: std::error::Error + Send + Sync + 'static,
{
    let value: String = row.try_get(col)?;

    value.parse().map_err(|e| sqlx::Error::ColumnDecode {
        index: col.to_string(),
        source: Box::new(e),
    })
}

impl<'r> FromRow<'r, PgRow> for Order {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            uuid: OrderUuid::from_uuid(row.try_get("uuid")?),
            order_number: row.try_get("order_number")?,
            user_uuid: UserUuid::from_uuid(row.try_get("user_uuid")?),
            items: Vec::new(),
            subtotal: try_get_amount(row, "subtotal")?,
            tax_amount: try_get_amount(row, "tax_amount")?,
            shipping_cost: try_get_amount(row, "shipping_cost")?,
            total_amount: try_get_amount(row, "total_amount")?,
            shipping_address: row.try_get::<Json<Address>, _>("shipping_address")?.0,
            billing_address: row.try_get::<Json<Address>, _>("billing_address")?.0,
            payment_method: parse_column(row, "payment_method")?,
            payment_status: parse_column(row, "payment_status")?,
            status: parse_column(row, "status")?,
            status_history: Vec::new(),
            customer_notes: row.try_get("customer_notes")?,
            cancellation_reason: row.try_get("cancellation_reason")?,
            cancelled_at: row
                .try_get::<Option<SqlxTimestamp>, _>("cancelled_at")?
                .map(SqlxTimestamp::to_jiff),
            cancelled_by: row
                .try_get::<Option<Uuid>, _>("cancelled_by")?
                .map(UserUuid::from_uuid),
            tracking_number: row.try_get("tracking_number")?,
            actual_delivery_date: row
                .try_get::<Option<SqlxTimestamp>, _>("actual_delivery_date")?
                .map(SqlxTimestamp::to_jiff),
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
        })
    }
}

pub(super) fn parse_status(row: &PgRow, col: &str) -> Result<OrderStatus, sqlx::Error> {
    parse_column(row, col)
}
