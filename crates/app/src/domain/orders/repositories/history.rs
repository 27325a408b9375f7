//! Order Status History Repository

use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query_as};
use storefront::orders::OrderStatus;
use uuid::Uuid;

use crate::domain::{
    orders::models::{OrderUuid, StatusHistoryEntry},
    users::models::UserUuid,
};

use super::orders::parse_status;

const APPEND_STATUS_HISTORY_SQL: &str = include_str!("../sql/append_status_history.sql");
const GET_STATUS_HISTORY_SQL: &str = include_str!("../sql/get_status_history.sql");

/// A history entry together with the order it belongs to.
#[derive(Debug, Clone)]
pub(crate) struct StatusHistoryRow {
    pub order: OrderUuid,
    pub entry: StatusHistoryEntry,
}

#[derive(Debug, Clone, Default)]
pub(crate) struct PgStatusHistoryRepository;

impl PgStatusHistoryRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn append(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: OrderUuid,
        status: OrderStatus,
        note: Option<&str>,
        updated_by: Option<UserUuid>,
    ) -> Result<StatusHistoryEntry, sqlx::Error> {
        let row = query_as::<Postgres, StatusHistoryRow>(APPEND_STATUS_HISTORY_SQL)
            .bind(Uuid::now_v7())
            .bind(order.into_uuid())
            .bind(status.as_str())
            .bind(note)
            .bind(updated_by.map(UserUuid::into_uuid))
            .fetch_one(&mut **tx)
            .await?;

        Ok(row.entry)
    }

    /// History of every given order, oldest entry first.
    pub(crate) async fn get_history(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        orders: &[Uuid],
    ) -> Result<Vec<StatusHistoryRow>, sqlx::Error> {
        query_as::<Postgres, StatusHistoryRow>(GET_STATUS_HISTORY_SQL)
            .bind(orders)
            .fetch_all(&mut **tx)
            .await
    }
}

impl<'r> FromRow<'r, PgRow> for StatusHistoryRow {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            order: OrderUuid::from_uuid(row.try_get("order_uuid")?),
            entry: StatusHistoryEntry {
                status: parse_status(row, "status")?,
                note: row.try_get("note")?,
                updated_by: row
                    .try_get::<Option<Uuid>, _>("updated_by")?
                    .map(UserUuid::from_uuid),
                created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            },
        })
    }
}
