//! Carts Repository

use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query_as};
use storefront::cart::CartTotals;

use crate::{
    database::{amount_to_bigint, try_get_amount},
    domain::{
        carts::models::{Cart, CartUuid},
        users::models::UserUuid,
    },
};

const UPSERT_CART_SQL: &str = include_str!("../sql/upsert_cart.sql");
const FIND_CART_SQL: &str = include_str!("../sql/find_cart.sql");
const UPDATE_CART_TOTALS_SQL: &str = include_str!("../sql/update_cart_totals.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgCartsRepository;

impl PgCartsRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    /// Fetch the user's cart, creating an empty one on first access.
    pub(crate) async fn upsert_cart(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: UserUuid,
    ) -> Result<Cart, sqlx::Error> {
        query_as::<Postgres, Cart>(UPSERT_CART_SQL)
            .bind(CartUuid::new().into_uuid())
            .bind(user.into_uuid())
            .fetch_one(&mut **tx)
            .await
    }

    /// Fetch and lock the user's cart without creating one.
    pub(crate) async fn find_cart(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: UserUuid,
    ) -> Result<Option<Cart>, sqlx::Error> {
        query_as::<Postgres, Cart>(FIND_CART_SQL)
            .bind(user.into_uuid())
            .fetch_optional(&mut **tx)
            .await
    }

    pub(crate) async fn update_totals(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        cart: CartUuid,
        totals: CartTotals,
    ) -> Result<Cart, sqlx::Error> {
        query_as::<Postgres, Cart>(UPDATE_CART_TOTALS_SQL)
            .bind(cart.into_uuid())
            .bind(amount_to_bigint(totals.total_items, "total_items")?)
            .bind(amount_to_bigint(totals.total_amount, "total_amount")?)
            .fetch_one(&mut **tx)
            .await
    }
}

impl<'r> FromRow<'r, PgRow> for Cart {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            uuid: CartUuid::from_uuid(row.try_get("uuid")?),
            user_uuid: UserUuid::from_uuid(row.try_get("user_uuid")?),
            items: Vec::new(),
            total_items: try_get_amount(row, "total_items")?,
            total_amount: try_get_amount(row, "total_amount")?,
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
        })
    }
}
