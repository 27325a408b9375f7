//! Test context for service-level integration tests.

use std::sync::Arc;

use storefront::checkout::CheckoutPolicy;

use crate::{
    auth::PgAuthService,
    database::Db,
    domain::{
        carts::PgCartsService, inventory::PgInventoryService, orders::PgOrdersService,
        products::PgProductsService, users::PgUsersService,
    },
    notifications::LogNotifier,
};

use super::db::TestDb;

/// Every service wired against one freshly migrated database.
pub struct TestContext {
    pub db: TestDb,
    pub users: PgUsersService,
    pub products: PgProductsService,
    pub inventory: PgInventoryService,
    pub carts: PgCartsService,
    pub orders: PgOrdersService,
    pub auth: PgAuthService,
}

impl TestContext {
    pub async fn new() -> Self {
        let test_db = TestDb::new().await;
        let db = Db::new(test_db.pool().clone());

        Self {
            users: PgUsersService::new(db.clone()),
            products: PgProductsService::new(db.clone()),
            inventory: PgInventoryService::new(db.clone()),
            carts: PgCartsService::new(db.clone()),
            orders: PgOrdersService::new(
                db,
                CheckoutPolicy::default(),
                Arc::new(LogNotifier),
            ),
            auth: PgAuthService::new(test_db.pool().clone()),
            db: test_db,
        }
    }
}
