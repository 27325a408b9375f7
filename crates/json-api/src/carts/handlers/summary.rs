//! Cart Summary Handler

use std::sync::Arc;

use salvo::prelude::*;

use crate::{
    carts::{errors::into_status_error, models::CartSummaryResponse},
    extensions::*,
    state::State,
};

/// Cart Summary Handler
///
/// Returns item count and totals without the lines.
#[endpoint(
    tags("carts"),
    summary = "Cart Summary",
    security(("bearer_auth" = [])),
)]
pub(crate) async fn handler(depot: &mut Depot) -> Result<Json<CartSummaryResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let actor = depot.actor_or_401()?;

    let summary = state
        .app
        .carts
        .cart_summary(actor.user)
        .await
        .map_err(into_status_error)?;

    Ok(Json(summary.into()))
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use storefront::cart::CartSummary;
    use testresult::TestResult;

    use storefront_app::domain::carts::MockCartsService;

    use crate::test_helpers::{TEST_USER_UUID, carts_service};

    use super::*;

    #[tokio::test]
    async fn summary_returns_counts() -> TestResult {
        let mut carts = MockCartsService::new();

        carts
            .expect_cart_summary()
            .once()
            .withf(|user| *user == TEST_USER_UUID)
            .return_once(|_| {
                Ok(CartSummary {
                    total_items: 3,
                    total_amount: 75_00,
                    item_count: 2,
                })
            });

        let body: CartSummaryResponse = TestClient::get("http://example.com/cart/summary")
            .send(&carts_service(
                carts,
                Router::with_path("cart/summary").get(handler),
            ))
            .await
            .take_json()
            .await?;

        assert_eq!(body.total_items, 3);
        assert_eq!(body.total_amount, 75_00);
        assert_eq!(body.item_count, 2);

        Ok(())
    }
}
