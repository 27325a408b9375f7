//! List All Orders Handler

use std::sync::Arc;

use salvo::prelude::*;

use crate::{
    extensions::*,
    orders::{
        errors::into_status_error,
        models::{OrderListQuery, OrdersResponse},
    },
    state::State,
};

/// List All Orders Handler
///
/// Every customer's orders, newest first. Administrators only.
#[endpoint(
    tags("admin"),
    summary = "List All Orders",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "One page of orders"),
        (status_code = StatusCode::FORBIDDEN, description = "Not an administrator"),
        (status_code = StatusCode::BAD_REQUEST, description = "Invalid filter"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    req: &mut Request,
    depot: &mut Depot,
) -> Result<Json<OrdersResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let actor = depot.actor_or_401()?;
    let filter = req
        .parse_queries::<OrderListQuery>()
        .or_400()?
        .into_filter()?;

    let page = state
        .app
        .orders
        .list_all_orders(actor, filter)
        .await
        .map_err(into_status_error)?;

    Ok(Json(page.into()))
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use storefront::orders::PaymentStatus;
    use testresult::TestResult;

    use storefront_app::domain::orders::{
        MockOrdersService, OrdersServiceError,
        models::OrderPage,
    };

    use crate::test_helpers::{TEST_ADMIN, admin_orders_service, orders_service};

    use super::*;

    #[tokio::test]
    async fn admin_lists_all_orders() -> TestResult {
        let mut orders = MockOrdersService::new();

        orders
            .expect_list_all_orders()
            .once()
            .withf(|actor, filter| {
                *actor == TEST_ADMIN
                    && filter.payment_status == Some(PaymentStatus::Failed)
                    && filter.order_number.as_deref() == Some("ORD-1")
            })
            .return_once(|_, _| {
                Ok(OrderPage {
                    orders: vec![],
                    total: 0,
                    page: 1,
                    limit: 20,
                })
            });

        let body: OrdersResponse =
            TestClient::get("http://example.com/admin/orders?payment_status=failed&order_number=ORD-1")
                .send(&admin_orders_service(
                    orders,
                    Router::with_path("admin/orders").get(handler),
                ))
                .await
                .take_json()
                .await?;

        assert_eq!(body.limit, 20);
        assert!(body.orders.is_empty(), "expected no orders");

        Ok(())
    }

    #[tokio::test]
    async fn customer_gets_403() {
        let mut orders = MockOrdersService::new();

        orders
            .expect_list_all_orders()
            .once()
            .return_once(|_, _| Err(OrdersServiceError::Unauthorized));

        let res = TestClient::get("http://example.com/admin/orders")
            .send(&orders_service(
                orders,
                Router::with_path("admin/orders").get(handler),
            ))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::FORBIDDEN));
    }
}
