//! List Orders Handler

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

/// List Orders Handler
///
/// Returns the caller's orders, newest first. Supports `status`,
/// `payment_status`, `from`, `to`, `order_number`, `page` and `limit`.
#[endpoint(
    tags("orders"),
    summary = "List Orders",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "One page of orders"),
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
        .list_orders(actor, filter)
        .await
        .map_err(into_status_error)?;

    Ok(Json(page.into()))
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use storefront::orders::OrderStatus;
    use testresult::TestResult;

    use storefront_app::domain::orders::{
        MockOrdersService,
        models::{OrderFilter, OrderPage, OrderUuid},
    };

    use crate::test_helpers::{TEST_CUSTOMER, make_order, orders_service};

    use super::*;

    fn make_service(orders: MockOrdersService) -> Service {
        orders_service(orders, Router::with_path("orders").get(handler))
    }

    #[tokio::test]
    async fn lists_own_orders_with_default_filter() -> TestResult {
        let order = make_order(OrderUuid::new(), OrderStatus::Pending);

        let mut orders = MockOrdersService::new();

        orders
            .expect_list_orders()
            .once()
            .withf(|actor, filter| *actor == TEST_CUSTOMER && *filter == OrderFilter::default())
            .return_once(move |_, _| {
                Ok(OrderPage {
                    orders: vec![order],
                    total: 1,
                    page: 1,
                    limit: 10,
                })
            });

        let body: OrdersResponse = TestClient::get("http://example.com/orders")
            .send(&make_service(orders))
            .await
            .take_json()
            .await?;

        assert_eq!(body.orders.len(), 1, "expected one order");
        assert_eq!(body.total, 1);
        assert_eq!(body.limit, 10);

        Ok(())
    }

    #[tokio::test]
    async fn forwards_status_and_pagination() {
        let mut orders = MockOrdersService::new();

        orders
            .expect_list_orders()
            .once()
            .withf(|_, filter| {
                filter.status == Some(OrderStatus::Shipped)
                    && filter.page == Some(2)
                    && filter.limit == Some(5)
            })
            .return_once(|_, _| {
                Ok(OrderPage {
                    orders: vec![],
                    total: 6,
                    page: 2,
                    limit: 5,
                })
            });

        let res = TestClient::get("http://example.com/orders?status=shipped&page=2&limit=5")
            .send(&make_service(orders))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::OK));
    }

    #[tokio::test]
    async fn unknown_status_filter_returns_400() {
        let mut orders = MockOrdersService::new();

        orders.expect_list_orders().never();

        let res = TestClient::get("http://example.com/orders?status=teleported")
            .send(&make_service(orders))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));
    }
}
