//! Cancel Order Handler

use std::sync::Arc;

use salvo::{
    oapi::{ToSchema, extract::PathParam},
    prelude::*,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use storefront_app::domain::orders::models::OrderUuid;

use crate::{
    extensions::*,
    orders::{errors::into_status_error, models::OrderResponse},
    state::State,
};

/// Cancel Order Request
#[derive(Debug, Default, Serialize, Deserialize, ToSchema)]
pub(crate) struct CancelOrderRequest {
    /// Recorded as the cancellation reason
    #[serde(default)]
    pub reason: Option<String>,
}

/// The body is optional; an empty payload cancels without a reason.
async fn cancel_request(req: &mut Request) -> Result<CancelOrderRequest, StatusError> {
    let payload = req.payload().await.or_400()?;

    if payload.iter().all(u8::is_ascii_whitespace) {
        return Ok(CancelOrderRequest::default());
    }

    serde_json::from_slice(payload).or_400()
}

/// Cancel Order Handler
///
/// Owner cancellation, allowed until the order ships. Reserved stock is
/// handed back.
#[endpoint(
    tags("orders"),
    summary = "Cancel Order",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Order cancelled"),
        (status_code = StatusCode::BAD_REQUEST, description = "Order can no longer be cancelled"),
        (status_code = StatusCode::FORBIDDEN, description = "Not the owner"),
        (status_code = StatusCode::NOT_FOUND, description = "Order not found"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
#[tracing::instrument(
    name = "orders.cancel",
    skip(order, req, depot),
    fields(user_uuid = tracing::field::Empty, order_uuid = %*order),
    err
)]
pub(crate) async fn handler(
    order: PathParam<Uuid>,
    req: &mut Request,
    depot: &mut Depot,
) -> Result<Json<OrderResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let actor = depot.actor_or_401()?;
    let request = cancel_request(req).await?;

    tracing::Span::current().record("user_uuid", tracing::field::display(actor.user));

    let order = state
        .app
        .orders
        .cancel_order(actor, OrderUuid::from_uuid(order.into_inner()), request.reason)
        .await
        .map_err(into_status_error)?;

    tracing::info!(order_number = %order.order_number, "order cancelled by owner");

    Ok(Json(order.into()))
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use serde_json::json;
    use storefront::orders::{OrderStatus, TransitionError};
    use testresult::TestResult;

    use storefront_app::domain::orders::{MockOrdersService, OrdersServiceError};

    use crate::test_helpers::{TEST_CUSTOMER, make_order, orders_service};

    use super::*;

    fn make_service(orders: MockOrdersService) -> Service {
        orders_service(orders, Router::with_path("orders/{order}/cancel").put(handler))
    }

    #[tokio::test]
    async fn owner_cancels_with_reason() -> TestResult {
        let uuid = OrderUuid::new();
        let order = make_order(uuid, OrderStatus::Cancelled);

        let mut orders = MockOrdersService::new();

        orders
            .expect_cancel_order()
            .once()
            .withf(move |actor, order, reason| {
                *actor == TEST_CUSTOMER
                    && *order == uuid
                    && reason.as_deref() == Some("changed my mind")
            })
            .return_once(move |_, _, _| Ok(order));

        let mut res = TestClient::put(format!("http://example.com/orders/{uuid}/cancel"))
            .json(&json!({ "reason": "changed my mind" }))
            .send(&make_service(orders))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::OK));

        let body: OrderResponse = res.take_json().await?;

        assert_eq!(body.status, "cancelled");

        Ok(())
    }

    #[tokio::test]
    async fn empty_body_cancels_without_reason() {
        let uuid = OrderUuid::new();
        let order = make_order(uuid, OrderStatus::Cancelled);

        let mut orders = MockOrdersService::new();

        orders
            .expect_cancel_order()
            .once()
            .withf(|_, _, reason| reason.is_none())
            .return_once(move |_, _, _| Ok(order));

        let res = TestClient::put(format!("http://example.com/orders/{uuid}/cancel"))
            .send(&make_service(orders))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::OK));
    }

    #[tokio::test]
    async fn shipped_order_returns_400() {
        let mut orders = MockOrdersService::new();

        orders.expect_cancel_order().once().return_once(|_, _, _| {
            Err(OrdersServiceError::InvalidTransition(
                TransitionError::NotCancellable(OrderStatus::Shipped),
            ))
        });

        let res = TestClient::put(format!(
            "http://example.com/orders/{}/cancel",
            OrderUuid::new()
        ))
        .send(&make_service(orders))
        .await;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));
    }

    #[tokio::test]
    async fn malformed_body_returns_400() {
        let mut orders = MockOrdersService::new();

        orders.expect_cancel_order().never();

        let res = TestClient::put(format!(
            "http://example.com/orders/{}/cancel",
            OrderUuid::new()
        ))
        .raw_json("{not json")
        .send(&make_service(orders))
        .await;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));
    }
}
