//! Place Order Handler

use std::sync::Arc;

use salvo::{
    http::header::LOCATION,
    oapi::{ToSchema, extract::JsonBody},
    prelude::*,
};
use serde::{Deserialize, Serialize};
use storefront::orders::PaymentMethod;

use storefront_app::domain::orders::{
    OrdersServiceError,
    models::{Order, PlaceOrder},
};

use crate::{
    extensions::*,
    observability::{CheckoutOutcome, observe_checkout},
    orders::{errors::into_status_error, models::OrderResponse},
    schemas::AddressBody,
    state::State,
};

/// Place Order Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct PlaceOrderRequest {
    pub shipping_address: AddressBody,

    /// Defaults to the shipping address
    #[serde(default)]
    pub billing_address: Option<AddressBody>,

    /// `credit_card`, `debit_card`, `paypal`, `stripe` or `cash_on_delivery`
    pub payment_method: String,

    #[serde(default)]
    pub customer_notes: Option<String>,
}

impl PlaceOrderRequest {
    fn into_place_order(self) -> Result<PlaceOrder, StatusError> {
        Ok(PlaceOrder {
            payment_method: self.payment_method.parse::<PaymentMethod>().or_400()?,
            shipping_address: self.shipping_address.into(),
            billing_address: self.billing_address.map(Into::into),
            customer_notes: self.customer_notes,
        })
    }
}

fn checkout_outcome(result: &Result<Order, OrdersServiceError>) -> CheckoutOutcome {
    match result {
        Ok(_) => CheckoutOutcome::Placed,
        Err(OrdersServiceError::EmptyCart) => CheckoutOutcome::EmptyCart,
        Err(
            OrdersServiceError::InsufficientStock { .. } | OrdersServiceError::ProductUnavailable(_),
        ) => CheckoutOutcome::OutOfStock,
        Err(OrdersServiceError::Sql(_)) => CheckoutOutcome::Failed,
        Err(_) => CheckoutOutcome::Rejected,
    }
}

/// Place Order Handler
///
/// Turns the caller's cart into an order.
#[endpoint(
    tags("orders"),
    summary = "Place Order",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::CREATED, description = "Order placed"),
        (status_code = StatusCode::BAD_REQUEST, description = "Empty cart, invalid address or insufficient stock"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
#[tracing::instrument(
    name = "orders.create",
    skip(json, depot, res),
    fields(
        user_uuid = tracing::field::Empty,
        order_uuid = tracing::field::Empty,
        payment_method = %json.payment_method
    ),
    err
)]
pub(crate) async fn handler(
    json: JsonBody<PlaceOrderRequest>,
    depot: &mut Depot,
    res: &mut Response,
) -> Result<Json<OrderResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let actor = depot.actor_or_401()?;
    let request = json.into_inner().into_place_order()?;

    let span = tracing::Span::current();

    span.record("user_uuid", tracing::field::display(actor.user));

    let result = state.app.orders.place_order(actor.user, request).await;

    observe_checkout(checkout_outcome(&result));

    let order = result.map_err(into_status_error)?;

    span.record("order_uuid", tracing::field::display(order.uuid));

    res.add_header(LOCATION, format!("/orders/{}", order.uuid), true)
        .or_500("failed to set location header")?
        .status_code(StatusCode::CREATED);

    Ok(Json(order.into()))
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use serde_json::{Value, json};
    use storefront::{
        address::AddressError,
        orders::{OrderStatus, PaymentMethod},
    };
    use testresult::TestResult;
    use uuid::Uuid;

    use storefront_app::domain::{
        orders::{MockOrdersService, models::OrderUuid},
        products::models::ProductUuid,
    };

    use crate::test_helpers::{TEST_USER_UUID, make_address, make_order, orders_service};

    use super::*;

    fn make_service(orders: MockOrdersService) -> Service {
        orders_service(orders, Router::with_path("orders").post(handler))
    }

    fn address_json() -> Value {
        json!({
            "first_name": "Ada",
            "last_name": "Lovelace",
            "address_line_1": "12 St James's Square",
            "city": "London",
            "state": "London",
            "zip_code": "SW1Y 4JH",
            "country": "GB"
        })
    }

    #[tokio::test]
    async fn place_order_returns_201_with_location() -> TestResult {
        let uuid = OrderUuid::new();
        let order = make_order(uuid, OrderStatus::Pending);

        let mut orders = MockOrdersService::new();

        orders
            .expect_place_order()
            .once()
            .withf(|user, request| {
                *user == TEST_USER_UUID
                    && request.shipping_address == make_address()
                    && request.billing_address.is_none()
                    && request.payment_method == PaymentMethod::CreditCard
            })
            .return_once(move |_, _| Ok(order));

        let mut res = TestClient::post("http://example.com/orders")
            .json(&json!({
                "shipping_address": address_json(),
                "payment_method": "credit_card"
            }))
            .send(&make_service(orders))
            .await;

        let location = res
            .headers()
            .get(LOCATION)
            .and_then(|value| value.to_str().ok())
            .map(str::to_owned);

        assert_eq!(res.status_code, Some(StatusCode::CREATED));
        assert_eq!(location, Some(format!("/orders/{uuid}")));

        let body: OrderResponse = res.take_json().await?;

        assert_eq!(body.uuid, uuid.into_uuid());
        assert_eq!(body.subtotal, 100_00);
        assert_eq!(body.tax_amount, 8_00);
        assert_eq!(body.shipping_cost, 15_00);
        assert_eq!(body.total_amount, 123_00);
        assert_eq!(body.status, "pending");
        assert_eq!(body.payment_status, "pending");

        Ok(())
    }

    #[tokio::test]
    async fn unknown_payment_method_returns_400() {
        let mut orders = MockOrdersService::new();

        orders.expect_place_order().never();

        let res = TestClient::post("http://example.com/orders")
            .json(&json!({
                "shipping_address": address_json(),
                "payment_method": "cheque"
            }))
            .send(&make_service(orders))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));
    }

    #[tokio::test]
    async fn empty_cart_returns_400() {
        let mut orders = MockOrdersService::new();

        orders
            .expect_place_order()
            .once()
            .return_once(|_, _| Err(OrdersServiceError::EmptyCart));

        let res = TestClient::post("http://example.com/orders")
            .json(&json!({
                "shipping_address": address_json(),
                "payment_method": "paypal"
            }))
            .send(&make_service(orders))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));
    }

    #[tokio::test]
    async fn invalid_address_returns_400() {
        let mut orders = MockOrdersService::new();

        orders.expect_place_order().once().return_once(|_, _| {
            Err(OrdersServiceError::InvalidAddress(
                AddressError::MissingField("city"),
            ))
        });

        let res = TestClient::post("http://example.com/orders")
            .json(&json!({
                "shipping_address": address_json(),
                "payment_method": "stripe"
            }))
            .send(&make_service(orders))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));
    }

    #[test]
    fn checkout_outcomes_are_classified() {
        let product = ProductUuid::from_uuid(Uuid::nil());

        assert_eq!(
            checkout_outcome(&Ok(make_order(OrderUuid::new(), OrderStatus::Pending))),
            CheckoutOutcome::Placed
        );
        assert_eq!(
            checkout_outcome(&Err(OrdersServiceError::EmptyCart)),
            CheckoutOutcome::EmptyCart
        );
        assert_eq!(
            checkout_outcome(&Err(OrdersServiceError::InsufficientStock {
                product,
                available: 0
            })),
            CheckoutOutcome::OutOfStock
        );
        assert_eq!(
            checkout_outcome(&Err(OrdersServiceError::Unauthorized)),
            CheckoutOutcome::Rejected
        );
        assert_eq!(
            checkout_outcome(&Err(OrdersServiceError::Sql(sqlx::Error::PoolTimedOut))),
            CheckoutOutcome::Failed
        );
    }
}
