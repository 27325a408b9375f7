//! Add Cart Item Handler

use std::sync::Arc;

use salvo::{
    oapi::{ToSchema, extract::JsonBody},
    prelude::*,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use storefront_app::domain::{carts::models::NewCartItem, products::models::ProductUuid};

use crate::{
    carts::{errors::into_status_error, models::CartResponse},
    extensions::*,
    schemas::VariantBody,
    state::State,
};

/// Add Cart Item Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct AddCartItemRequest {
    /// Product to add
    pub product_uuid: Uuid,

    /// Units to add; merged into an existing line with the same variants
    pub quantity: u32,

    /// Variant options; their order does not matter
    #[serde(default)]
    pub variants: Vec<VariantBody>,
}

impl From<AddCartItemRequest> for NewCartItem {
    fn from(request: AddCartItemRequest) -> Self {
        NewCartItem {
            product_uuid: ProductUuid::from_uuid(request.product_uuid),
            quantity: request.quantity,
            variants: request.variants.into_iter().map(Into::into).collect(),
        }
    }
}

/// Add Cart Item Handler
#[endpoint(
    tags("carts"),
    summary = "Add Cart Item",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::CREATED, description = "Item added"),
        (status_code = StatusCode::BAD_REQUEST, description = "Unavailable product, invalid quantity or insufficient stock"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
#[tracing::instrument(
    name = "carts.items.create",
    skip(json, depot, res),
    fields(
        user_uuid = tracing::field::Empty,
        product_uuid = %json.product_uuid,
        quantity = json.quantity
    ),
    err
)]
pub(crate) async fn handler(
    json: JsonBody<AddCartItemRequest>,
    depot: &mut Depot,
    res: &mut Response,
) -> Result<Json<CartResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let actor = depot.actor_or_401()?;

    tracing::Span::current().record("user_uuid", tracing::field::display(actor.user));

    let cart = state
        .app
        .carts
        .add_item(actor.user, json.into_inner().into())
        .await
        .map_err(into_status_error)?;

    res.status_code(StatusCode::CREATED);

    Ok(Json(cart.into()))
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use serde_json::json;
    use storefront::{cart::QuantityError, variants::Variant};
    use testresult::TestResult;

    use storefront_app::domain::carts::{
        CartsServiceError, MockCartsService, models::CartItemUuid,
    };

    use crate::test_helpers::{TEST_USER_UUID, carts_service, make_cart, make_cart_item};

    use super::*;

    fn make_service(carts: MockCartsService) -> Service {
        carts_service(carts, Router::with_path("cart/items").post(handler))
    }

    #[tokio::test]
    async fn add_item_forwards_line_and_returns_201() -> TestResult {
        let product = Uuid::from_u128(7);
        let cart = make_cart(vec![make_cart_item(CartItemUuid::new(), 2)]);

        let mut carts = MockCartsService::new();

        carts
            .expect_add_item()
            .once()
            .withf(move |user, item| {
                *user == TEST_USER_UUID
                    && *item
                        == NewCartItem {
                            product_uuid: ProductUuid::from_uuid(product),
                            quantity: 2,
                            variants: vec![Variant::new("size", "M")],
                        }
            })
            .return_once(move |_, _| Ok(cart));

        let mut res = TestClient::post("http://example.com/cart/items")
            .json(&json!({
                "product_uuid": product,
                "quantity": 2,
                "variants": [{ "name": "size", "value": "M" }]
            }))
            .send(&make_service(carts))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::CREATED));

        let body: CartResponse = res.take_json().await?;

        assert_eq!(body.total_items, 2);

        Ok(())
    }

    #[tokio::test]
    async fn variants_default_to_empty() {
        let mut carts = MockCartsService::new();

        carts
            .expect_add_item()
            .once()
            .withf(|_, item| item.variants.is_empty())
            .return_once(|_, _| Ok(make_cart(vec![])));

        let res = TestClient::post("http://example.com/cart/items")
            .json(&json!({ "product_uuid": Uuid::from_u128(7), "quantity": 1 }))
            .send(&make_service(carts))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::CREATED));
    }

    #[tokio::test]
    async fn insufficient_stock_returns_400_with_available_count() -> TestResult {
        let product = ProductUuid::from_uuid(Uuid::from_u128(7));

        let mut carts = MockCartsService::new();

        carts.expect_add_item().once().return_once(move |_, _| {
            Err(CartsServiceError::InsufficientStock {
                product,
                available: 1,
            })
        });

        let mut res = TestClient::post("http://example.com/cart/items")
            .json(&json!({ "product_uuid": product.into_uuid(), "quantity": 2 }))
            .send(&make_service(carts))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));
        assert!(
            res.take_string().await?.contains("1 available"),
            "expected available count in error brief"
        );

        Ok(())
    }

    #[tokio::test]
    async fn zero_quantity_returns_400() {
        let mut carts = MockCartsService::new();

        carts
            .expect_add_item()
            .once()
            .return_once(|_, _| Err(CartsServiceError::InvalidQuantity(QuantityError::BelowMinimum)));

        let res = TestClient::post("http://example.com/cart/items")
            .json(&json!({ "product_uuid": Uuid::from_u128(7), "quantity": 0 }))
            .send(&make_service(carts))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));
    }

    #[tokio::test]
    async fn unavailable_product_returns_400() {
        let product = ProductUuid::from_uuid(Uuid::from_u128(8));

        let mut carts = MockCartsService::new();

        carts
            .expect_add_item()
            .once()
            .return_once(move |_, _| Err(CartsServiceError::ProductUnavailable(product)));

        let res = TestClient::post("http://example.com/cart/items")
            .json(&json!({ "product_uuid": product.into_uuid(), "quantity": 1 }))
            .send(&make_service(carts))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));
    }
}
