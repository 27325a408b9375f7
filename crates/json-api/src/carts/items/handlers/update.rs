//! Update Cart Item Handler

use std::sync::Arc;

use salvo::{
    oapi::{
        ToSchema,
        extract::{JsonBody, PathParam},
    },
    prelude::*,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use storefront_app::domain::carts::models::CartItemUuid;

use crate::{
    carts::{errors::into_status_error, models::CartResponse},
    extensions::*,
    state::State,
};

/// Update Cart Item Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct UpdateCartItemRequest {
    /// New absolute quantity
    pub quantity: u32,
}

/// Update Cart Item Handler
#[endpoint(
    tags("carts"),
    summary = "Update Cart Item",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Quantity updated"),
        (status_code = StatusCode::NOT_FOUND, description = "Cart item not found"),
        (status_code = StatusCode::BAD_REQUEST, description = "Invalid quantity or insufficient stock"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
#[tracing::instrument(
    name = "carts.items.update",
    skip(item, json, depot),
    fields(
        user_uuid = tracing::field::Empty,
        item_uuid = %*item,
        quantity = json.quantity
    ),
    err
)]
pub(crate) async fn handler(
    item: PathParam<Uuid>,
    json: JsonBody<UpdateCartItemRequest>,
    depot: &mut Depot,
) -> Result<Json<CartResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let actor = depot.actor_or_401()?;

    tracing::Span::current().record("user_uuid", tracing::field::display(actor.user));

    let cart = state
        .app
        .carts
        .update_item(
            actor.user,
            CartItemUuid::from_uuid(item.into_inner()),
            json.into_inner().quantity,
        )
        .await
        .map_err(into_status_error)?;

    Ok(Json(cart.into()))
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use serde_json::json;
    use testresult::TestResult;

    use storefront_app::domain::carts::{CartsServiceError, MockCartsService};

    use crate::test_helpers::{TEST_USER_UUID, carts_service, make_cart, make_cart_item};

    use super::*;

    fn make_service(carts: MockCartsService) -> Service {
        carts_service(carts, Router::with_path("cart/items/{item}").put(handler))
    }

    #[tokio::test]
    async fn update_sets_quantity() -> TestResult {
        let item = CartItemUuid::new();
        let cart = make_cart(vec![make_cart_item(item, 5)]);

        let mut carts = MockCartsService::new();

        carts
            .expect_update_item()
            .once()
            .withf(move |user, uuid, quantity| {
                *user == TEST_USER_UUID && *uuid == item && *quantity == 5
            })
            .return_once(move |_, _, _| Ok(cart));

        let mut res = TestClient::put(format!("http://example.com/cart/items/{item}"))
            .json(&json!({ "quantity": 5 }))
            .send(&make_service(carts))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::OK));

        let body: CartResponse = res.take_json().await?;

        assert_eq!(body.total_items, 5);

        Ok(())
    }

    #[tokio::test]
    async fn unknown_item_returns_404() {
        let item = CartItemUuid::new();

        let mut carts = MockCartsService::new();

        carts
            .expect_update_item()
            .once()
            .return_once(|_, _, _| Err(CartsServiceError::ItemNotFound));

        let res = TestClient::put(format!("http://example.com/cart/items/{item}"))
            .json(&json!({ "quantity": 1 }))
            .send(&make_service(carts))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::NOT_FOUND));
    }
}
