//! Remove Cart Item Handler

use std::sync::Arc;

use salvo::{oapi::extract::PathParam, prelude::*};
use uuid::Uuid;

use storefront_app::domain::carts::models::CartItemUuid;

use crate::{
    carts::{errors::into_status_error, models::CartResponse},
    extensions::*,
    state::State,
};

/// Remove Cart Item Handler
#[endpoint(
    tags("carts"),
    summary = "Remove Cart Item",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Item removed"),
        (status_code = StatusCode::NOT_FOUND, description = "Cart item not found"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
#[tracing::instrument(
    name = "carts.items.delete",
    skip(item, depot),
    fields(user_uuid = tracing::field::Empty, item_uuid = %*item),
    err
)]
pub(crate) async fn handler(
    item: PathParam<Uuid>,
    depot: &mut Depot,
) -> Result<Json<CartResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let actor = depot.actor_or_401()?;

    tracing::Span::current().record("user_uuid", tracing::field::display(actor.user));

    let cart = state
        .app
        .carts
        .remove_item(actor.user, CartItemUuid::from_uuid(item.into_inner()))
        .await
        .map_err(into_status_error)?;

    Ok(Json(cart.into()))
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use testresult::TestResult;

    use storefront_app::domain::carts::{CartsServiceError, MockCartsService};

    use crate::test_helpers::{TEST_USER_UUID, carts_service, make_cart};

    use super::*;

    fn make_service(carts: MockCartsService) -> Service {
        carts_service(carts, Router::with_path("cart/items/{item}").delete(handler))
    }

    #[tokio::test]
    async fn remove_returns_remaining_cart() -> TestResult {
        let item = CartItemUuid::new();

        let mut carts = MockCartsService::new();

        carts
            .expect_remove_item()
            .once()
            .withf(move |user, uuid| *user == TEST_USER_UUID && *uuid == item)
            .return_once(|_, _| Ok(make_cart(vec![])));

        let mut res = TestClient::delete(format!("http://example.com/cart/items/{item}"))
            .send(&make_service(carts))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::OK));

        let body: CartResponse = res.take_json().await?;

        assert!(body.items.is_empty(), "expected the line to be gone");

        Ok(())
    }

    #[tokio::test]
    async fn unknown_item_returns_404() {
        let item = CartItemUuid::new();

        let mut carts = MockCartsService::new();

        carts
            .expect_remove_item()
            .once()
            .return_once(|_, _| Err(CartsServiceError::ItemNotFound));

        let res = TestClient::delete(format!("http://example.com/cart/items/{item}"))
            .send(&make_service(carts))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::NOT_FOUND));
    }
}
