//! App Router

use salvo::Router;

use crate::{admin, auth, carts, healthcheck, observability, orders, payments};

/// Routes served by the API. Everything but the healthcheck, metrics and the
/// payment callback requires a bearer token.
pub(crate) fn app_router() -> Router {
    Router::new()
        .push(Router::with_path("healthcheck").get(healthcheck::handler))
        .push(Router::with_path("metrics").get(observability::metrics_handler))
        .push(Router::with_path("payments/callback").post(payments::callback::handler))
        .push(
            Router::new()
                .hoop(auth::middleware::handler)
                .push(
                    Router::with_path("cart")
                        .get(carts::get::handler)
                        .delete(carts::clear::handler)
                        .push(Router::with_path("summary").get(carts::summary::handler))
                        .push(
                            Router::with_path("items")
                                .post(carts::items::create::handler)
                                .push(
                                    Router::with_path("{item}")
                                        .put(carts::items::update::handler)
                                        .delete(carts::items::delete::handler),
                                ),
                        ),
                )
                .push(
                    Router::with_path("orders")
                        .get(orders::index::handler)
                        .post(orders::create::handler)
                        .push(
                            Router::with_path("{order}")
                                .get(orders::get::handler)
                                .push(Router::with_path("cancel").put(orders::cancel::handler)),
                        ),
                )
                .push(
                    Router::with_path("admin/orders")
                        .get(admin::index::handler)
                        .push(
                            Router::with_path("{order}/status").put(admin::status::handler),
                        ),
                ),
        )
}
