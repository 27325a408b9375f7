//! Set Order Status Handler

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

use storefront_app::domain::orders::models::{OrderUuid, StatusUpdate};

use crate::{
    extensions::*,
    orders::{errors::into_status_error, models::OrderResponse},
    state::State,
};

/// Set Order Status Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct SetOrderStatusRequest {
    /// Target status, e.g. `shipped`
    pub status: String,

    /// History note; used as the reason when cancelling
    #[serde(default)]
    pub note: Option<String>,

    #[serde(default)]
    pub tracking_number: Option<String>,
}

impl From<SetOrderStatusRequest> for StatusUpdate {
    fn from(request: SetOrderStatusRequest) -> Self {
        Self {
            status: request.status,
            note: request.note,
            tracking_number: request.tracking_number,
        }
    }
}

/// Set Order Status Handler
///
/// Moves an order to any known status. Entering `cancelled` hands reserved
/// stock back.
#[endpoint(
    tags("admin"),
    summary = "Set Order Status",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Status updated"),
        (status_code = StatusCode::BAD_REQUEST, description = "Unknown status"),
        (status_code = StatusCode::FORBIDDEN, description = "Not an administrator"),
        (status_code = StatusCode::NOT_FOUND, description = "Order not found"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
#[tracing::instrument(
    name = "admin.orders.status",
    skip(order, json, depot),
    fields(
        admin_uuid = tracing::field::Empty,
        order_uuid = %*order,
        status = %json.status
    ),
    err
)]
pub(crate) async fn handler(
    order: PathParam<Uuid>,
    json: JsonBody<SetOrderStatusRequest>,
    depot: &mut Depot,
) -> Result<Json<OrderResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let actor = depot.actor_or_401()?;

    tracing::Span::current().record("admin_uuid", tracing::field::display(actor.user));

    let order = state
        .app
        .orders
        .set_status(
            actor,
            OrderUuid::from_uuid(order.into_inner()),
            json.into_inner().into(),
        )
        .await
        .map_err(into_status_error)?;

    tracing::info!(order_number = %order.order_number, status = %order.status, "order status set");

    Ok(Json(order.into()))
}
