//! Payment Callback Handler

use std::sync::Arc;

use hmac::{Hmac, Mac};
use salvo::prelude::*;
use serde::Deserialize;
use sha2::Sha256;
use storefront::orders::PaymentOutcome;
use uuid::Uuid;

use storefront_app::domain::orders::models::OrderUuid;

use crate::{
    extensions::*,
    orders::{errors::into_status_error, models::OrderResponse},
    state::State,
};

/// Header carrying the hex-encoded HMAC-SHA256 of the request body.
pub(crate) const SIGNATURE_HEADER: &str = "x-payment-signature";

/// Payment Callback Request
#[derive(Debug, Deserialize)]
pub(crate) struct PaymentCallbackRequest {
    pub order_uuid: Uuid,

    /// `succeeded` or `failed`
    pub outcome: String,
}

fn parse_outcome(outcome: &str) -> Result<PaymentOutcome, StatusError> {
    match outcome {
        "succeeded" => Ok(PaymentOutcome::Succeeded),
        "failed" => Ok(PaymentOutcome::Failed),
        _ => Err(StatusError::bad_request().brief(format!("unknown payment outcome: {outcome}"))),
    }
}

/// Check `signature` against the HMAC-SHA256 of `body` under `secret`.
fn verify_signature(secret: &str, body: &[u8], signature: Option<&str>) -> Result<(), StatusError> {
    let unauthorized = || StatusError::unauthorized().brief("Invalid payment signature");

    let tag = signature
        .and_then(|value| hex::decode(value.trim()).ok())
        .ok_or_else(unauthorized)?;

    let mut mac = Hmac::<Sha256>::new_from_slice(secret.as_bytes())
        .or_500("failed to key payment signature")?;

    mac.update(body);

    if mac.verify_slice(&tag).is_err() {
        return Err(unauthorized());
    }

    Ok(())
}

/// Payment Callback Handler
///
/// Applies an outcome reported by the payment provider. The raw body must be
/// signed with the shared callback secret. A success confirms an order still
/// in progress and marks it paid; a failure only marks the payment failed.
#[endpoint(
    tags("payments"),
    summary = "Payment Callback",
    responses(
        (status_code = StatusCode::OK, description = "Outcome applied"),
        (status_code = StatusCode::UNAUTHORIZED, description = "Missing or wrong signature"),
        (status_code = StatusCode::BAD_REQUEST, description = "Malformed body or unknown outcome"),
        (status_code = StatusCode::NOT_FOUND, description = "Order not found"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
#[tracing::instrument(
    name = "payments.callback",
    skip(req, depot),
    fields(
        order_uuid = tracing::field::Empty,
        outcome = tracing::field::Empty
    ),
    err
)]
pub(crate) async fn handler(
    req: &mut Request,
    depot: &mut Depot,
) -> Result<Json<OrderResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let signature = req
        .headers()
        .get(SIGNATURE_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::to_owned);

    let body = req.payload().await.or_400()?;

    verify_signature(&state.payment_callback_secret, body, signature.as_deref())?;

    let request: PaymentCallbackRequest = serde_json::from_slice(body).or_400()?;

    tracing::Span::current().record("order_uuid", tracing::field::display(request.order_uuid));
    tracing::Span::current().record("outcome", request.outcome.as_str());

    let outcome = parse_outcome(&request.outcome)?;

    let order = state
        .app
        .orders
        .record_payment(OrderUuid::from_uuid(request.order_uuid), outcome)
        .await
        .map_err(into_status_error)?;

    tracing::info!(
        order_number = %order.order_number,
        payment_status = %order.payment_status,
        "payment outcome recorded"
    );

    Ok(Json(order.into()))
}
