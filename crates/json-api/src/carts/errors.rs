//! Cart Errors

use salvo::http::StatusError;
use tracing::error;

use storefront_app::domain::carts::CartsServiceError;

pub(crate) fn into_status_error(error: CartsServiceError) -> StatusError {
    match error {
        CartsServiceError::CartNotFound => StatusError::not_found().brief("Cart not found"),
        CartsServiceError::ItemNotFound => StatusError::not_found().brief("Cart item not found"),
        CartsServiceError::ProductUnavailable(product) => {
            StatusError::bad_request().brief(format!("Product {product} is not available"))
        }
        CartsServiceError::InsufficientStock { product, available } => StatusError::bad_request()
            .brief(format!(
                "Insufficient stock for product {product}: {available} available"
            )),
        CartsServiceError::InvalidQuantity(source) => {
            StatusError::bad_request().brief(source.to_string())
        }
        CartsServiceError::InvalidReference
        | CartsServiceError::MissingRequiredData
        | CartsServiceError::InvalidData => {
            StatusError::bad_request().brief("Invalid cart payload")
        }
        CartsServiceError::Overflow(_) => {
            StatusError::bad_request().brief("Cart total is too large")
        }
        CartsServiceError::Sql(source) => {
            error!("cart storage error: {source}");

            StatusError::internal_server_error()
        }
    }
}
