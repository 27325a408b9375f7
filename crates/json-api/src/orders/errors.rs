//! Order Errors

use salvo::http::StatusError;
use tracing::error;

use storefront_app::domain::orders::OrdersServiceError;

pub(crate) fn into_status_error(error: OrdersServiceError) -> StatusError {
    match error {
        OrdersServiceError::EmptyCart => StatusError::bad_request().brief("Cart is empty"),
        OrdersServiceError::ProductUnavailable(product) => {
            StatusError::bad_request().brief(format!("Product {product} is not available"))
        }
        OrdersServiceError::InsufficientStock { product, available } => StatusError::bad_request()
            .brief(format!(
                "Insufficient stock for product {product}: {available} available"
            )),
        OrdersServiceError::InvalidAddress(source) => {
            StatusError::bad_request().brief(format!("Invalid address: {source}"))
        }
        OrdersServiceError::InvalidTransition(source) => {
            StatusError::bad_request().brief(source.to_string())
        }
        OrdersServiceError::OrderNotFound => StatusError::not_found().brief("Order not found"),
        OrdersServiceError::Unauthorized => StatusError::forbidden(),
        OrdersServiceError::AlreadyExists => StatusError::conflict().brief("Order already exists"),
        OrdersServiceError::InvalidReference
        | OrdersServiceError::MissingRequiredData
        | OrdersServiceError::InvalidData => {
            StatusError::bad_request().brief("Invalid order payload")
        }
        OrdersServiceError::Overflow(_) => {
            StatusError::bad_request().brief("Order total is too large")
        }
        OrdersServiceError::Sql(source) => {
            error!("order storage error: {source}");

            StatusError::internal_server_error()
        }
    }
}
