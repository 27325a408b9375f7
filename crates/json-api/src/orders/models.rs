//! Order request and response models.

use jiff::Timestamp;
use salvo::{http::StatusError, oapi::ToSchema};
use serde::{Deserialize, Serialize};
use storefront::orders::{OrderStatus, PaymentStatus};
use uuid::Uuid;

use storefront_app::domain::orders::models::{
    Order, OrderFilter, OrderItem, OrderPage, StatusHistoryEntry,
};

use crate::{
    extensions::*,
    schemas::{AddressBody, VariantBody},
};

/// Order Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct OrderResponse {
    pub uuid: Uuid,

    /// Human-readable order number, e.g. `ORD-1700000000000-1A2B3C`
    pub order_number: String,

    pub user_uuid: Uuid,
    pub items: Vec<OrderItemResponse>,

    /// Amounts are in minor units
    pub subtotal: u64,
    pub tax_amount: u64,
    pub shipping_cost: u64,
    pub total_amount: u64,

    pub shipping_address: AddressBody,
    pub billing_address: AddressBody,
    pub payment_method: String,
    pub payment_status: String,
    pub status: String,

    /// Oldest first
    pub status_history: Vec<StatusHistoryResponse>,

    pub customer_notes: Option<String>,
    pub cancellation_reason: Option<String>,
    pub cancelled_at: Option<String>,
    pub cancelled_by: Option<Uuid>,
    pub tracking_number: Option<String>,
    pub actual_delivery_date: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Order> for OrderResponse {
    fn from(order: Order) -> Self {
        Self {
            uuid: order.uuid.into_uuid(),
            order_number: order.order_number,
            user_uuid: order.user_uuid.into_uuid(),
            items: order.items.into_iter().map(OrderItemResponse::from).collect(),
            subtotal: order.subtotal,
            tax_amount: order.tax_amount,
            shipping_cost: order.shipping_cost,
            total_amount: order.total_amount,
            shipping_address: order.shipping_address.into(),
            billing_address: order.billing_address.into(),
            payment_method: order.payment_method.to_string(),
            payment_status: order.payment_status.to_string(),
            status: order.status.to_string(),
            status_history: order
                .status_history
                .into_iter()
                .map(StatusHistoryResponse::from)
                .collect(),
            customer_notes: order.customer_notes,
            cancellation_reason: order.cancellation_reason,
            cancelled_at: order.cancelled_at.as_ref().map(Timestamp::to_string),
            cancelled_by: order.cancelled_by.map(|user| user.into_uuid()),
            tracking_number: order.tracking_number,
            actual_delivery_date: order.actual_delivery_date.as_ref().map(Timestamp::to_string),
            created_at: order.created_at.to_string(),
            updated_at: order.updated_at.to_string(),
        }
    }
}

/// Order Item Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct OrderItemResponse {
    pub uuid: Uuid,
    pub product_uuid: Uuid,
    pub product_name: String,
    pub product_image: Option<String>,
    pub sku: String,
    pub quantity: u32,
    pub variants: Vec<VariantBody>,
    pub unit_price: u64,
    pub line_total: u64,
}

impl From<OrderItem> for OrderItemResponse {
    fn from(item: OrderItem) -> Self {
        Self {
            uuid: item.uuid.into_uuid(),
            product_uuid: item.product_uuid.into_uuid(),
            product_name: item.product_name,
            product_image: item.product_image,
            sku: item.sku,
            quantity: item.quantity,
            variants: item.variants.into_iter().map(VariantBody::from).collect(),
            unit_price: item.unit_price,
            line_total: item.line_total,
        }
    }
}

/// Status History Entry
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct StatusHistoryResponse {
    pub status: String,
    pub note: Option<String>,

    /// Absent for system-driven changes such as payment callbacks
    pub updated_by: Option<Uuid>,

    pub created_at: String,
}

impl From<StatusHistoryEntry> for StatusHistoryResponse {
    fn from(entry: StatusHistoryEntry) -> Self {
        Self {
            status: entry.status.to_string(),
            note: entry.note,
            updated_by: entry.updated_by.map(|user| user.into_uuid()),
            created_at: entry.created_at.to_string(),
        }
    }
}

/// Orders Page Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct OrdersResponse {
    pub orders: Vec<OrderResponse>,

    /// Orders matching the filter across all pages
    pub total: u64,

    pub page: u32,
    pub limit: u32,
}

impl From<OrderPage> for OrdersResponse {
    fn from(page: OrderPage) -> Self {
        Self {
            orders: page.orders.into_iter().map(OrderResponse::from).collect(),
            total: page.total,
            page: page.page,
            limit: page.limit,
        }
    }
}

/// Order listing query string.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct OrderListQuery {
    pub status: Option<String>,
    pub payment_status: Option<String>,
    pub from: Option<String>,
    pub to: Option<String>,
    pub order_number: Option<String>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

impl OrderListQuery {
    /// Parse the raw query values, answering 400 for unknown statuses or
    /// malformed timestamps.
    pub(crate) fn into_filter(self) -> Result<OrderFilter, StatusError> {
        Ok(OrderFilter {
            status: self
                .status
                .map(|status| status.parse::<OrderStatus>())
                .transpose()
                .or_400()?,
            payment_status: self
                .payment_status
                .map(|status| status.parse::<PaymentStatus>())
                .transpose()
                .or_400()?,
            created_from: self
                .from
                .map(|from| from.parse::<Timestamp>())
                .transpose()
                .or_400()?,
            created_to: self
                .to
                .map(|to| to.parse::<Timestamp>())
                .transpose()
                .or_400()?,
            order_number: self.order_number.filter(|number| !number.trim().is_empty()),
            page: self.page,
            limit: self.limit,
        })
    }
}

#[cfg(test)]
mod tests {
    use salvo::http::StatusCode;
    use testresult::TestResult;

    use super::*;

    #[test]
    fn query_parses_into_filter() -> TestResult {
        let filter = OrderListQuery {
            status: Some("shipped".to_string()),
            payment_status: Some("paid".to_string()),
            from: Some("2026-01-01T00:00:00Z".to_string()),
            to: None,
            order_number: Some(String::new()),
            page: Some(2),
            limit: Some(5),
        }
        .into_filter()?;

        assert_eq!(filter.status, Some(OrderStatus::Shipped));
        assert_eq!(filter.payment_status, Some(PaymentStatus::Paid));
        assert_eq!(
            filter.created_from,
            Some("2026-01-01T00:00:00Z".parse::<Timestamp>()?)
        );
        assert_eq!(filter.order_number, None);
        assert_eq!(filter.page, Some(2));
        assert_eq!(filter.limit, Some(5));

        Ok(())
    }

    #[test]
    fn unknown_status_is_a_bad_request() {
        let result = OrderListQuery {
            status: Some("teleported".to_string()),
            ..OrderListQuery::default()
        }
        .into_filter();

        assert!(
            matches!(&result, Err(error) if error.code == StatusCode::BAD_REQUEST),
            "expected 400, got {result:?}"
        );
    }
}
