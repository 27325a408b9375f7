//! Order Models

use jiff::Timestamp;
use storefront::{
    address::Address,
    orders::{OrderStatus, PaymentMethod, PaymentStatus},
    variants::Variant,
};

use crate::{
    domain::{products::models::ProductUuid, users::models::UserUuid},
    uuids::TypedUuid,
};

/// Order UUID
pub type OrderUuid = TypedUuid<Order>;

/// Order Item UUID
pub type OrderItemUuid = TypedUuid<OrderItem>;

/// Default page size when listing a customer's own orders.
pub const DEFAULT_OWN_ORDERS_LIMIT: u32 = 10;

/// Default page size for the administrative order listing.
pub const DEFAULT_ALL_ORDERS_LIMIT: u32 = 20;

/// Largest page size either listing will return.
pub const MAX_ORDERS_LIMIT: u32 = 100;

/// Order Model
#[derive(Debug, Clone, PartialEq)]
pub struct Order {
    pub uuid: OrderUuid,
    pub order_number: String,
    pub user_uuid: UserUuid,
    pub items: Vec<OrderItem>,
    pub subtotal: u64,
    pub tax_amount: u64,
    pub shipping_cost: u64,
    pub total_amount: u64,
    pub shipping_address: Address,
    pub billing_address: Address,
    pub payment_method: PaymentMethod,
    pub payment_status: PaymentStatus,
    pub status: OrderStatus,
    pub status_history: Vec<StatusHistoryEntry>,
    pub customer_notes: Option<String>,
    pub cancellation_reason: Option<String>,
    pub cancelled_at: Option<Timestamp>,
    pub cancelled_by: Option<UserUuid>,
    pub tracking_number: Option<String>,
    pub actual_delivery_date: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Immutable line snapshot taken when the order was placed.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderItem {
    pub uuid: OrderItemUuid,
    pub product_uuid: ProductUuid,
    pub product_name: String,
    pub product_image: Option<String>,
    pub sku: String,
    pub quantity: u32,
    pub variants: Vec<Variant>,
    pub unit_price: u64,
    pub line_total: u64,
}

/// One entry of the append-only status log.
#[derive(Debug, Clone, PartialEq)]
pub struct StatusHistoryEntry {
    pub status: OrderStatus,
    pub note: Option<String>,
    pub updated_by: Option<UserUuid>,
    pub created_at: Timestamp,
}

/// Checkout request.
#[derive(Debug, Clone, PartialEq)]
pub struct PlaceOrder {
    pub shipping_address: Address,
    /// Falls back to the shipping address.
    pub billing_address: Option<Address>,
    pub payment_method: PaymentMethod,
    pub customer_notes: Option<String>,
}

/// Administrative status change.
///
/// `status` is kept as the caller's string so that unknown values are
/// rejected by the service before anything is touched.
#[derive(Debug, Clone, PartialEq)]
pub struct StatusUpdate {
    pub status: String,
    pub note: Option<String>,
    pub tracking_number: Option<String>,
}

/// Order listing filter. `page` is 1-based.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OrderFilter {
    pub status: Option<OrderStatus>,
    pub payment_status: Option<PaymentStatus>,
    pub created_from: Option<Timestamp>,
    pub created_to: Option<Timestamp>,
    pub order_number: Option<String>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

/// One page of orders.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderPage {
    pub orders: Vec<Order>,
    pub total: u64,
    pub page: u32,
    pub limit: u32,
}
