//! Cart Models

use jiff::Timestamp;
use storefront::{cart::CartLine, inventory::StockStatus, variants::Variant};

use crate::{
    domain::{products::models::ProductUuid, users::models::UserUuid},
    uuids::TypedUuid,
};

/// Cart UUID
pub type CartUuid = TypedUuid<Cart>;

/// Cart Item UUID
pub type CartItemUuid = TypedUuid<CartItem>;

/// Cart Model
#[derive(Debug, Clone, PartialEq)]
pub struct Cart {
    pub uuid: CartUuid,
    pub user_uuid: UserUuid,
    pub items: Vec<CartItem>,
    pub total_items: u64,
    pub total_amount: u64,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// CartItem Model
///
/// `price` is the snapshot taken when the line was last written, not the live
/// product price.
#[derive(Debug, Clone, PartialEq)]
pub struct CartItem {
    pub uuid: CartItemUuid,
    pub product_uuid: ProductUuid,
    pub product_name: String,
    pub product_image: Option<String>,
    pub sku: String,
    pub quantity: u32,
    pub variants: Vec<Variant>,
    pub price: u64,
    pub stock_status: StockStatus,
    pub added_at: Timestamp,
    pub updated_at: Timestamp,
}

impl CartLine for CartItem {
    type Product = ProductUuid;

    fn product(&self) -> &ProductUuid {
        &self.product_uuid
    }

    fn variants(&self) -> &[Variant] {
        &self.variants
    }

    fn unit_price(&self) -> u64 {
        self.price
    }

    fn quantity(&self) -> u32 {
        self.quantity
    }
}

// NewCartItem Model
#[derive(Debug, Clone, PartialEq)]
pub struct NewCartItem {
    pub product_uuid: ProductUuid,
    pub quantity: u32,
    pub variants: Vec<Variant>,
}
