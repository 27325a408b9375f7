//! Cart response models.

use salvo::oapi::ToSchema;
use serde::{Deserialize, Serialize};
use storefront::cart::CartSummary;
use uuid::Uuid;

use storefront_app::domain::carts::models::{Cart, CartItem};

use crate::schemas::VariantBody;

/// Cart Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CartResponse {
    /// The unique identifier of the cart
    pub uuid: Uuid,

    /// The lines in the cart
    pub items: Vec<CartItemResponse>,

    /// Sum of line quantities
    pub total_items: u64,

    /// Sum of line totals, in minor units
    pub total_amount: u64,

    /// The date and time the cart was created
    pub created_at: String,

    /// The date and time the cart was last updated
    pub updated_at: String,
}

impl From<Cart> for CartResponse {
    fn from(cart: Cart) -> Self {
        Self {
            uuid: cart.uuid.into_uuid(),
            items: cart.items.into_iter().map(CartItemResponse::from).collect(),
            total_items: cart.total_items,
            total_amount: cart.total_amount,
            created_at: cart.created_at.to_string(),
            updated_at: cart.updated_at.to_string(),
        }
    }
}

/// Cart Item Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CartItemResponse {
    /// The unique identifier of the cart line
    pub uuid: Uuid,

    /// The product on this line
    pub product_uuid: Uuid,

    pub product_name: String,
    pub product_image: Option<String>,
    pub sku: String,
    pub quantity: u32,

    /// Chosen variant options, in the order they were given
    pub variants: Vec<VariantBody>,

    /// Unit price snapshot, in minor units
    pub price: u64,

    /// `in_stock`, `low_stock` or `out_of_stock`
    pub stock_status: String,

    pub added_at: String,
    pub updated_at: String,
}

impl From<CartItem> for CartItemResponse {
    fn from(item: CartItem) -> Self {
        Self {
            uuid: item.uuid.into_uuid(),
            product_uuid: item.product_uuid.into_uuid(),
            product_name: item.product_name,
            product_image: item.product_image,
            sku: item.sku,
            quantity: item.quantity,
            variants: item.variants.into_iter().map(VariantBody::from).collect(),
            price: item.price,
            stock_status: item.stock_status.as_str().to_string(),
            added_at: item.added_at.to_string(),
            updated_at: item.updated_at.to_string(),
        }
    }
}

/// Cart Summary Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CartSummaryResponse {
    /// Sum of line quantities
    pub total_items: u64,

    /// Sum of line totals, in minor units
    pub total_amount: u64,

    /// Number of distinct lines
    pub item_count: u64,
}

impl From<CartSummary> for CartSummaryResponse {
    fn from(summary: CartSummary) -> Self {
        Self {
            total_items: summary.total_items,
            total_amount: summary.total_amount,
            item_count: summary.item_count,
        }
    }
}
