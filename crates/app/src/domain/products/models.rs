//! Product Models

use std::{fmt, str::FromStr};

use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use storefront::inventory::{Stock, StockStatus};
use thiserror::Error;

use crate::uuids::TypedUuid;

/// Product UUID
pub type ProductUuid = TypedUuid<Product>;

/// Catalogue status. Only `active` products can be carted or ordered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProductStatus {
    Draft,
    Active,
    Inactive,
    Archived,
}

impl ProductStatus {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Active => "active",
            Self::Inactive => "inactive",
            Self::Archived => "archived",
        }
    }
}

impl fmt::Display for ProductStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown product status: {0}")]
pub struct UnknownProductStatus(pub String);

impl FromStr for ProductStatus {
    type Err = UnknownProductStatus;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "draft" => Ok(Self::Draft),
            "active" => Ok(Self::Active),
            "inactive" => Ok(Self::Inactive),
            "archived" => Ok(Self::Archived),
            _ => Err(UnknownProductStatus(value.to_string())),
        }
    }
}

/// Product Model
#[derive(Debug, Clone, PartialEq)]
pub struct Product {
    pub uuid: ProductUuid,
    pub name: String,
    pub sku: String,
    pub image_url: Option<String>,
    pub price: u64,
    pub status: ProductStatus,
    pub stock: Stock,
    pub sales_count: u64,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Product {
    /// Whether the product may be added to a cart or ordered.
    pub fn is_purchasable(&self) -> bool {
        self.status == ProductStatus::Active
    }

    pub fn stock_status(&self) -> StockStatus {
        self.stock.status()
    }
}

/// New Product Model
#[derive(Debug, Clone, PartialEq)]
pub struct NewProduct {
    pub uuid: ProductUuid,
    pub name: String,
    pub sku: String,
    pub image_url: Option<String>,
    pub price: u64,
    pub status: ProductStatus,
    pub stock: Stock,
}

/// Product Update Model
///
/// `None` leaves the field unchanged.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductUpdate {
    pub price: Option<u64>,
    pub status: Option<ProductStatus>,
}
