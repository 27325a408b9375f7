//! Shared request and response schemas.

use salvo::oapi::ToSchema;
use serde::{Deserialize, Serialize};
use storefront::{address::Address, variants::Variant};

/// Variant option, e.g. `size = M`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub(crate) struct VariantBody {
    /// Option name
    pub name: String,

    /// Chosen value
    pub value: String,
}

impl From<Variant> for VariantBody {
    fn from(variant: Variant) -> Self {
        Self {
            name: variant.name,
            value: variant.value,
        }
    }
}

impl From<VariantBody> for Variant {
    fn from(body: VariantBody) -> Self {
        Variant::new(body.name, body.value)
    }
}

/// Postal address
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub(crate) struct AddressBody {
    pub first_name: String,
    pub last_name: String,
    pub address_line_1: String,
    #[serde(default)]
    pub address_line_2: Option<String>,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    pub country: String,
    #[serde(default)]
    pub phone: Option<String>,
}

impl From<Address> for AddressBody {
    fn from(address: Address) -> Self {
        Self {
            first_name: address.first_name,
            last_name: address.last_name,
            address_line_1: address.address_line_1,
            address_line_2: address.address_line_2,
            city: address.city,
            state: address.state,
            zip_code: address.zip_code,
            country: address.country,
            phone: address.phone,
        }
    }
}

impl From<AddressBody> for Address {
    fn from(body: AddressBody) -> Self {
        Self {
            first_name: body.first_name,
            last_name: body.last_name,
            address_line_1: body.address_line_1,
            address_line_2: body.address_line_2,
            city: body.city,
            state: body.state,
            zip_code: body.zip_code,
            country: body.country,
            phone: body.phone,
        }
    }
}
