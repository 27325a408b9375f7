//! Addresses

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Address validation errors.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum AddressError {
    /// A required field is blank.
    #[error("{0} is required")]
    MissingField(&'static str),
}

/// A shipping or billing address.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    /// Recipient first name.
    pub first_name: String,
    /// Recipient last name.
    pub last_name: String,
    /// First address line.
    pub address_line_1: String,
    /// Optional second address line.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address_line_2: Option<String>,
    /// City or town.
    pub city: String,
    /// State, county or region.
    pub state: String,
    /// Postal code.
    pub zip_code: String,
    /// Country.
    pub country: String,
    /// Optional contact phone number.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

impl Address {
    /// Check that every required field is non-blank.
    ///
    /// # Errors
    ///
    /// Returns [`AddressError::MissingField`] naming the first blank field.
    pub fn validate(&self) -> Result<(), AddressError> {
        let required = [
            ("first_name", &self.first_name),
            ("last_name", &self.last_name),
            ("address_line_1", &self.address_line_1),
            ("city", &self.city),
            ("state", &self.state),
            ("zip_code", &self.zip_code),
            ("country", &self.country),
        ];

        match required
            .into_iter()
            .find(|(_, value)| value.trim().is_empty())
        {
            Some((field, _)) => Err(AddressError::MissingField(field)),
            None => Ok(()),
        }
    }
}
