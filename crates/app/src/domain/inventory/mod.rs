//! Inventory
//!
//! The stock ledger. Every mutation is a single conditional `UPDATE` keyed by
//! product, so concurrent purchasers are serialised by the row lock.

pub mod errors;
pub(crate) mod repository;
pub mod service;

pub use errors::InventoryError;
pub use service::*;
