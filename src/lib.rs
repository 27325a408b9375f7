//! Storefront
//!
//! Checkout rules for the storefront back end: variant identity, cart totals,
//! stock policy, order pricing and the order lifecycle. Nothing in this crate
//! performs I/O; persistence and transport live in `storefront-app` and
//! `storefront-json`.

pub mod address;
pub mod cart;
pub mod checkout;
pub mod inventory;
pub mod money;
pub mod orders;
pub mod variants;
