//! Payment Handlers

pub(crate) mod callback;
