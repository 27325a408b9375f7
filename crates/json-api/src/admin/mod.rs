//! Administration

mod handlers;

pub(crate) use handlers::*;
