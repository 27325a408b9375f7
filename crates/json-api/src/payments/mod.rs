//! Payment provider callbacks

mod handlers;

pub(crate) use handlers::*;
