//! Cart persistence: one row per user cart, one row per distinct line.

mod carts;
mod items;

pub(crate) use carts::PgCartsRepository;
pub(crate) use items::PgCartItemsRepository;
