//! Order Repositories

mod history;
mod items;
mod orders;

pub(crate) use history::PgStatusHistoryRepository;
pub(crate) use items::PgOrderItemsRepository;
pub(crate) use orders::{Cancellation, NewOrder, OrderQuery, PgOrdersRepository, StatusChange};
