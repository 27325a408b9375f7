//! Log-only notifier.

use async_trait::async_trait;
use storefront::money::format_minor;
use tracing::info;

use crate::{
    domain::{orders::models::Order, users::models::User},
    notifications::{NotificationError, OrderNotifier},
};

/// Writes confirmations to the log instead of delivering them.
#[derive(Debug, Clone, Default)]
pub struct LogNotifier;

#[async_trait]
impl OrderNotifier for LogNotifier {
    async fn send_order_confirmation(
        &self,
        order: &Order,
        user: &User,
    ) -> Result<(), NotificationError> {
        info!(
            order_number = %order.order_number,
            email = %user.email,
            total = %format_minor(order.total_amount),
            items = order.items.len(),
            "order confirmation"
        );

        Ok(())
    }
}
