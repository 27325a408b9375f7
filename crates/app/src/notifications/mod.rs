//! Notifications
//!
//! Order confirmations are best-effort: a failed delivery is reported to the
//! caller, who logs it and carries on.

mod errors;
mod log;
mod webhook;

use async_trait::async_trait;
use mockall::automock;

use crate::domain::{orders::models::Order, users::models::User};

pub use errors::NotificationError;
pub use log::LogNotifier;
pub use webhook::{WebhookConfig, WebhookNotifier};

#[automock]
#[async_trait]
pub trait OrderNotifier: Send + Sync {
    /// Tell the customer their order was placed.
    async fn send_order_confirmation(
        &self,
        order: &Order,
        user: &User,
    ) -> Result<(), NotificationError>;
}
