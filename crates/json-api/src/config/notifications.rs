//! Notifications Config

use clap::Args;

/// Order confirmation delivery settings.
#[derive(Debug, Args)]
pub struct NotificationsConfig {
    /// Webhook receiving order confirmations; confirmations are only logged when unset
    #[arg(long, env = "ORDER_WEBHOOK_URL")]
    pub order_webhook_url: Option<String>,
}
