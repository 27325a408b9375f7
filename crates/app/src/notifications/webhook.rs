//! Webhook notifier.

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use storefront::money::format_minor;
use uuid::Uuid;

use crate::{
    domain::{orders::models::Order, users::models::User},
    notifications::{NotificationError, OrderNotifier},
};

/// Where order confirmations are posted.
#[derive(Debug, Clone)]
pub struct WebhookConfig {
    /// Receiver URL, e.g. `"http://mailer.internal/hooks/orders"`.
    pub url: String,
}

/// Posts a JSON confirmation to a configured URL.
#[derive(Debug, Clone)]
pub struct WebhookNotifier {
    config: WebhookConfig,
    http: Client,
}

impl WebhookNotifier {
    #[must_use]
    pub fn new(config: WebhookConfig) -> Self {
        Self {
            config,
            http: Client::new(),
        }
    }
}

#[derive(Debug, Serialize)]
struct OrderConfirmation<'a> {
    order_uuid: Uuid,
    order_number: &'a str,
    email: &'a str,
    name: &'a str,
    status: &'a str,
    payment_method: &'a str,
    item_count: usize,
    total_amount: u64,
    total: String,
}

impl<'a> OrderConfirmation<'a> {
    fn new(order: &'a Order, user: &'a User) -> Self {
        Self {
            order_uuid: order.uuid.into_uuid(),
            order_number: &order.order_number,
            email: &user.email,
            name: &user.name,
            status: order.status.as_str(),
            payment_method: order.payment_method.as_str(),
            item_count: order.items.len(),
            total_amount: order.total_amount,
            total: format_minor(order.total_amount),
        }
    }
}

#[async_trait]
impl OrderNotifier for WebhookNotifier {
    async fn send_order_confirmation(
        &self,
        order: &Order,
        user: &User,
    ) -> Result<(), NotificationError> {
        let response = self
            .http
            .post(&self.config.url)
            .json(&OrderConfirmation::new(order, user))
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();

            return Err(NotificationError::Rejected { status, body });
        }

        Ok(())
    }
}
