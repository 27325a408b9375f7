//! Storefront JSON API Server

use std::{process, sync::Arc};

use salvo::{
    affix_state::inject,
    oapi::{
        OpenApi,
        security::{Http, HttpAuthScheme, SecurityScheme},
        swagger_ui::SwaggerUi,
    },
    prelude::*,
    trailing_slash::remove_slash,
};
use storefront::checkout::CheckoutPolicy;
use tracing::{error, info};

use storefront_app::{
    context::AppContext,
    notifications::{LogNotifier, OrderNotifier, WebhookConfig, WebhookNotifier},
};

use crate::{config::ServerConfig, state::State};

mod admin;
mod auth;
mod carts;
mod config;
mod extensions;
mod healthcheck;
mod observability;
mod orders;
mod payments;
mod router;
mod schemas;
mod shutdown;
mod state;
#[cfg(test)]
mod test_helpers;

/// Storefront JSON API Server entry point
#[tokio::main]
pub async fn main() {
    // Load configuration from .env and CLI arguments
    let config = ServerConfig::load().unwrap_or_else(|e| {
        #[expect(
            clippy::print_stderr,
            reason = "logging not initialized yet, must use eprintln for config errors"
        )]
        {
            eprintln!("Configuration error: {e}");
        }

        process::exit(1);
    });

    if let Err(source) = observability::init(&config.logging) {
        #[expect(
            clippy::print_stderr,
            reason = "logging failed to initialise, stderr is all that is left"
        )]
        {
            eprintln!("Observability error: {source}");
        }

        process::exit(1);
    }

    let notifier: Arc<dyn OrderNotifier> = match config.notifications.order_webhook_url.clone() {
        Some(url) => {
            info!(%url, "delivering order confirmations by webhook");

            Arc::new(WebhookNotifier::new(WebhookConfig { url }))
        }
        None => {
            info!("ORDER_WEBHOOK_URL unset, order confirmations are logged only");

            Arc::new(LogNotifier)
        }
    };

    let app = match AppContext::from_database_url(
        &config.database.database_url,
        config.database.database_max_connections,
        CheckoutPolicy::default(),
        notifier,
    )
    .await
    {
        Ok(app) => app,
        Err(init_error) => {
            error!("failed to initialize app context: {init_error}");

            process::exit(1);
        }
    };

    let addr = config.socket_addr();

    info!("Starting server on {addr}");

    let listener = TcpListener::new(addr).bind().await;

    let router = Router::new()
        .hoop(CatchPanic::new())
        .hoop(observability::request_logging)
        .hoop(remove_slash())
        .hoop(inject(State::shared(
            app,
            config.payments.payment_callback_secret,
        )))
        .push(router::app_router());

    let doc = OpenApi::new("Storefront API", env!("CARGO_PKG_VERSION"))
        .add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
        )
        .merge_router(&router);

    let router = router
        .push(doc.into_router("/api-doc/openapi.json"))
        .push(SwaggerUi::new("/api-doc/openapi.json").into_router("docs"));

    let server = Server::new(listener);

    let handle = server.handle();

    tokio::spawn(async move {
        if let Err(error) = shutdown::listen(handle).await {
            error!("failed to listen for shutdown signal: {error}");
        }
    });

    server.serve(router).await;
}
