//! Payments Config

use clap::{Args, builder::NonEmptyStringValueParser};

/// Payment provider callback settings.
#[derive(Debug, Args)]
pub struct PaymentsConfig {
    /// Key the payment provider signs callback bodies with (HMAC-SHA256, hex in
    /// `x-payment-signature`)
    #[arg(
        long,
        env = "PAYMENT_CALLBACK_SECRET",
        hide_env_values = true,
        value_parser = NonEmptyStringValueParser::new()
    )]
    pub payment_callback_secret: String,
}
