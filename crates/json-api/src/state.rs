//! State

use std::{fmt, sync::Arc};

use storefront_app::context::AppContext;

#[derive(Clone)]
pub(crate) struct State {
    pub(crate) app: AppContext,

    /// Key for the HMAC-SHA256 signature on payment callbacks.
    pub(crate) payment_callback_secret: String,
}

impl fmt::Debug for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("State")
            .field("payment_callback_secret", &"<redacted>")
            .finish_non_exhaustive()
    }
}

impl State {
    #[must_use]
    pub(crate) fn new(app: AppContext, payment_callback_secret: String) -> Self {
        Self {
            app,
            payment_callback_secret,
        }
    }

    #[must_use]
    pub(crate) fn shared(app: AppContext, payment_callback_secret: String) -> Arc<Self> {
        Arc::new(Self::new(app, payment_callback_secret))
    }
}
