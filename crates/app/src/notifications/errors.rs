//! Notification errors.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum NotificationError {
    /// An HTTP transport or serialization error occurred.
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// The receiver answered with a non-2xx status.
    #[error("notification rejected with status {status}: {body}")]
    Rejected { status: u16, body: String },
}
