//! Errors raised while resolving or issuing bearer tokens.

use thiserror::Error;

use crate::auth::ApiTokenError;

#[derive(Debug, Error)]
pub enum AuthServiceError {
    /// The token is unknown or no longer valid.
    #[error("token not found")]
    NotFound,

    #[error("storage error")]
    Sql(#[from] sqlx::Error),

    #[error("token processing error")]
    Token(#[from] ApiTokenError),
}
