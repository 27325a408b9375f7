//! Products service errors.

use std::num::TryFromIntError;

use sqlx::{
    Error,
    error::{DatabaseError, ErrorKind},
};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProductsServiceError {
    #[error("a product with this SKU already exists")]
    DuplicateSku,

    #[error("product not found")]
    NotFound,

    #[error("product name and SKU are required")]
    MissingField,

    #[error("product violates a catalogue constraint")]
    Rejected,

    #[error("price does not fit in storage")]
    InvalidPrice(#[from] TryFromIntError),

    #[error("storage error")]
    Sql(#[source] Error),
}

impl From<Error> for ProductsServiceError {
    fn from(error: Error) -> Self {
        if matches!(error, Error::RowNotFound) {
            return Self::NotFound;
        }

        match error.as_database_error().map(DatabaseError::kind) {
            Some(ErrorKind::UniqueViolation) => Self::DuplicateSku,
            Some(ErrorKind::NotNullViolation) => Self::MissingField,
            Some(ErrorKind::CheckViolation) => Self::Rejected,
            _ => Self::Sql(error),
        }
    }
}
