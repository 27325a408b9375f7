//! Bearer token wire format and stored verifier hashes.
//!
//! A token reads `sf_v1_<token uuid, simple>.<64 hex secret chars>`. Only the
//! SHA-256 of the verifier input is persisted, never the secret.

use std::{fmt, str::FromStr};

use rand::{RngCore, rngs::OsRng};
use sha2::{Digest, Sha256};
use thiserror::Error;
use uuid::Uuid;
use zeroize::Zeroize;

use crate::domain::users::models::UserUuid;

pub const API_TOKEN_PREFIX: &str = "sf";

pub const API_TOKEN_SECRET_BYTES: usize = 32;

#[derive(Debug, Error)]
pub enum ApiTokenError {
    #[error("api token format is invalid")]
    InvalidFormat,

    #[error("api token uses an unsupported version")]
    UnsupportedVersion,

    #[error("api token secret encoding is invalid")]
    InvalidSecretEncoding,
}

/// Token layout revision, stored alongside each token row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiTokenVersion {
    V1,
}

impl ApiTokenVersion {
    #[must_use]
    pub const fn as_i16(self) -> i16 {
        match self {
            Self::V1 => 1,
        }
    }
}

impl fmt::Display for ApiTokenVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}", self.as_i16())
    }
}

impl TryFrom<i16> for ApiTokenVersion {
    type Error = ApiTokenError;

    fn try_from(value: i16) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Self::V1),
            _ => Err(ApiTokenError::UnsupportedVersion),
        }
    }
}

impl FromStr for ApiTokenVersion {
    type Err = ApiTokenError;

    fn from_str(segment: &str) -> Result<Self, Self::Err> {
        segment
            .strip_prefix('v')
            .and_then(|number| number.parse::<i16>().ok())
            .ok_or(ApiTokenError::UnsupportedVersion)
            .and_then(Self::try_from)
    }
}

/// Random token secret, wiped from memory on drop.
#[derive(Clone)]
pub struct ApiTokenSecret([u8; API_TOKEN_SECRET_BYTES]);

impl ApiTokenSecret {
    #[must_use]
    pub const fn from_bytes(bytes: [u8; API_TOKEN_SECRET_BYTES]) -> Self {
        Self(bytes)
    }

    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; API_TOKEN_SECRET_BYTES] {
        &self.0
    }

    fn from_hex(encoded: &str) -> Result<Self, ApiTokenError> {
        let mut bytes = [0_u8; API_TOKEN_SECRET_BYTES];

        hex::decode_to_slice(encoded, &mut bytes)
            .map_err(|_error| ApiTokenError::InvalidSecretEncoding)?;

        Ok(Self(bytes))
    }
}

impl fmt::Debug for ApiTokenSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiTokenSecret(**redacted**)")
    }
}

impl Drop for ApiTokenSecret {
    fn drop(&mut self) {
        self.0.zeroize();
    }
}

#[derive(Debug, Clone)]
pub struct ParsedApiToken {
    pub token_uuid: Uuid,
    pub version: ApiTokenVersion,
    pub secret: ApiTokenSecret,
}

#[must_use]
pub fn generate_api_token_secret() -> ApiTokenSecret {
    let mut bytes = [0_u8; API_TOKEN_SECRET_BYTES];

    OsRng.fill_bytes(&mut bytes);

    ApiTokenSecret(bytes)
}

#[must_use]
pub fn format_api_token(
    token_uuid: Uuid,
    version: ApiTokenVersion,
    secret: &ApiTokenSecret,
) -> String {
    format!(
        "{API_TOKEN_PREFIX}_{version}_{}.{}",
        token_uuid.simple(),
        hex::encode(secret.as_bytes())
    )
}

/// Split a presented bearer token into its identifier and secret.
///
/// # Errors
///
/// Returns an error when the prefix, version, UUID or secret segment is malformed.
pub fn parse_api_token(token: &str) -> Result<ParsedApiToken, ApiTokenError> {
    let (identifier, secret) = token.split_once('.').ok_or(ApiTokenError::InvalidFormat)?;

    let (version, token_uuid) = identifier
        .strip_prefix(API_TOKEN_PREFIX)
        .and_then(|rest| rest.strip_prefix('_'))
        .and_then(|rest| rest.split_once('_'))
        .ok_or(ApiTokenError::InvalidFormat)?;

    Ok(ParsedApiToken {
        version: version.parse()?,
        token_uuid: Uuid::try_parse(token_uuid).map_err(|_error| ApiTokenError::InvalidFormat)?,
        secret: ApiTokenSecret::from_hex(secret)?,
    })
}

/// Bytes hashed into the stored verifier. Binding the owner means a hash
/// copied onto another user's row never verifies.
#[must_use]
pub fn build_verifier_input(
    token_uuid: &Uuid,
    version: ApiTokenVersion,
    user_uuid: &UserUuid,
    secret: &ApiTokenSecret,
) -> Vec<u8> {
    format!(
        "{}:{}:{}:{}",
        token_uuid.simple(),
        version.as_i16(),
        user_uuid.into_uuid().simple(),
        hex::encode(secret.as_bytes()),
    )
    .into_bytes()
}

#[must_use]
pub fn hash_verifier_input(input: &[u8]) -> String {
    hex::encode(Sha256::digest(input))
}

/// Constant-time comparison of two hex digests.
#[must_use]
pub fn verifier_matches(presented: &str, stored: &str) -> bool {
    presented.len() == stored.len()
        && presented
            .bytes()
            .zip(stored.bytes())
            .fold(0_u8, |diff, (a, b)| diff | (a ^ b))
            == 0
}
