//! Auth service.

use async_trait::async_trait;
use jiff::Timestamp;
use mockall::automock;
use sqlx::PgPool;
use tracing::debug;
use uuid::Uuid;

use crate::{
    auth::{
        Actor, ApiTokenMetadata, ApiTokenVersion, AuthServiceError, IssuedApiToken, NewApiToken,
        build_verifier_input, format_api_token, generate_api_token_secret, hash_verifier_input,
        parse_api_token, repository::PgAuthRepository, verifier_matches,
    },
    domain::users::models::UserUuid,
};

#[derive(Debug, Clone)]
pub struct PgAuthService {
    repository: PgAuthRepository,
}

impl PgAuthService {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: PgAuthRepository::new(pool),
        }
    }

    /// Issue a new API token for the given user.
    ///
    /// The raw token is only ever returned here; storage keeps a SHA-256 verifier.
    ///
    /// # Errors
    ///
    /// Returns an error if the database insertion fails.
    pub async fn issue_api_token(
        &self,
        user_uuid: UserUuid,
        expires_at: Option<Timestamp>,
    ) -> Result<IssuedApiToken, AuthServiceError> {
        let token_uuid = Uuid::now_v7();
        let version = ApiTokenVersion::V1;
        let secret = generate_api_token_secret();
        let token = format_api_token(token_uuid, version, &secret);

        let verifier_input = build_verifier_input(&token_uuid, version, &user_uuid, &secret);

        let metadata = self
            .repository
            .create_api_token(&NewApiToken {
                uuid: token_uuid,
                user_uuid,
                version,
                token_hash: hash_verifier_input(&verifier_input),
                expires_at,
            })
            .await?;

        Ok(IssuedApiToken { token, metadata })
    }

    /// List all tokens for the given user.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_api_tokens(
        &self,
        user_uuid: UserUuid,
    ) -> Result<Vec<ApiTokenMetadata>, AuthServiceError> {
        Ok(self.repository.list_api_tokens_by_user(user_uuid).await?)
    }

    /// Revoke a token by UUID. Returns `true` if the token was active.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn revoke_api_token(&self, token_uuid: Uuid) -> Result<bool, AuthServiceError> {
        self.repository
            .revoke_api_token(token_uuid)
            .await
            .map(|record| record.is_some())
            .map_err(AuthServiceError::from)
    }
}

#[async_trait]
impl AuthService for PgAuthService {
    async fn authenticate_bearer(&self, bearer_token: &str) -> Result<Actor, AuthServiceError> {
        let parsed_token = parse_api_token(bearer_token).map_err(|error| {
            debug!(%error, "rejected malformed bearer token");

            AuthServiceError::NotFound
        })?;

        let token = self
            .repository
            .find_active_api_token_by_uuid(parsed_token.token_uuid, parsed_token.version)
            .await?
            .ok_or(AuthServiceError::NotFound)?;

        if token.version != parsed_token.version {
            return Err(AuthServiceError::NotFound);
        }

        let verifier_input = build_verifier_input(
            &parsed_token.token_uuid,
            parsed_token.version,
            &token.user_uuid,
            &parsed_token.secret,
        );

        if !verifier_matches(&hash_verifier_input(&verifier_input), &token.token_hash) {
            return Err(AuthServiceError::NotFound);
        }

        // Best-effort metadata update; auth success should not depend on this write.
        let _touch_result = self
            .repository
            .touch_api_token_last_used(parsed_token.token_uuid)
            .await;

        Ok(Actor::new(token.user_uuid, token.role))
    }
}

#[automock]
#[async_trait]
pub trait AuthService: Send + Sync {
    async fn authenticate_bearer(&self, bearer_token: &str) -> Result<Actor, AuthServiceError>;
}
