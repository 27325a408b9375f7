use clap::Args;
use storefront_app::{auth::PgAuthService, domain::users::models::UserUuid};
use uuid::Uuid;

#[derive(Debug, Args)]
pub(crate) struct ListTokensArgs {
    /// PostgreSQL connection string
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    database_url: String,

    /// User UUID whose tokens should be listed
    #[arg(long)]
    user_uuid: Uuid,
}

fn or_label(value: Option<impl ToString>, label: &str) -> String {
    value.map_or_else(|| label.to_string(), |value| value.to_string())
}

pub(crate) async fn run(args: ListTokensArgs) -> Result<(), String> {
    let db = super::super::connect(&args.database_url).await?;

    let tokens = PgAuthService::new(db.pool().clone())
        .list_api_tokens(UserUuid::from_uuid(args.user_uuid))
        .await
        .map_err(|error| format!("failed to list tokens: {error}"))?;

    if tokens.is_empty() {
        println!("no tokens found for user {}", args.user_uuid);
        return Ok(());
    }

    for token in tokens {
        println!("token_uuid: {}", token.uuid);
        println!("token_version: {}", token.version.as_i16());
        println!("created_at: {}", token.created_at);
        println!("last_used_at: {}", or_label(token.last_used_at, "never"));
        println!("expires_at: {}", or_label(token.expires_at, "none"));
        println!("revoked_at: {}", or_label(token.revoked_at, "active"));
        println!();
    }

    Ok(())
}
