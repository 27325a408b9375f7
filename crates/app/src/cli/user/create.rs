use clap::Args;
use storefront_app::{
    auth::PgAuthService,
    domain::users::{
        PgUsersService, UsersService,
        models::{NewUser, Role, UserUuid},
    },
};

#[derive(Debug, Args)]
pub(crate) struct CreateUserArgs {
    /// PostgreSQL connection string
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    database_url: String,

    /// Login email; unique regardless of case
    #[arg(long)]
    email: String,

    /// Display name
    #[arg(long)]
    name: String,

    /// customer or admin
    #[arg(long, default_value = "customer")]
    role: Role,
}

pub(crate) async fn run(args: CreateUserArgs) -> Result<(), String> {
    let db = super::super::connect(&args.database_url).await?;

    let user = PgUsersService::new(db.clone())
        .create_user(NewUser {
            uuid: UserUuid::new(),
            email: args.email,
            name: args.name,
            role: args.role,
        })
        .await
        .map_err(|error| format!("failed to create user: {error}"))?;

    let issued = PgAuthService::new(db.pool().clone())
        .issue_api_token(user.uuid, None)
        .await
        .map_err(|error| format!("failed to create token: {error}"))?;

    println!("user_uuid: {}", user.uuid);
    println!("email: {}", user.email);
    println!("role: {}", user.role);
    println!("token_uuid: {}", issued.metadata.uuid);
    println!("api_token: {}", issued.token);
    println!("store this token now; it is only shown once");

    Ok(())
}
