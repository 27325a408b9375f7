//! `token` subcommands: bearer tokens for API users.

use clap::{Args, Subcommand};

mod create;
mod list;
mod revoke;

#[derive(Debug, Args)]
pub(crate) struct TokenCommand {
    #[command(subcommand)]
    action: TokenAction,
}

#[derive(Debug, Subcommand)]
enum TokenAction {
    /// Issue a token for a user; the plaintext is printed once
    Create(create::CreateTokenArgs),

    /// Show a user's tokens without their secrets
    List(list::ListTokensArgs),

    /// Revoke a token so it no longer authenticates
    Revoke(revoke::RevokeTokenArgs),
}

pub(crate) async fn run(command: TokenCommand) -> Result<(), String> {
    match command.action {
        TokenAction::Create(args) => create::run(args).await,
        TokenAction::List(args) => list::run(args).await,
        TokenAction::Revoke(args) => revoke::run(args).await,
    }
}
