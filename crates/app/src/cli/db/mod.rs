//! `db` subcommands: schema maintenance.

use clap::{Args, Subcommand};

mod migrate;

#[derive(Debug, Args)]
pub(crate) struct DbCommand {
    #[command(subcommand)]
    action: DbAction,
}

#[derive(Debug, Subcommand)]
enum DbAction {
    /// Apply pending migrations; the API server also does this at startup
    Migrate(migrate::MigrateArgs),
}

pub(crate) async fn run(command: DbCommand) -> Result<(), String> {
    match command.action {
        DbAction::Migrate(args) => migrate::run(args).await,
    }
}
