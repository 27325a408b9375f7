use clap::{Parser, Subcommand};
use storefront_app::database::{self, Db};

mod db;
mod product;
mod token;
mod user;

#[derive(Debug, Parser)]
#[command(name = "storefront-app", about = "Storefront CLI", long_about = None)]
pub(crate) struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    Db(db::DbCommand),
    Product(product::ProductCommand),
    User(user::UserCommand),
    Token(token::TokenCommand),
}

impl Cli {
    pub(crate) async fn run(self) -> Result<(), String> {
        match self.command {
            Commands::Db(command) => db::run(command).await,
            Commands::Product(command) => product::run(command).await,
            Commands::User(command) => user::run(command).await,
            Commands::Token(command) => token::run(command).await,
        }
    }
}

/// One-shot commands never need more than a couple of connections.
const CLI_MAX_CONNECTIONS: u32 = 2;

async fn connect(database_url: &str) -> Result<Db, String> {
    database::connect(database_url, CLI_MAX_CONNECTIONS)
        .await
        .map(Db::new)
        .map_err(|error| format!("failed to connect to database: {error}"))
}
