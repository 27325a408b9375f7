use clap::{Args, Subcommand};

mod create;
mod restock;
mod status;

#[derive(Debug, Args)]
pub(crate) struct ProductCommand {
    #[command(subcommand)]
    command: ProductSubcommand,
}

#[derive(Debug, Subcommand)]
enum ProductSubcommand {
    Create(create::CreateProductArgs),
    Restock(restock::RestockProductArgs),
    Status(status::ProductStatusArgs),
}

pub(crate) async fn run(command: ProductCommand) -> Result<(), String> {
    match command.command {
        ProductSubcommand::Create(args) => create::run(args).await,
        ProductSubcommand::Restock(args) => restock::run(args).await,
        ProductSubcommand::Status(args) => status::run(args).await,
    }
}
