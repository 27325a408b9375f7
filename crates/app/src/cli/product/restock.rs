use clap::Args;
use storefront_app::domain::products::{PgProductsService, ProductsService, models::ProductUuid};
use uuid::Uuid;

#[derive(Debug, Args)]
pub(crate) struct RestockProductArgs {
    /// PostgreSQL connection string
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    database_url: String,

    /// Product to restock
    #[arg(long)]
    product_uuid: Uuid,

    /// Units to add; negative values write stock off
    #[arg(long, allow_hyphen_values = true)]
    delta: i64,
}

pub(crate) async fn run(args: RestockProductArgs) -> Result<(), String> {
    let db = super::super::connect(&args.database_url).await?;

    let product = PgProductsService::new(db)
        .restock_product(ProductUuid::from_uuid(args.product_uuid), args.delta)
        .await
        .map_err(|error| format!("failed to restock product: {error}"))?;

    println!("product_uuid: {}", product.uuid);
    println!("inventory_quantity: {}", product.stock.quantity);
    println!("stock_status: {}", product.stock_status().as_str());

    Ok(())
}
