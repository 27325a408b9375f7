use clap::Args;
use storefront_app::domain::products::{
    PgProductsService, ProductsService,
    models::{ProductStatus, ProductUpdate, ProductUuid},
};
use uuid::Uuid;

#[derive(Debug, Args)]
pub(crate) struct ProductStatusArgs {
    /// PostgreSQL connection string
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    database_url: String,

    /// Product to update
    #[arg(long)]
    product_uuid: Uuid,

    /// New catalogue status: draft, active, inactive or archived
    #[arg(long)]
    status: ProductStatus,
}

pub(crate) async fn run(args: ProductStatusArgs) -> Result<(), String> {
    let db = super::super::connect(&args.database_url).await?;

    let product = PgProductsService::new(db)
        .update_product(
            ProductUuid::from_uuid(args.product_uuid),
            ProductUpdate {
                status: Some(args.status),
                ..ProductUpdate::default()
            },
        )
        .await
        .map_err(|error| format!("failed to update product: {error}"))?;

    println!("product_uuid: {}", product.uuid);
    println!("status: {}", product.status);

    Ok(())
}
