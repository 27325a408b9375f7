use clap::Args;
use storefront::inventory::Stock;
use storefront_app::domain::products::{
    PgProductsService, ProductsService,
    models::{NewProduct, ProductStatus, ProductUuid},
};

#[derive(Debug, Args)]
pub(crate) struct CreateProductArgs {
    /// PostgreSQL connection string
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    database_url: String,

    /// Display name
    #[arg(long)]
    name: String,

    /// Unique stock keeping unit
    #[arg(long)]
    sku: String,

    /// Unit price in minor units (e.g. 1999 for 19.99)
    #[arg(long)]
    price: u64,

    /// Units on hand
    #[arg(long, default_value_t = 0)]
    quantity: i64,

    /// Catalogue status: draft, active, inactive or archived
    #[arg(long, default_value = "active")]
    status: ProductStatus,

    /// Optional image URL
    #[arg(long)]
    image_url: Option<String>,

    /// Do not enforce stock levels for this product
    #[arg(long)]
    untracked: bool,

    /// Allow selling past zero
    #[arg(long)]
    allow_backorder: bool,

    /// Low-stock reporting threshold
    #[arg(long, default_value_t = 10)]
    low_stock_threshold: i64,
}

pub(crate) async fn run(args: CreateProductArgs) -> Result<(), String> {
    let db = super::super::connect(&args.database_url).await?;

    let product = PgProductsService::new(db)
        .create_product(NewProduct {
            uuid: ProductUuid::new(),
            name: args.name,
            sku: args.sku,
            image_url: args.image_url,
            price: args.price,
            status: args.status,
            stock: Stock {
                quantity: args.quantity,
                track_quantity: !args.untracked,
                allow_backorder: args.allow_backorder,
                low_stock_threshold: args.low_stock_threshold,
            },
        })
        .await
        .map_err(|error| format!("failed to create product: {error}"))?;

    println!("product_uuid: {}", product.uuid);
    println!("sku: {}", product.sku);
    println!("status: {}", product.status);
    println!("inventory_quantity: {}", product.stock.quantity);

    Ok(())
}
