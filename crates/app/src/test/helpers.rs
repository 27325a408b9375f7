//! Test Helpers

use storefront::{address::Address, inventory::Stock};

use crate::{
    domain::{
        carts::models::NewCartItem,
        products::{
            ProductsService, ProductsServiceError,
            models::{NewProduct, Product, ProductStatus, ProductUuid},
        },
        users::{
            UsersService, UsersServiceError,
            models::{NewUser, Role, User, UserUuid},
        },
    },
    test::TestContext,
};

/// An active, tracked product with the default low-stock threshold.
pub(crate) fn new_product(sku: &str, price: u64, quantity: i64) -> NewProduct {
    NewProduct {
        uuid: ProductUuid::new(),
        name: format!("Product {sku}"),
        sku: sku.to_string(),
        image_url: Some(format!("https://img.example.test/{sku}.png")),
        price,
        status: ProductStatus::Active,
        stock: Stock {
            quantity,
            track_quantity: true,
            allow_backorder: false,
            low_stock_threshold: 10,
        },
    }
}

pub(crate) async fn create_product(
    ctx: &TestContext,
    sku: &str,
    price: u64,
    quantity: i64,
) -> Result<Product, ProductsServiceError> {
    ctx.products
        .create_product(new_product(sku, price, quantity))
        .await
}

async fn create_user(ctx: &TestContext, role: Role) -> Result<User, UsersServiceError> {
    let uuid = UserUuid::new();

    ctx.users
        .create_user(NewUser {
            uuid,
            email: format!("{role}-{uuid}@example.test"),
            name: format!("Test {role}"),
            role,
        })
        .await
}

pub(crate) async fn create_customer(ctx: &TestContext) -> Result<User, UsersServiceError> {
    create_user(ctx, Role::Customer).await
}

pub(crate) async fn create_admin(ctx: &TestContext) -> Result<User, UsersServiceError> {
    create_user(ctx, Role::Admin).await
}

pub(crate) fn new_item(product: ProductUuid, quantity: u32) -> NewCartItem {
    NewCartItem {
        product_uuid: product,
        quantity,
        variants: Vec::new(),
    }
}

pub(crate) fn address() -> Address {
    Address {
        first_name: "Grace".to_string(),
        last_name: "Hopper".to_string(),
        address_line_1: "1 Navy Yard".to_string(),
        address_line_2: None,
        city: "Arlington".to_string(),
        state: "VA".to_string(),
        zip_code: "22202".to_string(),
        country: "US".to_string(),
        phone: None,
    }
}
