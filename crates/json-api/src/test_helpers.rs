//! Test helpers.

use std::sync::Arc;

use jiff::Timestamp;
use salvo::{affix_state::inject, prelude::*};
use storefront::{
    address::Address,
    inventory::StockStatus,
    orders::{OrderStatus, PaymentMethod, PaymentStatus},
    variants::Variant,
};
use uuid::Uuid;

use storefront_app::{
    auth::{Actor, MockAuthService},
    context::AppContext,
    domain::{
        carts::{
            MockCartsService,
            models::{Cart, CartItem, CartItemUuid, CartUuid},
        },
        inventory::MockInventoryService,
        orders::{
            MockOrdersService,
            models::{Order, OrderItem, OrderItemUuid, OrderUuid, StatusHistoryEntry},
        },
        products::{MockProductsService, models::ProductUuid},
        users::{
            MockUsersService,
            models::{Role, UserUuid},
        },
    },
};

use crate::{extensions::*, state::State};

pub(crate) const TEST_USER_UUID: UserUuid = UserUuid::from_uuid(Uuid::nil());
pub(crate) const TEST_ADMIN_UUID: UserUuid = UserUuid::from_uuid(Uuid::from_u128(1));

pub(crate) const TEST_CUSTOMER: Actor = Actor::new(TEST_USER_UUID, Role::Customer);
pub(crate) const TEST_ADMIN: Actor = Actor::new(TEST_ADMIN_UUID, Role::Admin);

pub(crate) const TEST_PAYMENT_SECRET: &str = "test-callback-secret";

#[salvo::handler]
pub(crate) async fn inject_customer(
    req: &mut Request,
    depot: &mut Depot,
    res: &mut Response,
    ctrl: &mut FlowCtrl,
) {
    depot.insert_actor(TEST_CUSTOMER);
    ctrl.call_next(req, depot, res).await;
}

#[salvo::handler]
pub(crate) async fn inject_admin(
    req: &mut Request,
    depot: &mut Depot,
    res: &mut Response,
    ctrl: &mut FlowCtrl,
) {
    depot.insert_actor(TEST_ADMIN);
    ctrl.call_next(req, depot, res).await;
}

fn strict_auth_mock() -> MockAuthService {
    let mut auth = MockAuthService::new();

    auth.expect_authenticate_bearer().never();

    auth
}

fn strict_carts_mock() -> MockCartsService {
    let mut carts = MockCartsService::new();

    carts.expect_get_cart().never();
    carts.expect_add_item().never();
    carts.expect_update_item().never();
    carts.expect_remove_item().never();
    carts.expect_clear_cart().never();
    carts.expect_cart_summary().never();

    carts
}

fn strict_orders_mock() -> MockOrdersService {
    let mut orders = MockOrdersService::new();

    orders.expect_place_order().never();
    orders.expect_get_order().never();
    orders.expect_list_orders().never();
    orders.expect_list_all_orders().never();
    orders.expect_cancel_order().never();
    orders.expect_set_status().never();
    orders.expect_record_payment().never();

    orders
}

fn app_context(carts: MockCartsService, orders: MockOrdersService, auth: MockAuthService) -> AppContext {
    AppContext {
        products: Arc::new(MockProductsService::new()),
        inventory: Arc::new(MockInventoryService::new()),
        carts: Arc::new(carts),
        orders: Arc::new(orders),
        users: Arc::new(MockUsersService::new()),
        auth: Arc::new(auth),
    }
}

fn state(app: AppContext) -> Arc<State> {
    Arc::new(State::new(app, TEST_PAYMENT_SECRET.to_string()))
}

pub(crate) fn state_with_auth(auth: MockAuthService) -> Arc<State> {
    state(app_context(strict_carts_mock(), strict_orders_mock(), auth))
}

pub(crate) fn carts_service(carts: MockCartsService, route: Router) -> Service {
    Service::new(
        Router::new()
            .hoop(inject(state(app_context(
                carts,
                strict_orders_mock(),
                strict_auth_mock(),
            ))))
            .hoop(inject_customer)
            .push(route),
    )
}

pub(crate) fn orders_service(orders: MockOrdersService, route: Router) -> Service {
    Service::new(
        Router::new()
            .hoop(inject(state(app_context(
                strict_carts_mock(),
                orders,
                strict_auth_mock(),
            ))))
            .hoop(inject_customer)
            .push(route),
    )
}

pub(crate) fn admin_orders_service(orders: MockOrdersService, route: Router) -> Service {
    Service::new(
        Router::new()
            .hoop(inject(state(app_context(
                strict_carts_mock(),
                orders,
                strict_auth_mock(),
            ))))
            .hoop(inject_admin)
            .push(route),
    )
}

/// No actor is injected: the payment callback is authenticated by its signature.
pub(crate) fn payments_service(orders: MockOrdersService, route: Router) -> Service {
    Service::new(
        Router::new()
            .hoop(inject(state(app_context(
                strict_carts_mock(),
                orders,
                strict_auth_mock(),
            ))))
            .push(route),
    )
}

pub(crate) fn make_cart_item(uuid: CartItemUuid, quantity: u32) -> CartItem {
    CartItem {
        uuid,
        product_uuid: ProductUuid::from_uuid(Uuid::from_u128(7)),
        product_name: "Linen Shirt".to_string(),
        product_image: None,
        sku: "SHIRT-1".to_string(),
        quantity,
        variants: vec![Variant::new("size", "M")],
        price: 50_00,
        stock_status: StockStatus::InStock,
        added_at: Timestamp::UNIX_EPOCH,
        updated_at: Timestamp::UNIX_EPOCH,
    }
}

pub(crate) fn make_cart(items: Vec<CartItem>) -> Cart {
    let total_items = items.iter().map(|item| u64::from(item.quantity)).sum();
    let total_amount = items
        .iter()
        .map(|item| item.price * u64::from(item.quantity))
        .sum();

    Cart {
        uuid: CartUuid::from_uuid(Uuid::from_u128(3)),
        user_uuid: TEST_USER_UUID,
        items,
        total_items,
        total_amount,
        created_at: Timestamp::UNIX_EPOCH,
        updated_at: Timestamp::UNIX_EPOCH,
    }
}

pub(crate) fn make_address() -> Address {
    Address {
        first_name: "Ada".to_string(),
        last_name: "Lovelace".to_string(),
        address_line_1: "12 St James's Square".to_string(),
        address_line_2: None,
        city: "London".to_string(),
        state: "London".to_string(),
        zip_code: "SW1Y 4JH".to_string(),
        country: "GB".to_string(),
        phone: None,
    }
}

pub(crate) fn make_order(uuid: OrderUuid, status: OrderStatus) -> Order {
    Order {
        uuid,
        order_number: "ORD-1700000000000-ABC123".to_string(),
        user_uuid: TEST_USER_UUID,
        items: vec![OrderItem {
            uuid: OrderItemUuid::from_uuid(Uuid::from_u128(9)),
            product_uuid: ProductUuid::from_uuid(Uuid::from_u128(7)),
            product_name: "Linen Shirt".to_string(),
            product_image: None,
            sku: "SHIRT-1".to_string(),
            quantity: 2,
            variants: vec![Variant::new("size", "M")],
            unit_price: 50_00,
            line_total: 100_00,
        }],
        subtotal: 100_00,
        tax_amount: 8_00,
        shipping_cost: 15_00,
        total_amount: 123_00,
        shipping_address: make_address(),
        billing_address: make_address(),
        payment_method: PaymentMethod::CreditCard,
        payment_status: PaymentStatus::Pending,
        status,
        status_history: vec![StatusHistoryEntry {
            status: OrderStatus::Pending,
            note: Some("Order placed".to_string()),
            updated_by: None,
            created_at: Timestamp::UNIX_EPOCH,
        }],
        customer_notes: None,
        cancellation_reason: None,
        cancelled_at: None,
        cancelled_by: None,
        tracking_number: None,
        actual_delivery_date: None,
        created_at: Timestamp::UNIX_EPOCH,
        updated_at: Timestamp::UNIX_EPOCH,
    }
}
