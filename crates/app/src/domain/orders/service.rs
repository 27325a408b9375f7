//! Orders service.

use std::{fmt, sync::Arc};

use async_trait::async_trait;
use jiff::Timestamp;
use mockall::automock;
use rustc_hash::FxHashMap;
use sqlx::{
    Acquire, Postgres, Transaction,
    error::{DatabaseError, ErrorKind},
};
use storefront::{
    cart::CartTotals,
    checkout::CheckoutPolicy,
    inventory::StockError,
    money::line_total,
    orders::{OrderStatus, PaymentOutcome, StockMovement, order_number, owner_cancel},
};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::{
    auth::Actor,
    database::Db,
    domain::{
        carts::{
            models::CartItem,
            repositories::{PgCartItemsRepository, PgCartsRepository},
        },
        inventory::repository::PgInventoryRepository,
        orders::{
            errors::OrdersServiceError,
            models::{
                DEFAULT_ALL_ORDERS_LIMIT, DEFAULT_OWN_ORDERS_LIMIT, MAX_ORDERS_LIMIT, Order,
                OrderFilter, OrderItem, OrderItemUuid, OrderPage, OrderUuid, PlaceOrder,
                StatusUpdate,
            },
            repositories::{
                Cancellation, NewOrder, OrderQuery, PgOrderItemsRepository, PgOrdersRepository,
                PgStatusHistoryRepository, StatusChange,
            },
        },
        products::{models::ProductUuid, repository::PgProductsRepository},
        users::{models::UserUuid, repository::PgUsersRepository},
    },
    notifications::OrderNotifier,
};

const ORDER_PLACED_NOTE: &str = "Order placed";
const CUSTOMER_CANCELLED_NOTE: &str = "Cancelled by customer";
const PAYMENT_RECEIVED_NOTE: &str = "Payment received";

/// Order numbers tried before a checkout gives up on a unique clash.
const ORDER_NUMBER_ATTEMPTS: u32 = 5;

fn fresh_order_number() -> String {
    order_number(Timestamp::now().as_millisecond(), rand::random::<u32>())
}

fn is_unique_violation(error: &sqlx::Error) -> bool {
    matches!(
        error.as_database_error().map(DatabaseError::kind),
        Some(ErrorKind::UniqueViolation)
    )
}

/// A status transition about to be applied to a locked order.
#[derive(Debug, Clone, Copy)]
struct Transition<'a> {
    status: OrderStatus,
    note: Option<&'a str>,
    tracking_number: Option<&'a str>,
    reason: Option<&'a str>,
    by: UserUuid,
}

#[derive(Clone)]
pub struct PgOrdersService {
    db: Db,
    policy: CheckoutPolicy,
    notifier: Arc<dyn OrderNotifier>,
    orders_repository: PgOrdersRepository,
    items_repository: PgOrderItemsRepository,
    history_repository: PgStatusHistoryRepository,
    carts_repository: PgCartsRepository,
    cart_items_repository: PgCartItemsRepository,
    products_repository: PgProductsRepository,
    inventory_repository: PgInventoryRepository,
    users_repository: PgUsersRepository,
    next_order_number: fn() -> String,
}

impl fmt::Debug for PgOrdersService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PgOrdersService")
            .field("db", &self.db)
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}

impl PgOrdersService {
    #[must_use]
    pub fn new(db: Db, policy: CheckoutPolicy, notifier: Arc<dyn OrderNotifier>) -> Self {
        Self {
            db,
            policy,
            notifier,
            orders_repository: PgOrdersRepository::new(),
            items_repository: PgOrderItemsRepository::new(),
            history_repository: PgStatusHistoryRepository::new(),
            carts_repository: PgCartsRepository::new(),
            cart_items_repository: PgCartItemsRepository::new(),
            products_repository: PgProductsRepository::new(),
            inventory_repository: PgInventoryRepository::new(),
            users_repository: PgUsersRepository::new(),
            next_order_number: fresh_order_number,
        }
    }

    #[cfg(test)]
    pub(crate) fn with_order_numbers(mut self, next: fn() -> String) -> Self {
        self.next_order_number = next;
        self
    }

    /// Attach items and status history to each order.
    async fn hydrate(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        orders: &mut [Order],
    ) -> Result<(), OrdersServiceError> {
        if orders.is_empty() {
            return Ok(());
        }

        let uuids: Vec<Uuid> = orders.iter().map(|order| order.uuid.into_uuid()).collect();

        let mut items: FxHashMap<OrderUuid, Vec<OrderItem>> = FxHashMap::default();

        for row in self.items_repository.get_order_items(tx, &uuids).await? {
            items.entry(row.order).or_default().push(row.item);
        }

        let mut history: FxHashMap<OrderUuid, Vec<_>> = FxHashMap::default();

        for row in self.history_repository.get_history(tx, &uuids).await? {
            history.entry(row.order).or_default().push(row.entry);
        }

        for order in orders.iter_mut() {
            order.items = items.remove(&order.uuid).unwrap_or_default();
            order.status_history = history.remove(&order.uuid).unwrap_or_default();
        }

        Ok(())
    }

    /// Re-check every cart line against the live catalogue and snapshot it.
    async fn order_items(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        lines: &[CartItem],
    ) -> Result<Vec<OrderItem>, OrdersServiceError> {
        let mut items = Vec::with_capacity(lines.len());

        for line in lines {
            let product = match self.products_repository.get_product(tx, line.product_uuid).await
            {
                Ok(product) if product.is_purchasable() => product,
                Ok(_) | Err(sqlx::Error::RowNotFound) => {
                    return Err(OrdersServiceError::ProductUnavailable(line.product_uuid));
                }
                Err(error) => return Err(error.into()),
            };

            product
                .stock
                .check(line.quantity)
                .map_err(|error| stock_error(product.uuid, error))?;

            items.push(OrderItem {
                uuid: OrderItemUuid::new(),
                product_uuid: product.uuid,
                product_name: product.name,
                product_image: product.image_url,
                sku: product.sku,
                quantity: line.quantity,
                variants: line.variants.clone(),
                unit_price: line.price,
                line_total: line_total(line.price, line.quantity)?,
            });
        }

        Ok(items)
    }

    /// Apply a transition to an order already locked by `tx`.
    ///
    /// Entering `cancelled` hands every line back to inventory and stamps the
    /// cancellation, whoever requested it. Leaving `cancelled` takes the lines
    /// again and fails when they are no longer on hand.
    async fn apply_transition(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        current: &Order,
        transition: Transition<'_>,
    ) -> Result<Order, OrdersServiceError> {
        let movement = StockMovement::between(current.status, transition.status);

        if movement != StockMovement::None {
            let mut items: Vec<OrderItem> = self
                .items_repository
                .get_order_items(tx, &[current.uuid.into_uuid()])
                .await?
                .into_iter()
                .map(|row| row.item)
                .collect();

            items.sort_by_key(|item| item.product_uuid);

            for item in &items {
                match movement {
                    StockMovement::Reserve => {
                        self.inventory_repository
                            .reserve(tx, item.product_uuid, item.quantity)
                            .await?;
                    }
                    StockMovement::Release => {
                        self.inventory_repository
                            .release(tx, item.product_uuid, item.quantity)
                            .await?;
                    }
                    StockMovement::None => {}
                }
            }
        }

        let releasing = movement == StockMovement::Release;

        let change = StatusChange {
            status: transition.status,
            tracking_number: transition.tracking_number,
            cancellation: releasing.then_some(Cancellation {
                reason: transition.reason,
                by: transition.by,
            }),
            delivered: transition.status == OrderStatus::Delivered,
        };

        let updated = self
            .orders_repository
            .update_status(tx, current.uuid, change)
            .await?;

        self.history_repository
            .append(
                tx,
                current.uuid,
                transition.status,
                transition.note,
                Some(transition.by),
            )
            .await?;

        info!(
            order = %current.uuid,
            from = %current.status,
            to = %transition.status,
            stock = ?movement,
            "order status changed"
        );

        Ok(updated)
    }

    async fn page(
        &self,
        user: Option<UserUuid>,
        filter: &OrderFilter,
        default_limit: u32,
    ) -> Result<OrderPage, OrdersServiceError> {
        let limit = filter.limit.unwrap_or(default_limit).clamp(1, MAX_ORDERS_LIMIT);
        let page = filter.page.unwrap_or(1).max(1);
        let offset = u64::from(page - 1) * u64::from(limit);

        let query = OrderQuery {
            user,
            filter,
            limit,
            offset,
        };

        let mut tx = self.db.begin().await?;

        let total = self.orders_repository.count_orders(&mut tx, query).await?;
        let mut orders = self.orders_repository.list_orders(&mut tx, query).await?;

        self.hydrate(&mut tx, &mut orders).await?;

        tx.commit().await?;

        Ok(OrderPage {
            orders,
            total,
            page,
            limit,
        })
    }
}

fn stock_error(product: ProductUuid, error: StockError) -> OrdersServiceError {
    match error {
        StockError::Insufficient { available } => {
            OrdersServiceError::InsufficientStock { product, available }
        }
    }
}

#[async_trait]
impl OrdersService for PgOrdersService {
    async fn place_order(
        &self,
        user: UserUuid,
        request: PlaceOrder,
    ) -> Result<Order, OrdersServiceError> {
        request.shipping_address.validate()?;

        let billing_address = request
            .billing_address
            .unwrap_or_else(|| request.shipping_address.clone());

        billing_address.validate()?;

        let mut tx = self.db.begin().await?;

        let cart = self
            .carts_repository
            .find_cart(&mut tx, user)
            .await?
            .ok_or(OrdersServiceError::EmptyCart)?;

        let lines = self
            .cart_items_repository
            .get_cart_items(&mut tx, cart.uuid)
            .await?;

        if lines.is_empty() {
            return Err(OrdersServiceError::EmptyCart);
        }

        let items = self.order_items(&mut tx, &lines).await?;
        let totals = self.policy.totals(items.iter().map(|item| item.line_total))?;

        let (status, payment_status) = request.payment_method.initial_state();

        let mut attempt = 1;

        let mut order = loop {
            let number = (self.next_order_number)();
            let mut savepoint = Acquire::begin(&mut *tx).await?;

            let created = self
                .orders_repository
                .create_order(
                    &mut savepoint,
                    &NewOrder {
                        uuid: OrderUuid::new(),
                        order_number: &number,
                        user,
                        totals,
                        shipping_address: &request.shipping_address,
                        billing_address: &billing_address,
                        payment_method: request.payment_method,
                        payment_status,
                        status,
                        customer_notes: request.customer_notes.as_deref(),
                    },
                )
                .await;

            match created {
                Ok(order) => {
                    savepoint.commit().await?;
                    break order;
                }
                Err(error) if attempt < ORDER_NUMBER_ATTEMPTS && is_unique_violation(&error) => {
                    savepoint.rollback().await?;
                    debug!(order_number = %number, attempt, "order number taken, retrying");
                    attempt += 1;
                }
                Err(error) => return Err(error.into()),
            }
        };

        order.items = self
            .items_repository
            .create_order_items(&mut tx, order.uuid, &items)
            .await?;

        let placed = self
            .history_repository
            .append(&mut tx, order.uuid, status, Some(ORDER_PLACED_NOTE), Some(user))
            .await?;

        order.status_history.push(placed);

        let mut reservations: Vec<_> = order
            .items
            .iter()
            .map(|item| (item.product_uuid, item.quantity))
            .collect();

        reservations.sort_by_key(|(product, _)| *product);

        for (product, quantity) in reservations {
            self.inventory_repository
                .reserve(&mut tx, product, quantity)
                .await?;
        }

        self.cart_items_repository
            .delete_cart_items(&mut tx, cart.uuid)
            .await?;

        self.carts_repository
            .update_totals(&mut tx, cart.uuid, CartTotals::default())
            .await?;

        let owner = self
            .users_repository
            .get_user(&mut tx, user)
            .await
            .map_err(|error| match error {
                sqlx::Error::RowNotFound => OrdersServiceError::InvalidReference,
                other => other.into(),
            })?;

        tx.commit().await?;

        info!(
            order_number = %order.order_number,
            %user,
            total = order.total_amount,
            items = order.items.len(),
            "order placed"
        );

        if let Err(error) = self.notifier.send_order_confirmation(&order, &owner).await {
            warn!(order_number = %order.order_number, %error, "order confirmation not sent");
        }

        Ok(order)
    }

    async fn get_order(&self, actor: Actor, order: OrderUuid) -> Result<Order, OrdersServiceError> {
        let mut tx = self.db.begin().await?;

        let mut found = self.orders_repository.get_order(&mut tx, order).await?;

        if found.user_uuid != actor.user && !actor.is_admin() {
            return Err(OrdersServiceError::Unauthorized);
        }

        self.hydrate(&mut tx, std::slice::from_mut(&mut found)).await?;

        tx.commit().await?;

        Ok(found)
    }

    async fn list_orders(
        &self,
        actor: Actor,
        filter: OrderFilter,
    ) -> Result<OrderPage, OrdersServiceError> {
        self.page(Some(actor.user), &filter, DEFAULT_OWN_ORDERS_LIMIT)
            .await
    }

    async fn list_all_orders(
        &self,
        actor: Actor,
        filter: OrderFilter,
    ) -> Result<OrderPage, OrdersServiceError> {
        if !actor.is_admin() {
            return Err(OrdersServiceError::Unauthorized);
        }

        self.page(None, &filter, DEFAULT_ALL_ORDERS_LIMIT).await
    }

    async fn cancel_order(
        &self,
        actor: Actor,
        order: OrderUuid,
        reason: Option<String>,
    ) -> Result<Order, OrdersServiceError> {
        let mut tx = self.db.begin().await?;

        let current = self.orders_repository.lock_order(&mut tx, order).await?;

        if current.user_uuid != actor.user {
            return Err(OrdersServiceError::Unauthorized);
        }

        owner_cancel(current.status)?;

        let mut updated = self
            .apply_transition(
                &mut tx,
                &current,
                Transition {
                    status: OrderStatus::Cancelled,
                    note: Some(reason.as_deref().unwrap_or(CUSTOMER_CANCELLED_NOTE)),
                    tracking_number: None,
                    reason: reason.as_deref(),
                    by: actor.user,
                },
            )
            .await?;

        self.hydrate(&mut tx, std::slice::from_mut(&mut updated))
            .await?;

        tx.commit().await?;

        Ok(updated)
    }

    async fn set_status(
        &self,
        actor: Actor,
        order: OrderUuid,
        update: StatusUpdate,
    ) -> Result<Order, OrdersServiceError> {
        if !actor.is_admin() {
            return Err(OrdersServiceError::Unauthorized);
        }

        let status: OrderStatus = update.status.parse()?;

        let mut tx = self.db.begin().await?;

        let current = self.orders_repository.lock_order(&mut tx, order).await?;

        let mut updated = self
            .apply_transition(
                &mut tx,
                &current,
                Transition {
                    status,
                    note: update.note.as_deref(),
                    tracking_number: update.tracking_number.as_deref(),
                    reason: update.note.as_deref(),
                    by: actor.user,
                },
            )
            .await?;

        self.hydrate(&mut tx, std::slice::from_mut(&mut updated))
            .await?;

        tx.commit().await?;

        Ok(updated)
    }

    async fn record_payment(
        &self,
        order: OrderUuid,
        outcome: PaymentOutcome,
    ) -> Result<Order, OrdersServiceError> {
        let mut tx = self.db.begin().await?;

        let current = self.orders_repository.lock_order(&mut tx, order).await?;

        let (status, payment_status) = outcome.apply(current.status);

        let mut updated = self
            .orders_repository
            .update_payment(&mut tx, order, status, payment_status)
            .await?;

        if outcome == PaymentOutcome::Succeeded {
            self.history_repository
                .append(&mut tx, order, status, Some(PAYMENT_RECEIVED_NOTE), None)
                .await?;
        }

        self.hydrate(&mut tx, std::slice::from_mut(&mut updated))
            .await?;

        tx.commit().await?;

        debug!(%order, %payment_status, "payment recorded");

        Ok(updated)
    }
}

#[automock]
#[async_trait]
pub trait OrdersService: Send + Sync {
    /// Turn the user's cart into an order, reserving stock and emptying the cart.
    async fn place_order(
        &self,
        user: UserUuid,
        request: PlaceOrder,
    ) -> Result<Order, OrdersServiceError>;

    /// Fetch one order with items and history. Owners and admins only.
    async fn get_order(&self, actor: Actor, order: OrderUuid) -> Result<Order, OrdersServiceError>;

    /// The actor's own orders, newest first.
    async fn list_orders(
        &self,
        actor: Actor,
        filter: OrderFilter,
    ) -> Result<OrderPage, OrdersServiceError>;

    /// Every order, newest first. Admins only.
    async fn list_all_orders(
        &self,
        actor: Actor,
        filter: OrderFilter,
    ) -> Result<OrderPage, OrdersServiceError>;

    /// Owner cancellation, allowed until the order ships.
    async fn cancel_order(
        &self,
        actor: Actor,
        order: OrderUuid,
        reason: Option<String>,
    ) -> Result<Order, OrdersServiceError>;

    /// Administrative status change to any known status.
    async fn set_status(
        &self,
        actor: Actor,
        order: OrderUuid,
        update: StatusUpdate,
    ) -> Result<Order, OrdersServiceError>;

    /// Apply an outcome reported by the payment provider.
    async fn record_payment(
        &self,
        order: OrderUuid,
        outcome: PaymentOutcome,
    ) -> Result<Order, OrdersServiceError>;
}
