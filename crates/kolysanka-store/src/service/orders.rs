//! # Order Service
//!
//! Order creation and the status workflow over the `orders` collection.
//!
//! ## Order Lifecycle
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │  1. CHECKOUT                                                 │
//! │     └── checkout(customer) → Order { status: Pending }       │
//! │         (order append + cart clear in ONE transaction)       │
//! │                                                              │
//! │  2. FULFILMENT                                               │
//! │     └── set_status(id, Confirmed)                            │
//! │     └── set_status(id, Processing)                           │
//! │     └── set_status(id, Shipped)                              │
//! │     └── set_status(id, Delivered)                            │
//! │                                                              │
//! │  (CANCEL) set_status(id, Cancelled) from any non-terminal    │
//! │           status; transitions outside the table are rejected │
//! └──────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use tokio::sync::broadcast;
use tracing::{debug, info};
use uuid::Uuid;

use kolysanka_core::{Cart, CartItem, CoreError, CustomerInfo, Money, Order, OrderStatus};

use crate::error::{StoreError, StoreResult};
use crate::event::StoreEvent;
use crate::kv::{self, keys};

/// Dashboard summary derived from the orders collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderStats {
    pub total_orders: usize,
    pub pending_orders: usize,
    /// Sum of totals over confirmed, processing, shipped, and delivered
    /// orders.
    pub revenue: Money,
}

/// Service for order operations.
#[derive(Debug, Clone)]
pub struct OrderService {
    pool: SqlitePool,
    events: broadcast::Sender<StoreEvent>,
}

impl OrderService {
    /// Creates a new OrderService.
    pub fn new(pool: SqlitePool, events: broadcast::Sender<StoreEvent>) -> Self {
        OrderService { pool, events }
    }

    /// Records an order from an item snapshot.
    ///
    /// The total is computed from the snapshot here and never
    /// recomputed. The cart is not touched; see
    /// [`checkout`](Self::checkout) for the combined operation.
    pub async fn create(&self, items: Vec<CartItem>, customer: CustomerInfo) -> StoreResult<Order> {
        let order = build_order(items, customer, Utc::now())?;

        let mut orders = self.list().await?;
        orders.push(order.clone());
        kv::write_value(&self.pool, keys::ORDERS, &orders).await?;

        info!(
            id = %order.id,
            order_number = %order.order_number,
            total = %order.total_amount,
            "order recorded"
        );

        Ok(order)
    }

    /// Creates an order from the current cart and clears the cart, in
    /// one transaction.
    ///
    /// Either both writes commit or neither does, so an interrupted
    /// checkout can never leave a recorded order with a still-full
    /// cart (or vice versa).
    pub async fn checkout(&self, customer: CustomerInfo) -> StoreResult<Order> {
        let mut tx = self.pool.begin().await?;

        let cart: Cart = kv::read_value(&mut *tx, keys::CART)
            .await?
            .unwrap_or_default();
        if cart.is_empty() {
            return Err(StoreError::EmptyCart);
        }

        let order = build_order(cart.into_items(), customer, Utc::now())?;

        let mut orders: Vec<Order> = kv::read_value(&mut *tx, keys::ORDERS)
            .await?
            .unwrap_or_default();
        orders.push(order.clone());

        kv::write_value(&mut *tx, keys::ORDERS, &orders).await?;
        kv::write_value(&mut *tx, keys::CART, &Cart::new()).await?;

        tx.commit().await?;

        info!(
            id = %order.id,
            order_number = %order.order_number,
            total = %order.total_amount,
            "checkout complete, cart cleared"
        );

        let _ = self.events.send(StoreEvent::CartChanged);

        Ok(order)
    }

    /// Lists all orders in insertion order.
    pub async fn list(&self) -> StoreResult<Vec<Order>> {
        let orders = kv::read_value(&self.pool, keys::ORDERS).await?;
        Ok(orders.unwrap_or_default())
    }

    /// Lists orders newest first, the admin panel's display order.
    pub async fn list_recent(&self) -> StoreResult<Vec<Order>> {
        let mut orders = self.list().await?;
        orders.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(orders)
    }

    /// Gets an order by id.
    pub async fn get(&self, id: &str) -> StoreResult<Option<Order>> {
        let orders = self.list().await?;
        Ok(orders.into_iter().find(|o| o.id == id))
    }

    /// Moves an order to a new status.
    ///
    /// ## Returns
    /// * `Ok(Order)` - the updated record
    /// * `Err(StoreError::NotFound)` - unknown id
    /// * `Err(StoreError::Core(InvalidTransition))` - the transition
    ///   table forbids the move
    pub async fn set_status(&self, id: &str, new_status: OrderStatus) -> StoreResult<Order> {
        debug!(id = %id, new_status = %new_status, "setting order status");

        let mut orders = self.list().await?;
        let order = orders
            .iter_mut()
            .find(|o| o.id == id)
            .ok_or_else(|| StoreError::not_found("Order", id))?;

        if !order.status.can_transition_to(new_status) {
            return Err(CoreError::InvalidTransition {
                from: order.status,
                to: new_status,
            }
            .into());
        }

        order.status = new_status;
        let updated = order.clone();

        kv::write_value(&self.pool, keys::ORDERS, &orders).await?;

        Ok(updated)
    }

    /// Computes the dashboard summary.
    pub async fn stats(&self) -> StoreResult<OrderStats> {
        let orders = self.list().await?;

        let pending_orders = orders
            .iter()
            .filter(|o| o.status == OrderStatus::Pending)
            .count();
        let revenue = orders
            .iter()
            .filter(|o| o.status.counts_as_revenue())
            .map(|o| o.total_amount)
            .sum();

        Ok(OrderStats {
            total_orders: orders.len(),
            pending_orders,
            revenue,
        })
    }
}

/// Validates the inputs and assembles the order record.
fn build_order(
    items: Vec<CartItem>,
    customer: CustomerInfo,
    now: DateTime<Utc>,
) -> StoreResult<Order> {
    customer.validate()?;
    if items.is_empty() {
        return Err(CoreError::EmptyOrder.into());
    }

    let total_amount: Money = items.iter().map(CartItem::line_total).sum();

    Ok(Order {
        id: Uuid::new_v4().to_string(),
        order_number: generate_order_number(now),
        items,
        total_amount,
        customer,
        status: OrderStatus::Pending,
        created_at: now,
    })
}

/// Generates the customer-facing order reference.
///
/// ## Format
/// `ORD-<unix millis>-<3-digit suffix>`, e.g. `ORD-1754640000000-482`.
/// The suffix disambiguates orders created within the same millisecond.
fn generate_order_number(now: DateTime<Utc>) -> String {
    let suffix = (Uuid::new_v4().as_u128() % 1000) as u32;
    format!("ORD-{}-{:03}", now.timestamp_millis(), suffix)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Store, StoreConfig};
    use kolysanka_core::{Category, Product};

    async fn test_store() -> Store {
        Store::new(StoreConfig::in_memory()).await.unwrap()
    }

    fn test_product(id: &str, price_major: i64) -> Product {
        Product {
            id: id.to_string(),
            name: format!("Товар {}", id),
            description: String::new(),
            price: Money::from_major(price_major),
            images: vec![],
            category: Category::Newborn,
            sizes: vec!["0-3m".to_string()],
            colors: vec!["білий".to_string()],
            in_stock: true,
            stock_quantity: 10,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn entry(id: &str, price_major: i64, qty: i64) -> CartItem {
        CartItem {
            product: test_product(id, price_major),
            quantity: qty,
            size: "0-3m".to_string(),
            color: "білий".to_string(),
        }
    }

    fn customer() -> CustomerInfo {
        CustomerInfo {
            name: "Оксана".to_string(),
            phone: "+380671234567".to_string(),
            email: None,
        }
    }

    #[tokio::test]
    async fn test_create_computes_total_from_snapshot() {
        let store = test_store().await;

        let order = store
            .orders()
            .create(vec![entry("a", 450, 2), entry("b", 650, 1)], customer())
            .await
            .unwrap();

        assert_eq!(order.total_amount, Money::from_major(1550));
        assert_eq!(order.status, OrderStatus::Pending);
        assert!(order.order_number.starts_with("ORD-"));

        let listed = store.orders().list().await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0], order);
    }

    #[tokio::test]
    async fn test_create_rejects_empty_snapshot_and_bad_customer() {
        let store = test_store().await;

        assert!(store.orders().create(vec![], customer()).await.is_err());

        let bad_customer = CustomerInfo {
            name: String::new(),
            phone: "+380671234567".to_string(),
            email: None,
        };
        assert!(store
            .orders()
            .create(vec![entry("a", 450, 1)], bad_customer)
            .await
            .is_err());
    }

    #[tokio::test]
    async fn test_checkout_records_order_and_clears_cart() {
        let store = test_store().await;

        store.cart().add(entry("a", 450, 2)).await.unwrap();
        store.cart().add(entry("b", 650, 1)).await.unwrap();

        let order = store.orders().checkout(customer()).await.unwrap();

        assert_eq!(order.total_amount, Money::from_major(1550));
        assert_eq!(order.items.len(), 2);
        assert!(store.cart().get().await.unwrap().is_empty());
        assert_eq!(store.orders().list().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_checkout_empty_cart_records_nothing() {
        let store = test_store().await;

        let err = store.orders().checkout(customer()).await.unwrap_err();
        assert!(matches!(err, StoreError::EmptyCart));
        assert!(store.orders().list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_checkout_broadcasts_cart_changed() {
        let store = test_store().await;
        store.cart().add(entry("a", 450, 1)).await.unwrap();

        let mut rx = store.subscribe();
        store.orders().checkout(customer()).await.unwrap();

        assert_eq!(rx.try_recv().unwrap(), StoreEvent::CartChanged);
    }

    #[tokio::test]
    async fn test_set_status_follows_transition_table() {
        let store = test_store().await;
        let orders = store.orders();

        let order = orders
            .create(vec![entry("a", 450, 1)], customer())
            .await
            .unwrap();

        let confirmed = orders
            .set_status(&order.id, OrderStatus::Confirmed)
            .await
            .unwrap();
        assert_eq!(confirmed.status, OrderStatus::Confirmed);

        // Everything else about the record is untouched
        assert_eq!(confirmed.id, order.id);
        assert_eq!(confirmed.items, order.items);
        assert_eq!(confirmed.total_amount, order.total_amount);
        assert_eq!(confirmed.created_at, order.created_at);

        let listed = orders.get(&order.id).await.unwrap().unwrap();
        assert_eq!(listed.status, OrderStatus::Confirmed);
    }

    #[tokio::test]
    async fn test_set_status_rejects_forbidden_transition() {
        let store = test_store().await;
        let orders = store.orders();

        let order = orders
            .create(vec![entry("a", 450, 1)], customer())
            .await
            .unwrap();

        let err = orders
            .set_status(&order.id, OrderStatus::Shipped)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            StoreError::Core(CoreError::InvalidTransition { .. })
        ));

        // Status unchanged after the rejection
        let listed = orders.get(&order.id).await.unwrap().unwrap();
        assert_eq!(listed.status, OrderStatus::Pending);
    }

    #[tokio::test]
    async fn test_set_status_unknown_id_is_not_found() {
        let store = test_store().await;

        let err = store
            .orders()
            .set_status("no-such-id", OrderStatus::Confirmed)
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_list_recent_sorts_newest_first() {
        let store = test_store().await;
        let orders = store.orders();

        let first = orders
            .create(vec![entry("a", 450, 1)], customer())
            .await
            .unwrap();
        let second = orders
            .create(vec![entry("b", 650, 1)], customer())
            .await
            .unwrap();

        let recent = orders.list_recent().await.unwrap();
        assert_eq!(recent[0].id, second.id);
        assert_eq!(recent[1].id, first.id);
    }

    #[tokio::test]
    async fn test_stats() {
        let store = test_store().await;
        let orders = store.orders();

        let a = orders
            .create(vec![entry("a", 450, 2)], customer())
            .await
            .unwrap();
        let _b = orders
            .create(vec![entry("b", 650, 1)], customer())
            .await
            .unwrap();

        orders.set_status(&a.id, OrderStatus::Confirmed).await.unwrap();

        let stats = orders.stats().await.unwrap();
        assert_eq!(stats.total_orders, 2);
        assert_eq!(stats.pending_orders, 1);
        // Only the confirmed order counts as revenue
        assert_eq!(stats.revenue, Money::from_major(900));
    }
}
