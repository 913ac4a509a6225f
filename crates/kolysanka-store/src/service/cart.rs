//! # Cart Service
//!
//! Mutations over the `cart` collection.
//!
//! Merge, quantity, and removal semantics live in
//! [`kolysanka_core::Cart`]; this service adds persistence and the
//! change broadcast. Every successful mutation emits
//! [`StoreEvent::CartChanged`].

use sqlx::SqlitePool;
use tokio::sync::broadcast;
use tracing::debug;

use kolysanka_core::{Cart, CartItem, CartTotals};

use crate::error::StoreResult;
use crate::event::StoreEvent;
use crate::kv::{self, keys};

/// Service for cart operations.
#[derive(Debug, Clone)]
pub struct CartService {
    pool: SqlitePool,
    events: broadcast::Sender<StoreEvent>,
}

impl CartService {
    /// Creates a new CartService.
    pub fn new(pool: SqlitePool, events: broadcast::Sender<StoreEvent>) -> Self {
        CartService { pool, events }
    }

    /// Returns the current cart; absent collection reads as empty.
    pub async fn get(&self) -> StoreResult<Cart> {
        let cart = kv::read_value(&self.pool, keys::CART).await?;
        Ok(cart.unwrap_or_default())
    }

    /// Adds an entry, merging by (product id, size, color).
    pub async fn add(&self, item: CartItem) -> StoreResult<Cart> {
        debug!(
            product_id = %item.product.id,
            size = %item.size,
            color = %item.color,
            quantity = item.quantity,
            "adding to cart"
        );

        let mut cart = self.get().await?;
        cart.add(item)?;
        self.persist(&cart).await?;

        Ok(cart)
    }

    /// Sets the quantity of an entry; zero or less removes it, an
    /// unknown identity key is a no-op.
    pub async fn update_quantity(
        &self,
        product_id: &str,
        size: &str,
        color: &str,
        quantity: i64,
    ) -> StoreResult<Cart> {
        debug!(product_id = %product_id, quantity = quantity, "updating cart quantity");

        let mut cart = self.get().await?;
        cart.update_quantity(product_id, size, color, quantity)?;
        self.persist(&cart).await?;

        Ok(cart)
    }

    /// Removes an entry; no-op when absent.
    pub async fn remove(&self, product_id: &str, size: &str, color: &str) -> StoreResult<Cart> {
        debug!(product_id = %product_id, "removing from cart");

        let mut cart = self.get().await?;
        cart.remove(product_id, size, color);
        self.persist(&cart).await?;

        Ok(cart)
    }

    /// Empties the cart.
    pub async fn clear(&self) -> StoreResult<()> {
        debug!("clearing cart");

        self.persist(&Cart::new()).await
    }

    /// Returns derived totals for the current cart.
    pub async fn totals(&self) -> StoreResult<CartTotals> {
        let cart = self.get().await?;
        Ok(CartTotals::from(&cart))
    }

    /// Writes the cart back and notifies subscribers.
    async fn persist(&self, cart: &Cart) -> StoreResult<()> {
        kv::write_value(&self.pool, keys::CART, cart).await?;

        // No subscribers is the common case outside the UI
        let _ = self.events.send(StoreEvent::CartChanged);

        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Store, StoreConfig};
    use chrono::Utc;
    use kolysanka_core::{Category, Money, Product};

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
            sizes: vec!["0-3m".to_string(), "3-6m".to_string()],
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

    #[tokio::test]
    async fn test_empty_cart_by_default() {
        let store = test_store().await;

        let cart = store.cart().get().await.unwrap();
        assert!(cart.is_empty());
    }

    #[tokio::test]
    async fn test_add_persists_and_merges() {
        let store = test_store().await;
        let cart = store.cart();

        cart.add(entry("a", 450, 2)).await.unwrap();
        cart.add(entry("a", 450, 2)).await.unwrap();

        // Re-read through a fresh service handle
        let persisted = store.cart().get().await.unwrap();
        assert_eq!(persisted.entry_count(), 1);
        assert_eq!(persisted.items()[0].quantity, 4);
    }

    #[tokio::test]
    async fn test_update_quantity_zero_removes() {
        let store = test_store().await;
        let cart = store.cart();

        cart.add(entry("a", 450, 2)).await.unwrap();
        cart.update_quantity("a", "0-3m", "білий", 0).await.unwrap();

        assert!(cart.get().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_update_quantity_unknown_key_is_noop() {
        let store = test_store().await;
        let cart = store.cart();

        cart.add(entry("a", 450, 2)).await.unwrap();
        cart.update_quantity("b", "0-3m", "білий", 7).await.unwrap();

        let persisted = cart.get().await.unwrap();
        assert_eq!(persisted.entry_count(), 1);
        assert_eq!(persisted.items()[0].quantity, 2);
    }

    #[tokio::test]
    async fn test_clear() {
        let store = test_store().await;
        let cart = store.cart();

        cart.add(entry("a", 450, 2)).await.unwrap();
        cart.clear().await.unwrap();

        assert!(cart.get().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_totals() {
        let store = test_store().await;
        let cart = store.cart();

        cart.add(entry("a", 450, 2)).await.unwrap();
        cart.add(entry("b", 650, 1)).await.unwrap();

        let totals = cart.totals().await.unwrap();
        assert_eq!(totals.total_quantity, 3);
        assert_eq!(totals.total_amount, Money::from_major(1550));
    }

    #[tokio::test]
    async fn test_mutations_broadcast_cart_changed() {
        let store = test_store().await;
        let mut rx = store.subscribe();

        store.cart().add(entry("a", 450, 1)).await.unwrap();
        assert_eq!(rx.try_recv().unwrap(), StoreEvent::CartChanged);

        store
            .cart()
            .update_quantity("a", "0-3m", "білий", 3)
            .await
            .unwrap();
        assert_eq!(rx.try_recv().unwrap(), StoreEvent::CartChanged);

        store.cart().clear().await.unwrap();
        assert_eq!(rx.try_recv().unwrap(), StoreEvent::CartChanged);
    }
}
