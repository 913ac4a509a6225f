//! # kolysanka-store: Persistence Layer for the Kolysanka Storefront
//!
//! This crate owns every read and write of the persistence medium: a
//! local SQLite file holding one JSON blob per logical collection.
//!
//! ## Architecture Position
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                   Kolysanka Data Flow                        │
//! │                                                              │
//! │  Caller (UI layer, out of tree)                              │
//! │       │                                                      │
//! │       ▼                                                      │
//! │  ┌────────────────────────────────────────────────────────┐  │
//! │  │              kolysanka-store (THIS CRATE)              │  │
//! │  │                                                        │  │
//! │  │  ┌──────────┐  ┌───────────────┐  ┌────────────────┐   │  │
//! │  │  │  Store   │  │   Services    │  │   Migrations   │   │  │
//! │  │  │ (pool.rs)│  │ catalog/cart/ │  │   (embedded)   │   │  │
//! │  │  │          │◄─│ orders/session│  │                │   │  │
//! │  │  └──────────┘  └───────────────┘  └────────────────┘   │  │
//! │  └────────────────────────────────────────────────────────┘  │
//! │       │                                                      │
//! │       ▼                                                      │
//! │  SQLite file: collections(key, value) — JSON per collection  │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - `Store` handle, pool creation and configuration
//! - [`kv`] - collection keys and the generic JSON read/write pair
//! - [`migrations`] - embedded schema migrations
//! - [`seed`] - first-access defaults (sample catalog, admin record)
//! - [`event`] - cart-change broadcast
//! - [`service`] - catalog, cart, orders, and session services
//! - [`error`] - store error types
//!
//! ## Usage
//!
//! ```rust,ignore
//! use kolysanka_store::{Store, StoreConfig};
//!
//! let store = Store::new(StoreConfig::new("./kolysanka.db")).await?;
//!
//! let products = store.catalog().list().await?;
//! store.cart().add(item).await?;
//! let order = store.orders().checkout(customer).await?;
//! ```

pub mod error;
pub mod event;
pub mod kv;
pub mod migrations;
pub mod pool;
pub mod seed;
pub mod service;

pub use error::{StoreError, StoreResult};
pub use event::StoreEvent;
pub use pool::{Store, StoreConfig};

// Service re-exports for convenience
pub use service::cart::CartService;
pub use service::catalog::CatalogService;
pub use service::orders::{OrderService, OrderStats};
pub use service::session::SessionService;

// =============================================================================
// Cross-Instance Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use kolysanka_core::{Money, ProductPatch};

    fn init_tracing() {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .try_init();
    }

    /// Collections written by one store instance read back deep-equal
    /// from a second instance over the same file.
    #[tokio::test]
    async fn test_collections_survive_reopen() {
        init_tracing();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("kolysanka.db");

        let first = Store::new(StoreConfig::new(&path)).await.unwrap();
        let seeded = first.catalog().list().await.unwrap();
        let updated = first
            .catalog()
            .update(
                &seeded[0].id,
                ProductPatch {
                    price: Some(Money::from_major(500)),
                    ..ProductPatch::default()
                },
            )
            .await
            .unwrap();
        first.close().await;

        let second = Store::new(StoreConfig::new(&path)).await.unwrap();
        let reread = second.catalog().list().await.unwrap();

        assert_eq!(reread.len(), 3);
        let survived = reread.iter().find(|p| p.id == updated.id).unwrap();
        assert_eq!(survived, &updated);
    }

    /// The admin record seeds once; a reopened store sees the same hash.
    #[tokio::test]
    async fn test_admin_seed_is_stable_across_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("kolysanka.db");

        let first = Store::new(StoreConfig::new(&path)).await.unwrap();
        let admin = first.session().admin().await.unwrap();
        first.close().await;

        let second = Store::new(StoreConfig::new(&path)).await.unwrap();
        let again = second.session().admin().await.unwrap();

        assert_eq!(again, admin);
    }
}
