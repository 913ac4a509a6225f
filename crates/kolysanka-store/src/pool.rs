//! # Store Handle and Configuration
//!
//! Connection pool creation and the `Store` façade.
//!
//! ## Lifecycle
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │  App startup                                                 │
//! │       │                                                      │
//! │       ▼                                                      │
//! │  StoreConfig::new(path) ← configure pool settings            │
//! │       │                                                      │
//! │       ▼                                                      │
//! │  Store::new(config).await ← create pool + run migrations     │
//! │       │                                                      │
//! │       ▼                                                      │
//! │  store.catalog() / store.cart() / store.orders() /           │
//! │  store.session()                                             │
//! │       │                                                      │
//! │       ▼                                                      │
//! │  Every caller receives the handle by reference; there is no  │
//! │  global singleton.                                           │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## WAL Mode
//! SQLite WAL (Write-Ahead Logging) mode is enabled for file-backed
//! stores: readers don't block the writer and crash recovery is better
//! than rollback-journal mode.

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use sqlx::SqlitePool;
use std::path::PathBuf;
use std::time::Duration;
use tokio::sync::broadcast;
use tracing::{debug, info};

use crate::error::{StoreError, StoreResult};
use crate::event::StoreEvent;
use crate::migrations;
use crate::service::cart::CartService;
use crate::service::catalog::CatalogService;
use crate::service::orders::OrderService;
use crate::service::session::SessionService;

/// Sentinel path for an in-memory store.
const MEMORY_PATH: &str = ":memory:";

/// Capacity of the cart-change broadcast channel.
const EVENT_CHANNEL_CAPACITY: usize = 32;

// =============================================================================
// Configuration
// =============================================================================

/// Store configuration.
///
/// ## Example
/// ```rust,ignore
/// let config = StoreConfig::new("./data/kolysanka.db")
///     .max_connections(5)
///     .min_connections(1);
/// ```
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Path to the SQLite database file.
    pub database_path: PathBuf,

    /// Maximum number of connections in the pool.
    /// Default: 5 (plenty for a single-operator storefront)
    pub max_connections: u32,

    /// Minimum number of connections to keep alive.
    /// Default: 1
    pub min_connections: u32,

    /// Connection acquire timeout.
    /// Default: 30 seconds
    pub connect_timeout: Duration,

    /// Idle timeout before closing a connection.
    /// Default: 10 minutes
    pub idle_timeout: Duration,

    /// Whether to run migrations on connect.
    /// Default: true
    pub run_migrations: bool,
}

impl StoreConfig {
    /// Creates a configuration for a file-backed store at `path`.
    /// The file is created on first connect if it doesn't exist.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        StoreConfig {
            database_path: path.into(),
            max_connections: 5,
            min_connections: 1,
            connect_timeout: Duration::from_secs(30),
            idle_timeout: Duration::from_secs(600),
            run_migrations: true,
        }
    }

    /// Sets the maximum number of connections.
    pub fn max_connections(mut self, max: u32) -> Self {
        self.max_connections = max;
        self
    }

    /// Sets the minimum number of connections.
    pub fn min_connections(mut self, min: u32) -> Self {
        self.min_connections = min;
        self
    }

    /// Sets the connection acquire timeout.
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Sets whether to run migrations on connect.
    pub fn run_migrations(mut self, run: bool) -> Self {
        self.run_migrations = run;
        self
    }

    /// Creates an in-memory store configuration (for testing).
    ///
    /// A single connection is required: every SQLite `:memory:`
    /// connection is its own database.
    pub fn in_memory() -> Self {
        StoreConfig {
            database_path: PathBuf::from(MEMORY_PATH),
            max_connections: 1,
            min_connections: 1,
            connect_timeout: Duration::from_secs(5),
            idle_timeout: Duration::from_secs(60),
            run_migrations: true,
        }
    }

    fn is_in_memory(&self) -> bool {
        self.database_path.as_os_str() == MEMORY_PATH
    }
}

// =============================================================================
// Store
// =============================================================================

/// Handle to the persistent store, providing typed service access.
///
/// Constructed once at process start and passed by reference (or cheap
/// clone) to every caller; all services route through it and nothing
/// else touches the persistence medium.
///
/// ## Usage
/// ```rust,ignore
/// let store = Store::new(StoreConfig::new("./kolysanka.db")).await?;
///
/// let products = store.catalog().list().await?;
/// store.cart().add(item).await?;
/// ```
#[derive(Debug, Clone)]
pub struct Store {
    pool: SqlitePool,

    /// Cart-change broadcast; concurrently-rendered views subscribe to
    /// refresh after any cart mutation.
    events: broadcast::Sender<StoreEvent>,
}

impl Store {
    /// Opens the store.
    ///
    /// ## What This Does
    /// 1. Creates the database file if it doesn't exist
    /// 2. Configures SQLite (WAL journal, NORMAL synchronous)
    /// 3. Creates the connection pool
    /// 4. Runs migrations (if enabled)
    pub async fn new(config: StoreConfig) -> StoreResult<Self> {
        info!(
            path = %config.database_path.display(),
            "opening store"
        );

        let connect_options = if config.is_in_memory() {
            SqliteConnectOptions::new().in_memory(true)
        } else {
            SqliteConnectOptions::new()
                .filename(&config.database_path)
                .create_if_missing(true)
                // WAL: readers don't block the writer
                .journal_mode(SqliteJournalMode::Wal)
                // NORMAL: durable against corruption, may lose the last
                // transaction on power failure
                .synchronous(SqliteSynchronous::Normal)
        };

        debug!("connection options configured");

        let pool = SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .acquire_timeout(config.connect_timeout)
            .idle_timeout(Some(config.idle_timeout))
            .connect_with(connect_options)
            .await
            .map_err(|e| StoreError::ConnectionFailed(e.to_string()))?;

        info!(
            max_connections = config.max_connections,
            "store pool created"
        );

        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        let store = Store { pool, events };

        if config.run_migrations {
            migrations::run_migrations(&store.pool).await?;
        }

        Ok(store)
    }

    /// Returns a reference to the connection pool.
    ///
    /// For diagnostics and tests; prefer the service accessors.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Returns the catalog service.
    pub fn catalog(&self) -> CatalogService {
        CatalogService::new(self.pool.clone())
    }

    /// Returns the cart service.
    pub fn cart(&self) -> CartService {
        CartService::new(self.pool.clone(), self.events.clone())
    }

    /// Returns the order service.
    pub fn orders(&self) -> OrderService {
        OrderService::new(self.pool.clone(), self.events.clone())
    }

    /// Returns the admin session service.
    pub fn session(&self) -> SessionService {
        SessionService::new(self.pool.clone())
    }

    /// Subscribes to store events (currently cart changes).
    ///
    /// Receivers that lag are disconnected by the broadcast channel and
    /// should resubscribe; missing an event only delays a refresh.
    pub fn subscribe(&self) -> broadcast::Receiver<StoreEvent> {
        self.events.subscribe()
    }

    /// Checks if the store is healthy (can execute queries).
    pub async fn health_check(&self) -> bool {
        sqlx::query("SELECT 1").execute(&self.pool).await.is_ok()
    }

    /// Closes the connection pool.
    ///
    /// After calling close, all service operations will fail.
    pub async fn close(&self) {
        info!("closing store pool");
        self.pool.close().await;
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_in_memory_store() {
        let store = Store::new(StoreConfig::in_memory()).await.unwrap();

        assert!(store.health_check().await);
    }

    #[tokio::test]
    async fn test_config_builder() {
        let config = StoreConfig::new("/tmp/test.db")
            .max_connections(10)
            .min_connections(2)
            .run_migrations(false);

        assert_eq!(config.max_connections, 10);
        assert_eq!(config.min_connections, 2);
        assert!(!config.run_migrations);
    }
}
