//! # Store Error Types
//!
//! Error types for persistence operations.
//!
//! ## Error Flow
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │  SQLite error (sqlx::Error)                                  │
//! │       │                                                      │
//! │       ▼                                                      │
//! │  StoreError (this module) ← adds context and categorization  │
//! │       │                                                      │
//! │       ▼                                                      │
//! │  Caller decides: retry, surface to the operator, or abort    │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! Persistence failures are always propagated; the one deliberate
//! exception is a stored value that no longer deserializes, which the
//! read path logs and treats as absent (see `kv`).

use thiserror::Error;

use kolysanka_core::CoreError;

/// Persistence and service errors.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Record not found inside a collection.
    ///
    /// ## When This Occurs
    /// - Updating or deleting a product id that was never created
    /// - Changing the status of an unknown order
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    /// Checkout was attempted with an empty cart.
    #[error("cart is empty")]
    EmptyCart,

    /// A domain rule rejected the operation.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A collection value failed to serialize on the write path.
    #[error("serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Database connection failed.
    ///
    /// ## When This Occurs
    /// - Database file can't be created (permissions, disk full)
    /// - Pool is closed
    #[error("connection failed: {0}")]
    ConnectionFailed(String),

    /// Migration failed.
    #[error("migration failed: {0}")]
    MigrationFailed(String),

    /// Query execution failed.
    #[error("query failed: {0}")]
    QueryFailed(String),

    /// Pool exhausted (all connections in use).
    #[error("connection pool exhausted")]
    PoolExhausted,

    /// Internal store error.
    #[error("internal store error: {0}")]
    Internal(String),
}

impl StoreError {
    /// Creates a NotFound error for a given entity type and id.
    pub fn not_found(entity: impl Into<String>, id: impl Into<String>) -> Self {
        StoreError::NotFound {
            entity: entity.into(),
            id: id.into(),
        }
    }
}

/// Convert sqlx errors to StoreError.
impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => StoreError::NotFound {
                entity: "Record".to_string(),
                id: "unknown".to_string(),
            },
            sqlx::Error::Database(db_err) => StoreError::QueryFailed(db_err.message().to_string()),
            sqlx::Error::PoolTimedOut => StoreError::PoolExhausted,
            sqlx::Error::PoolClosed => StoreError::ConnectionFailed("pool is closed".to_string()),
            _ => StoreError::Internal(err.to_string()),
        }
    }
}

impl From<sqlx::migrate::MigrateError> for StoreError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        StoreError::MigrationFailed(err.to_string())
    }
}

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
