//! # Collection Key-Value Access
//!
//! The persisted layout is a single `collections` table with one row per
//! logical collection and a JSON value:
//!
//! ```text
//! ┌───────────────┬─────────────────────────────────────────────┐
//! │ key           │ value                                       │
//! ├───────────────┼─────────────────────────────────────────────┤
//! │ products      │ [{"id":"...","name":"...",...}, ...]        │
//! │ orders        │ [{"id":"...","orderNumber":"ORD-...",...}]  │
//! │ cart          │ [{"product":{...},"quantity":2,...}]        │
//! │ admin         │ {"id":"...","username":"admin",...}         │
//! │ admin_session │ {"token":"...","expiresAt":"..."}           │
//! └───────────────┴─────────────────────────────────────────────┘
//! ```
//!
//! Values round-trip through one generic serialize/deserialize pair.
//! A stored value that no longer deserializes is logged and treated as
//! absent, so the caller falls back to the collection's seeded default;
//! reads never fail on bad data, only on I/O.

use serde::de::DeserializeOwned;
use serde::Serialize;
use sqlx::Sqlite;
use tracing::warn;

use crate::error::StoreResult;

/// Process-wide collection keys.
pub mod keys {
    pub const PRODUCTS: &str = "products";
    pub const ORDERS: &str = "orders";
    pub const CART: &str = "cart";
    pub const ADMIN: &str = "admin";
    pub const ADMIN_SESSION: &str = "admin_session";
}

/// Reads and deserializes a collection value.
///
/// ## Returns
/// * `Ok(Some(value))` - row present and well-formed
/// * `Ok(None)` - row absent, or stored JSON is corrupt (logged)
pub(crate) async fn read_value<'a, E, T>(executor: E, key: &str) -> StoreResult<Option<T>>
where
    E: sqlx::Executor<'a, Database = Sqlite>,
    T: DeserializeOwned,
{
    let row: Option<(String,)> = sqlx::query_as("SELECT value FROM collections WHERE key = ?1")
        .bind(key)
        .fetch_optional(executor)
        .await?;

    match row {
        None => Ok(None),
        Some((json,)) => match serde_json::from_str(&json) {
            Ok(value) => Ok(Some(value)),
            Err(err) => {
                warn!(
                    key = %key,
                    error = %err,
                    "stored collection no longer deserializes, treating as absent"
                );
                Ok(None)
            }
        },
    }
}

/// Serializes and upserts a collection value.
pub(crate) async fn write_value<'a, E, T>(executor: E, key: &str, value: &T) -> StoreResult<()>
where
    E: sqlx::Executor<'a, Database = Sqlite>,
    T: Serialize + ?Sized,
{
    let json = serde_json::to_string(value)?;

    sqlx::query(
        "INSERT INTO collections (key, value) VALUES (?1, ?2)
         ON CONFLICT(key) DO UPDATE SET value = excluded.value",
    )
    .bind(key)
    .bind(json)
    .execute(executor)
    .await?;

    Ok(())
}

/// Deletes a collection row; absent rows are a no-op.
pub(crate) async fn delete_value<'a, E>(executor: E, key: &str) -> StoreResult<()>
where
    E: sqlx::Executor<'a, Database = Sqlite>,
{
    sqlx::query("DELETE FROM collections WHERE key = ?1")
        .bind(key)
        .execute(executor)
        .await?;

    Ok(())
}
