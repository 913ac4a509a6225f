//! # Database Migrations
//!
//! Embedded SQL migrations for the collections schema.
//!
//! ## Adding New Migrations
//!
//! 1. Create a new file in `migrations/sqlite/` with the next sequence
//!    number, format `NNN_description.sql`
//! 2. Write idempotent SQL (use `IF NOT EXISTS` where possible)
//! 3. NEVER modify existing migrations - always add new ones

use sqlx::SqlitePool;
use tracing::info;

use crate::error::StoreResult;

/// Embedded migrations from the `migrations/sqlite` directory.
///
/// `sqlx::migrate!()` embeds the SQL files into the binary at compile
/// time; no runtime file access is needed.
static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("../../migrations/sqlite");

/// Runs all pending database migrations.
///
/// Idempotent and ordered: applied migrations are tracked in the
/// `_sqlx_migrations` table and each pending one runs in a transaction.
pub async fn run_migrations(pool: &SqlitePool) -> StoreResult<()> {
    info!("checking for pending migrations");

    MIGRATOR.run(pool).await?;

    info!("all migrations applied");
    Ok(())
}
