//! # Admin Session Service
//!
//! Operator login over the `admin` and `admin_session` collections.
//!
//! ## State Machine
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                 login ok                                     │
//! │  ┌───────────┐ ─────────► ┌──────────┐                       │
//! │  │ LoggedOut │            │ LoggedIn │                       │
//! │  └───────────┘ ◄───────── └──────────┘                       │
//! │       ▲         logout /                                     │
//! │       │         expiry                                       │
//! │       └── login failure self-loops                           │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! The stored credential record carries only an Argon2 hash, and a
//! session is a persisted token with an expiry rather than a bare
//! boolean flag. Single operator, single session: a successful login
//! replaces any previous session record.

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use chrono::{Duration, Utc};
use sqlx::SqlitePool;
use tracing::{debug, info};
use uuid::Uuid;

use kolysanka_core::{validation, AdminSession, AdminUser};

use crate::error::{StoreError, StoreResult};
use crate::kv::{self, keys};
use crate::seed;

/// Session lifetime in hours. There is no refresh; an expired session
/// requires a fresh login.
const SESSION_TTL_HOURS: i64 = 12;

/// Service for operator authentication.
#[derive(Debug, Clone)]
pub struct SessionService {
    pool: SqlitePool,
}

impl SessionService {
    /// Creates a new SessionService.
    pub fn new(pool: SqlitePool) -> Self {
        SessionService { pool }
    }

    /// Returns the operator record, seeding the default on first access.
    pub async fn admin(&self) -> StoreResult<AdminUser> {
        if let Some(admin) = kv::read_value(&self.pool, keys::ADMIN).await? {
            return Ok(admin);
        }

        let admin = seed::default_admin()?;
        kv::write_value(&self.pool, keys::ADMIN, &admin).await?;
        info!(username = %admin.username, "seeded default admin credentials");

        Ok(admin)
    }

    /// Attempts to log the operator in.
    ///
    /// ## Returns
    /// * `Ok(true)` - credentials matched; a fresh session was persisted
    /// * `Ok(false)` - mismatch; any existing session is left untouched
    ///
    /// The username comparison is exact and case-sensitive; the password
    /// is verified against the stored Argon2 hash.
    pub async fn login(&self, username: &str, password: &str) -> StoreResult<bool> {
        let admin = self.admin().await?;

        if admin.username != username || !verify_password(&admin.password_hash, password) {
            debug!(username = %username, "login failed");
            return Ok(false);
        }

        let now = Utc::now();
        let session = AdminSession {
            token: Uuid::new_v4().to_string(),
            issued_at: now,
            expires_at: now + Duration::hours(SESSION_TTL_HOURS),
        };
        kv::write_value(&self.pool, keys::ADMIN_SESSION, &session).await?;

        info!(username = %username, "operator logged in");
        Ok(true)
    }

    /// Logs the operator out by deleting the session record.
    pub async fn logout(&self) -> StoreResult<()> {
        debug!("operator logged out");
        kv::delete_value(&self.pool, keys::ADMIN_SESSION).await
    }

    /// Whether an unexpired session exists.
    pub async fn is_authenticated(&self) -> StoreResult<bool> {
        let session: Option<AdminSession> =
            kv::read_value(&self.pool, keys::ADMIN_SESSION).await?;

        Ok(session
            .map(|s| s.is_valid_at(Utc::now()))
            .unwrap_or(false))
    }

    /// Rotates the operator password.
    ///
    /// ## Returns
    /// * `Ok(true)` - current password verified; the new hash is stored
    /// * `Ok(false)` - current password mismatch; nothing changes
    pub async fn change_password(&self, current: &str, new: &str) -> StoreResult<bool> {
        let mut admin = self.admin().await?;

        if !verify_password(&admin.password_hash, current) {
            debug!("password change rejected: current password mismatch");
            return Ok(false);
        }

        validation::validate_password(new).map_err(kolysanka_core::CoreError::from)?;

        admin.password_hash = hash_password(new)?;
        kv::write_value(&self.pool, keys::ADMIN, &admin).await?;

        info!("operator password rotated");
        Ok(true)
    }
}

// =============================================================================
// Hashing Helpers
// =============================================================================

/// Hashes a password with Argon2 and a fresh random salt.
pub(crate) fn hash_password(password: &str) -> StoreResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| StoreError::Internal(format!("password hashing failed: {e}")))?;

    Ok(hash.to_string())
}

/// Verifies a password against a stored Argon2 hash string.
///
/// An unparseable stored hash verifies as false rather than erroring;
/// the operator can always be re-seeded by clearing the admin row.
pub(crate) fn verify_password(stored_hash: &str, password: &str) -> bool {
    PasswordHash::new(stored_hash)
        .map(|parsed| {
            Argon2::default()
                .verify_password(password.as_bytes(), &parsed)
                .is_ok()
        })
        .unwrap_or(false)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Store, StoreConfig};
    use crate::seed::{DEFAULT_ADMIN_PASSWORD, DEFAULT_ADMIN_USERNAME};

    async fn test_store() -> Store {
        Store::new(StoreConfig::in_memory()).await.unwrap()
    }

    #[test]
    fn test_hash_and_verify() {
        let hash = hash_password("admin123").unwrap();

        assert!(verify_password(&hash, "admin123"));
        assert!(!verify_password(&hash, "admin124"));
        assert!(!verify_password("not a phc string", "admin123"));
    }

    #[tokio::test]
    async fn test_first_run_login_with_default_credentials() {
        let store = test_store().await;
        let session = store.session();

        assert!(!session.is_authenticated().await.unwrap());

        let ok = session
            .login(DEFAULT_ADMIN_USERNAME, DEFAULT_ADMIN_PASSWORD)
            .await
            .unwrap();
        assert!(ok);
        assert!(session.is_authenticated().await.unwrap());
    }

    #[tokio::test]
    async fn test_failed_login_leaves_session_absent() {
        let store = test_store().await;
        let session = store.session();

        let ok = session.login("admin", "wrong").await.unwrap();
        assert!(!ok);
        assert!(!session.is_authenticated().await.unwrap());

        // Username comparison is case-sensitive
        let ok = session.login("Admin", DEFAULT_ADMIN_PASSWORD).await.unwrap();
        assert!(!ok);
    }

    #[tokio::test]
    async fn test_logout() {
        let store = test_store().await;
        let session = store.session();

        session
            .login(DEFAULT_ADMIN_USERNAME, DEFAULT_ADMIN_PASSWORD)
            .await
            .unwrap();
        session.logout().await.unwrap();

        assert!(!session.is_authenticated().await.unwrap());
    }

    #[tokio::test]
    async fn test_expired_session_is_logged_out() {
        let store = test_store().await;
        let session = store.session();

        let now = Utc::now();
        let expired = AdminSession {
            token: Uuid::new_v4().to_string(),
            issued_at: now - Duration::hours(24),
            expires_at: now - Duration::hours(12),
        };
        kv::write_value(store.pool(), keys::ADMIN_SESSION, &expired)
            .await
            .unwrap();

        assert!(!session.is_authenticated().await.unwrap());
    }

    #[tokio::test]
    async fn test_change_password() {
        let store = test_store().await;
        let session = store.session();

        // Wrong current password changes nothing
        let ok = session.change_password("wrong", "new-password").await.unwrap();
        assert!(!ok);

        let ok = session
            .change_password(DEFAULT_ADMIN_PASSWORD, "нове-гасло-123")
            .await
            .unwrap();
        assert!(ok);

        assert!(!session.login("admin", DEFAULT_ADMIN_PASSWORD).await.unwrap());
        assert!(session.login("admin", "нове-гасло-123").await.unwrap());
    }

    #[tokio::test]
    async fn test_change_password_rejects_short_replacement() {
        let store = test_store().await;

        let err = store
            .session()
            .change_password(DEFAULT_ADMIN_PASSWORD, "short")
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Core(_)));
    }

    #[tokio::test]
    async fn test_stored_record_never_contains_plaintext() {
        let store = test_store().await;

        let admin = store.session().admin().await.unwrap();
        assert_ne!(admin.password_hash, DEFAULT_ADMIN_PASSWORD);
        assert!(admin.password_hash.starts_with("$argon2"));
    }
}
