//! # Repository Module
//!
//! Typed access to the `local_storage` key-value table.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Repositories over one table                          │
//! │                                                                         │
//! │  Command                                                               │
//! │       │  storage.cart().load()                                         │
//! │       ▼                                                                 │
//! │  CartRepository ────────┐                                              │
//! │  SessionRepository ─────┤                                              │
//! │  CheckoutRepository ────┼──► KeyValueStore ──► local_storage           │
//! │  SettingsRepository ────┘    get / set / remove   (key, JSON value)    │
//! │                                                                         │
//! │  Each repository owns its keys; nothing else writes them.             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`CartRepository`] - `cart.items`
//! - [`SessionRepository`] - `auth.session`
//! - [`CheckoutRepository`] - `checkout.last_order`, `checkout.pending`
//! - [`SettingsRepository`] - `dev.subdomain`

pub mod cart;
pub mod checkout;
pub mod session;
pub mod settings;

pub use cart::CartRepository;
pub use checkout::{CheckoutRepository, LastOrder, PendingCheckout};
pub use session::SessionRepository;
pub use settings::SettingsRepository;

use chrono::Utc;
use serde::de::DeserializeOwned;
use serde::Serialize;
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{StoreError, StoreResult};

// =============================================================================
// Key-Value Store
// =============================================================================

/// JSON values keyed by string, the shape of browser local storage.
#[derive(Debug, Clone)]
pub struct KeyValueStore {
    pool: SqlitePool,
}

impl KeyValueStore {
    pub fn new(pool: SqlitePool) -> Self {
        KeyValueStore { pool }
    }

    /// Returns the raw JSON text stored under `key`.
    pub async fn get_raw(&self, key: &str) -> StoreResult<Option<String>> {
        let value: Option<String> =
            sqlx::query_scalar("SELECT value FROM local_storage WHERE key = ?1")
                .bind(key)
                .fetch_optional(&self.pool)
                .await?;
        Ok(value)
    }

    /// Reads and deserializes the value under `key`.
    ///
    /// ## Returns
    /// - `Ok(None)` if the key is absent
    /// - `Err(CorruptValue)` if the stored JSON does not fit `T`
    pub async fn get<T: DeserializeOwned>(&self, key: &str) -> StoreResult<Option<T>> {
        match self.get_raw(key).await? {
            Some(raw) => serde_json::from_str(&raw)
                .map(Some)
                .map_err(|e| StoreError::corrupt(key, e)),
            None => Ok(None),
        }
    }

    /// Serializes and stores `value` under `key`, replacing any previous value.
    pub async fn set<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> StoreResult<()> {
        let json = serde_json::to_string(value)?;
        let now = Utc::now().to_rfc3339();

        debug!(key = %key, bytes = json.len(), "Writing local storage");

        sqlx::query(
            r#"
            INSERT INTO local_storage (key, value, updated_at)
            VALUES (?1, ?2, ?3)
            ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(key)
        .bind(json)
        .bind(now)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Deletes `key`. Returns whether it existed.
    pub async fn remove(&self, key: &str) -> StoreResult<bool> {
        let result = sqlx::query("DELETE FROM local_storage WHERE key = ?1")
            .bind(key)
            .execute(&self.pool)
            .await?;

        debug!(key = %key, removed = result.rows_affected(), "Removed local storage key");
        Ok(result.rows_affected() > 0)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
