//! # Storage Pool Management
//!
//! Connection pool creation and configuration for the local SQLite file.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Local Storage Lifecycle                            │
//! │                                                                         │
//! │  vitrina <command>                                                     │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  StorageConfig::new(path) ← path from [storage] config or default      │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  LocalStorage::open(config).await ← Create pool + run migrations       │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────┐                           │
//! │  │            SqlitePool                    │                           │
//! │  │  ┌──────────────────────────────────┐   │                           │
//! │  │  │ local_storage(key, value, ...)   │   │                           │
//! │  │  └──────────────────────────────────┘   │                           │
//! │  └─────────────────────────────────────────┘                           │
//! │       │                                                                 │
//! │       ├── cart()      → CartRepository                                 │
//! │       ├── session()   → SessionRepository                              │
//! │       ├── checkout()  → CheckoutRepository                             │
//! │       └── settings()  → SettingsRepository                             │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use sqlx::SqlitePool;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use tracing::{debug, info};

use crate::error::{StoreError, StoreResult};
use crate::migrations;
use crate::repository::{
    CartRepository, CheckoutRepository, KeyValueStore, SessionRepository, SettingsRepository,
};

const MEMORY_PATH: &str = ":memory:";

// =============================================================================
// Configuration
// =============================================================================

/// Local storage configuration.
///
/// ## Example
/// ```rust,ignore
/// let config = StorageConfig::new("/home/ana/.local/share/vitrina/vitrina.db")
///     .max_connections(2);
/// ```
#[derive(Debug, Clone)]
pub struct StorageConfig {
    /// Path to the SQLite database file.
    pub database_path: PathBuf,

    /// Maximum number of connections in the pool.
    /// Default: 2 (one command at a time)
    pub max_connections: u32,

    /// Connection timeout.
    /// Default: 10 seconds
    pub connect_timeout: Duration,

    /// Whether to run migrations on open.
    /// Default: true
    pub run_migrations: bool,
}

impl StorageConfig {
    /// Creates a configuration for a database file, created if missing.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        StorageConfig {
            database_path: path.into(),
            max_connections: 2,
            connect_timeout: Duration::from_secs(10),
            run_migrations: true,
        }
    }

    /// Sets the maximum number of connections.
    pub fn max_connections(mut self, max: u32) -> Self {
        self.max_connections = max;
        self
    }

    /// Sets whether to run migrations on open.
    pub fn run_migrations(mut self, run: bool) -> Self {
        self.run_migrations = run;
        self
    }

    /// Creates an in-memory configuration (for testing).
    ///
    /// ## Usage
    /// ```rust,ignore
    /// let storage = LocalStorage::open(StorageConfig::in_memory()).await?;
    /// ```
    pub fn in_memory() -> Self {
        StorageConfig {
            database_path: PathBuf::from(MEMORY_PATH),
            // every connection to :memory: is a separate database
            max_connections: 1,
            connect_timeout: Duration::from_secs(5),
            run_migrations: true,
        }
    }

    pub fn is_in_memory(&self) -> bool {
        self.database_path.as_os_str() == MEMORY_PATH
    }
}

// =============================================================================
// Local Storage
// =============================================================================

/// Handle to the local storage database, giving out typed repositories.
#[derive(Debug, Clone)]
pub struct LocalStorage {
    pool: SqlitePool,
}

impl LocalStorage {
    /// Opens (and creates if needed) the local storage database.
    ///
    /// ## What This Does
    /// 1. Creates the parent directory of the database file
    /// 2. Configures SQLite: WAL mode and NORMAL synchronous for files
    /// 3. Creates the connection pool
    /// 4. Runs migrations (if enabled)
    pub async fn open(config: StorageConfig) -> StoreResult<Self> {
        info!(
            path = %config.database_path.display(),
            "Opening local storage"
        );

        let connect_options = if config.is_in_memory() {
            SqliteConnectOptions::from_str("sqlite::memory:")
                .map_err(|e| StoreError::ConnectionFailed(e.to_string()))?
        } else {
            if let Some(parent) = config.database_path.parent() {
                if !parent.as_os_str().is_empty() {
                    tokio::fs::create_dir_all(parent)
                        .await
                        .map_err(|e| StoreError::ConnectionFailed(e.to_string()))?;
                }
            }

            SqliteConnectOptions::new()
                .filename(&config.database_path)
                .journal_mode(SqliteJournalMode::Wal)
                .synchronous(SqliteSynchronous::Normal)
                .create_if_missing(true)
        };

        debug!("Connection options configured");

        let pool = SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(1)
            .acquire_timeout(config.connect_timeout)
            // an in-memory database dies with its last connection
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(connect_options)
            .await
            .map_err(|e| StoreError::ConnectionFailed(e.to_string()))?;

        info!(max_connections = config.max_connections, "Storage pool created");

        let storage = LocalStorage { pool };

        if config.run_migrations {
            storage.run_migrations().await?;
        }

        Ok(storage)
    }

    /// Runs database migrations. Idempotent.
    pub async fn run_migrations(&self) -> StoreResult<()> {
        migrations::run_migrations(&self.pool).await
    }

    /// Returns the connection pool for diagnostics.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Untyped access to the key-value table.
    pub fn raw(&self) -> KeyValueStore {
        KeyValueStore::new(self.pool.clone())
    }

    /// Persisted cart (`cart.items`).
    pub fn cart(&self) -> CartRepository {
        CartRepository::new(self.raw())
    }

    /// Stored credentials (`auth.session`).
    pub fn session(&self) -> SessionRepository {
        SessionRepository::new(self.raw())
    }

    /// Last order and pending checkout (`checkout.*`).
    pub fn checkout(&self) -> CheckoutRepository {
        CheckoutRepository::new(self.raw())
    }

    /// Development settings (`dev.subdomain`).
    pub fn settings(&self) -> SettingsRepository {
        SettingsRepository::new(self.raw())
    }

    /// Closes the pool. Repository calls fail afterwards.
    pub async fn close(&self) {
        info!("Closing local storage");
        self.pool.close().await;
    }

    /// Checks that the database answers queries.
    pub async fn health_check(&self) -> bool {
        sqlx::query("SELECT 1").execute(&self.pool).await.is_ok()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
