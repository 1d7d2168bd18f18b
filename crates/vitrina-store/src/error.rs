//! # Storage Error Types
//!
//! Error types for local storage operations.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Propagation                                    │
//! │                                                                         │
//! │  sqlx::Error / serde_json::Error                                       │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  StoreError (this module) ← Adds context and categorization            │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  CliError (in app) ← code + message for the terminal                   │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

/// Local storage errors.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The database file could not be opened or created.
    ///
    /// ## When This Occurs
    /// - Parent directory missing and not creatable
    /// - File permissions issue
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// Migration failed.
    #[error("Migration failed: {0}")]
    MigrationFailed(String),

    /// Query execution failed.
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// A stored value is not valid JSON for the expected type.
    ///
    /// ## When This Occurs
    /// - The value was written by an older, incompatible version
    /// - The database was edited by hand
    #[error("Corrupt value under '{key}': {message}")]
    CorruptValue { key: String, message: String },

    /// A value was rejected before being written.
    #[error("Invalid value: {0}")]
    Validation(#[from] vitrina_core::ValidationError),

    /// A value could not be serialized for storage.
    #[error("Serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Pool exhausted (all connections in use).
    #[error("Connection pool exhausted")]
    PoolExhausted,

    /// Internal database error.
    #[error("Internal storage error: {0}")]
    Internal(String),
}

impl StoreError {
    pub fn corrupt(key: impl Into<String>, err: impl std::fmt::Display) -> Self {
        StoreError::CorruptValue {
            key: key.into(),
            message: err.to_string(),
        }
    }
}

/// Convert sqlx errors to StoreError.
///
/// ## Error Mapping
/// ```text
/// sqlx::Error::Database       → StoreError::QueryFailed
/// sqlx::Error::PoolTimedOut   → StoreError::PoolExhausted
/// sqlx::Error::PoolClosed     → StoreError::ConnectionFailed
/// Other                       → StoreError::Internal
/// ```
impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::Database(db_err) => StoreError::QueryFailed(db_err.message().to_string()),
            sqlx::Error::PoolTimedOut => StoreError::PoolExhausted,
            sqlx::Error::PoolClosed => StoreError::ConnectionFailed("Pool is closed".to_string()),
            _ => StoreError::Internal(err.to_string()),
        }
    }
}

impl From<sqlx::migrate::MigrateError> for StoreError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        StoreError::MigrationFailed(err.to_string())
    }
}

/// Result type for storage operations.
pub type StoreResult<T> = Result<T, StoreError>;
