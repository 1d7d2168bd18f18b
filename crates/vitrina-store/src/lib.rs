//! # vitrina-store: Local Storage for Vitrina
//!
//! Keeps the client-side state a storefront visitor or admin builds up
//! between commands: the cart, the session, the last order and a few
//! development settings. It uses SQLite through sqlx.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Vitrina Data Flow                                │
//! │                                                                         │
//! │  vitrina cart add p1 --size s1                                         │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                   vitrina-store (THIS CRATE)                    │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │ LocalStorage  │    │  Repositories │    │  Migrations  │  │   │
//! │  │   │   (pool.rs)   │    │               │    │  (embedded)  │  │   │
//! │  │   │               │    │ CartRepo      │    │ 0001_local_  │  │   │
//! │  │   │ SqlitePool    │◄───│ SessionRepo   │    │  storage.sql │  │   │
//! │  │   │               │    │ CheckoutRepo  │    │              │  │   │
//! │  │   │               │    │ SettingsRepo  │    │              │  │   │
//! │  │   └───────────────┘    └───────────────┘    └──────────────┘  │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │   ~/.local/share/vitrina/vitrina.db  (local_storage table)      │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Opening the database
//! - [`migrations`] - Embedded migrations
//! - [`error`] - Storage error types
//! - [`repository`] - Typed repositories over the key-value table
//!
//! ## Usage
//!
//! ```rust,ignore
//! use vitrina_store::{LocalStorage, StorageConfig};
//!
//! let storage = LocalStorage::open(StorageConfig::new("vitrina.db")).await?;
//!
//! let mut cart = storage.cart().load().await?;
//! cart.add_item(item);
//! storage.cart().save(&cart).await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{StoreError, StoreResult};
pub use pool::{LocalStorage, StorageConfig};

pub use repository::{
    CartRepository, CheckoutRepository, KeyValueStore, LastOrder, PendingCheckout,
    SessionRepository, SettingsRepository,
};
