//! # State Module
//!
//! Everything a command may need, built once per invocation.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    AppContext                                           │
//! │                                                                         │
//! │  ┌──────────────┐  ┌──────────────┐  ┌──────────────────┐              │
//! │  │   DbState    │  │  CartState   │  │   ConfigState    │              │
//! │  │              │  │              │  │                  │              │
//! │  │ LocalStorage │  │  Arc<Mutex<  │  │  VitrinaConfig   │              │
//! │  │ (SQLite)     │  │    Cart      │  │  subdomain       │              │
//! │  │              │  │  >>          │  │  resolution      │              │
//! │  └──────┬───────┘  └──────────────┘  └──────────────────┘              │
//! │         │ StoredCredentials                                             │
//! │         ▼                                                               │
//! │  ┌──────────────────────────────────────────────┐                      │
//! │  │ ApiClient (base URL, transport, credentials) │                      │
//! │  └──────────────────────────────────────────────┘                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

mod cart;
mod config;
mod db;

pub use cart::CartState;
pub use config::ConfigState;
pub use db::{DbState, StoredCredentials};

use std::sync::Arc;
use tracing::{debug, info};
use vitrina_api::{ApiClient, HttpTransport, ReqwestTransport, VitrinaConfig};
use vitrina_store::{LocalStorage, StorageConfig};

use crate::error::CliResult;

/// Shared handles for one command.
#[derive(Clone)]
pub struct AppContext {
    pub config: ConfigState,
    pub db: DbState,
    pub cart: CartState,
    pub client: ApiClient,
    transport: Arc<dyn HttpTransport>,
}

impl AppContext {
    /// Opens local storage and builds the production HTTP client.
    pub async fn open(config: VitrinaConfig, store_flag: Option<String>) -> CliResult<Self> {
        let db_path = config.database_path();
        debug!(?db_path, "Opening local storage");
        let storage = LocalStorage::open(StorageConfig::new(db_path)).await?;

        let transport: Arc<dyn HttpTransport> = Arc::new(ReqwestTransport::new(config.timeout())?);
        let mut context = Self::with_transport(config, storage, transport).await?;
        context.config = context.config.with_store_flag(store_flag);

        info!(api = %context.client.base_url(), store = ?context.config.subdomain(), "Context ready");
        Ok(context)
    }

    /// Builds a context over any storage and transport.
    pub async fn with_transport(
        config: VitrinaConfig,
        storage: LocalStorage,
        transport: Arc<dyn HttpTransport>,
    ) -> CliResult<Self> {
        let db = DbState::new(storage);
        let dev_subdomain = db.inner().settings().dev_subdomain().await?;
        let cart = CartState::load(db.inner()).await?;
        let client = ApiClient::new(
            config.base_url(),
            Arc::clone(&transport),
            Arc::new(db.credentials()),
        )?;

        Ok(AppContext {
            config: ConfigState::new(config).with_dev_subdomain(dev_subdomain),
            db,
            cart,
            client,
            transport,
        })
    }

    pub fn storage(&self) -> &LocalStorage {
        self.db.inner()
    }

    pub fn transport(&self) -> Arc<dyn HttpTransport> {
        Arc::clone(&self.transport)
    }
}
