//! # Settings Repository
//!
//! Development-only overrides. `dev.subdomain` points the storefront
//! commands at a tenant without a real subdomain in front of them.

use vitrina_core::validation::validate_subdomain;

use super::KeyValueStore;
use crate::error::StoreResult;

pub const DEV_SUBDOMAIN_KEY: &str = "dev.subdomain";

#[derive(Debug, Clone)]
pub struct SettingsRepository {
    kv: KeyValueStore,
}

impl SettingsRepository {
    pub fn new(kv: KeyValueStore) -> Self {
        SettingsRepository { kv }
    }

    pub async fn dev_subdomain(&self) -> StoreResult<Option<String>> {
        self.kv.get(DEV_SUBDOMAIN_KEY).await
    }

    /// Stores the override after checking it is a valid subdomain.
    pub async fn set_dev_subdomain(&self, subdomain: &str) -> StoreResult<()> {
        let subdomain = subdomain.trim();
        validate_subdomain(subdomain)?;
        self.kv.set(DEV_SUBDOMAIN_KEY, subdomain).await
    }

    pub async fn clear_dev_subdomain(&self) -> StoreResult<bool> {
        self.kv.remove(DEV_SUBDOMAIN_KEY).await
    }
}

#[cfg(test)]
mod tests {
    use crate::pool::{LocalStorage, StorageConfig};

    #[tokio::test]
    async fn test_dev_subdomain() {
        let storage = LocalStorage::open(StorageConfig::in_memory()).await.unwrap();
        let repo = storage.settings();

        assert_eq!(repo.dev_subdomain().await.unwrap(), None);

        repo.set_dev_subdomain(" mi-tienda ").await.unwrap();
        assert_eq!(repo.dev_subdomain().await.unwrap(), Some("mi-tienda".to_string()));

        assert!(repo.set_dev_subdomain("Mi Tienda").await.is_err());
        assert_eq!(repo.dev_subdomain().await.unwrap(), Some("mi-tienda".to_string()));

        assert!(repo.clear_dev_subdomain().await.unwrap());
    }
}
