//! # Session Repository
//!
//! Stored credentials under `auth.session`. Written on login, removed on
//! logout and whenever the API answers 401.

use tracing::info;
use vitrina_core::Session;

use super::KeyValueStore;
use crate::error::StoreResult;

/// Storage key for the session.
pub const SESSION_KEY: &str = "auth.session";

#[derive(Debug, Clone)]
pub struct SessionRepository {
    kv: KeyValueStore,
}

impl SessionRepository {
    pub fn new(kv: KeyValueStore) -> Self {
        SessionRepository { kv }
    }

    /// The stored session, if any.
    pub async fn get(&self) -> StoreResult<Option<Session>> {
        self.kv.get(SESSION_KEY).await
    }

    pub async fn save(&self, session: &Session) -> StoreResult<()> {
        info!(user_id = %session.user.id, tenant_id = %session.tenant_id(), "Session stored");
        self.kv.set(SESSION_KEY, session).await
    }

    /// Removes the stored session. Returns whether one existed.
    pub async fn clear(&self) -> StoreResult<bool> {
        let removed = self.kv.remove(SESSION_KEY).await?;
        if removed {
            info!("Session cleared");
        }
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use crate::pool::{LocalStorage, StorageConfig};
    use vitrina_core::{Session, SessionUser};

    fn session() -> Session {
        Session {
            token: "tok".into(),
            user: SessionUser {
                id: "u1".into(),
                name: "Ana".into(),
                email: "ana@tienda.com".into(),
                tenant_id: "t1".into(),
                role: Some("owner".into()),
            },
        }
    }

    #[tokio::test]
    async fn test_session_lifecycle() {
        let storage = LocalStorage::open(StorageConfig::in_memory()).await.unwrap();
        let repo = storage.session();

        assert_eq!(repo.get().await.unwrap(), None);

        repo.save(&session()).await.unwrap();
        assert_eq!(repo.get().await.unwrap(), Some(session()));

        assert!(repo.clear().await.unwrap());
        assert!(!repo.clear().await.unwrap());
        assert_eq!(repo.get().await.unwrap(), None);
    }
}
