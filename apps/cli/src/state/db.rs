//! # Storage State
//!
//! Wraps [`LocalStorage`] for use in commands, and exposes the stored
//! session to the API client as a [`CredentialStore`].
//!
//! ```text
//! ApiClient ──session()──► StoredCredentials ──► SessionRepository ──► auth.session
//!           ──clear()────►   (on 401)       ──► DELETE auth.session
//! ```

use async_trait::async_trait;
use vitrina_api::{ApiError, ApiResult, CredentialStore};
use vitrina_core::Session;
use vitrina_store::LocalStorage;

/// Wrapper around `LocalStorage`.
#[derive(Debug, Clone)]
pub struct DbState {
    storage: LocalStorage,
}

impl DbState {
    pub fn new(storage: LocalStorage) -> Self {
        DbState { storage }
    }

    pub fn inner(&self) -> &LocalStorage {
        &self.storage
    }

    /// Credential view of the same storage.
    pub fn credentials(&self) -> StoredCredentials {
        StoredCredentials {
            storage: self.storage.clone(),
        }
    }
}

/// Session read from and cleared in local storage.
#[derive(Debug, Clone)]
pub struct StoredCredentials {
    storage: LocalStorage,
}

#[async_trait]
impl CredentialStore for StoredCredentials {
    async fn session(&self) -> ApiResult<Option<Session>> {
        self.storage
            .session()
            .get()
            .await
            .map_err(|e| ApiError::Credentials(e.to_string()))
    }

    async fn clear(&self) -> ApiResult<()> {
        self.storage
            .session()
            .clear()
            .await
            .map(|_| ())
            .map_err(|e| ApiError::Credentials(e.to_string()))
    }
}
