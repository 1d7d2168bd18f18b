//! Login and profile.

use serde::Serialize;
use tracing::info;
use vitrina_core::validation::{validate_email, validate_required};
use vitrina_core::{Session, SessionUser};

use crate::client::ApiClient;
use crate::error::ApiResult;

#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

pub struct AuthService<'a> {
    client: &'a ApiClient,
}

impl<'a> AuthService<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        AuthService { client }
    }

    /// Exchanges credentials for a session. Storing it is the caller's job.
    pub async fn login(&self, email: &str, password: &str) -> ApiResult<Session> {
        let email = email.trim();
        validate_email(email)?;
        validate_required("password", password)?;

        let request = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };
        let session: Session = self.client.post("/auth/login", &request).await?;

        info!(user = %session.user.email, tenant = %session.user.tenant_id, "Logged in");
        Ok(session)
    }

    pub async fn profile(&self) -> ApiResult<SessionUser> {
        self.client.get("/auth/profile", &[]).await
    }

    /// Local only: the backend keeps no server-side session.
    pub async fn logout(&self) -> ApiResult<()> {
        self.client.logout().await?;
        info!("Logged out");
        Ok(())
    }
}
