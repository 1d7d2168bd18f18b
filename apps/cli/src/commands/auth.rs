//! # Auth Commands
//!
//! ```text
//! vitrina login --email ana@tienda.com --password ****
//!      │
//!      ▼
//! POST /auth/login ──► Session { token, user } ──► local storage (auth.session)
//!
//! vitrina logout ──► remove auth.session   (no request)
//! vitrina whoami ──► GET /auth/profile
//! ```

use serde::Serialize;
use tracing::info;
use vitrina_core::SessionUser;

use super::require_session;
use crate::error::CliResult;
use crate::render::{Message, Render};
use crate::state::AppContext;

/// The logged-in user.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserView {
    #[serde(flatten)]
    pub user: SessionUser,
}

impl Render for UserView {
    fn render(&self) -> String {
        let mut out = format!(
            "{} <{}>\nTenant: {}",
            self.user.name, self.user.email, self.user.tenant_id
        );
        if let Some(role) = &self.user.role {
            out.push_str(&format!("\nRole: {}", role));
        }
        out
    }
}

pub async fn login(ctx: &AppContext, email: &str, password: &str) -> CliResult<UserView> {
    let session = ctx.client.auth().login(email, password).await?;
    ctx.storage().session().save(&session).await?;
    info!(tenant = %session.user.tenant_id, "Session stored");
    Ok(UserView { user: session.user })
}

pub async fn logout(ctx: &AppContext) -> CliResult<Message> {
    ctx.client.auth().logout().await?;
    Ok(Message::new("Logged out."))
}

/// Asks the backend who the stored token belongs to.
pub async fn whoami(ctx: &AppContext) -> CliResult<UserView> {
    require_session(ctx).await?;
    let user = ctx.client.auth().profile().await?;
    Ok(UserView { user })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::test_support::{context, session};
    use crate::error::ErrorCode;
    use serde_json::json;

    #[tokio::test]
    async fn test_login_stores_session() {
        let (ctx, transport) = context(false).await;
        transport.push_json(200, serde_json::to_value(session()).unwrap());

        let view = login(&ctx, "ana@tienda.com", "secret").await.unwrap();

        assert_eq!(view.user.tenant_id, "tenant-9");
        assert_eq!(ctx.storage().session().get().await.unwrap(), Some(session()));
    }

    #[tokio::test]
    async fn test_whoami_requires_session() {
        let (ctx, transport) = context(false).await;

        let err = whoami(&ctx).await.unwrap_err();

        assert_eq!(err.code, ErrorCode::NotLoggedIn);
        assert_eq!(transport.request_count(), 0);
    }

    #[tokio::test]
    async fn test_401_clears_stored_session() {
        let (ctx, transport) = context(true).await;
        transport.push_json(401, json!({ "message": "Unauthorized" }));

        let err = whoami(&ctx).await.unwrap_err();

        assert_eq!(err.code, ErrorCode::NotLoggedIn);
        assert_eq!(ctx.storage().session().get().await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_logout() {
        let (ctx, _) = context(true).await;

        logout(&ctx).await.unwrap();

        assert_eq!(ctx.storage().session().get().await.unwrap(), None);
    }
}
