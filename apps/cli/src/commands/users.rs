//! Tenant users and their permissions.

use vitrina_api::services::CreateUserRequest;
use vitrina_core::{TenantUser, UserRole};

use super::require_session;
use crate::error::{CliError, CliResult};
use crate::render::Message;
use crate::state::AppContext;

/// Splits `sales,products` style lists, dropping blanks and duplicates.
pub fn parse_permissions(values: &[String]) -> Vec<String> {
    let mut permissions: Vec<String> = Vec::new();
    for value in values.iter().flat_map(|v| v.split(',')) {
        let value = value.trim();
        if !value.is_empty() && !permissions.iter().any(|p| p == value) {
            permissions.push(value.to_string());
        }
    }
    permissions
}

pub async fn list(ctx: &AppContext) -> CliResult<Vec<TenantUser>> {
    require_session(ctx).await?;
    Ok(ctx.client.users().list().await?)
}

pub async fn create(
    ctx: &AppContext,
    name: &str,
    email: &str,
    password: &str,
    role: UserRole,
    permissions: &[String],
) -> CliResult<TenantUser> {
    require_session(ctx).await?;
    if role == UserRole::Owner {
        return Err(CliError::validation("A store has a single owner; create admins or employees."));
    }

    let request = CreateUserRequest {
        name: name.trim().to_string(),
        email: email.trim().to_string(),
        password: password.to_string(),
        role,
        permissions: parse_permissions(permissions),
    };
    Ok(ctx.client.users().create(&request).await?)
}

pub async fn set_permissions(ctx: &AppContext, id: &str, permissions: &[String]) -> CliResult<TenantUser> {
    require_session(ctx).await?;
    let permissions = parse_permissions(permissions);
    Ok(ctx.client.users().update_permissions(id, &permissions).await?)
}

pub async fn delete(ctx: &AppContext, id: &str) -> CliResult<Message> {
    let session = require_session(ctx).await?;
    if session.user.id == id {
        return Err(CliError::validation("You cannot delete your own account."));
    }
    ctx.client.users().delete(id).await?;
    Ok(Message::new(format!("User {} deleted.", id)))
}
