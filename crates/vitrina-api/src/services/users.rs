//! Tenant user management.

use serde::Serialize;
use tracing::info;
use vitrina_core::validation::{validate_email, validate_name, validate_required};
use vitrina_core::{TenantUser, UserRole};

use super::{segment, Listing};
use crate::client::ApiClient;
use crate::error::ApiResult;

const USERS_PATH: &str = "/user/tenant-users";

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: UserRole,
    pub permissions: Vec<String>,
}

impl CreateUserRequest {
    pub fn validate(&self) -> ApiResult<()> {
        validate_name("name", &self.name)?;
        validate_email(self.email.trim())?;
        validate_required("password", &self.password)?;
        Ok(())
    }
}

pub struct UserService<'a> {
    client: &'a ApiClient,
}

impl<'a> UserService<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        UserService { client }
    }

    pub async fn list(&self) -> ApiResult<Vec<TenantUser>> {
        let listing: Listing<TenantUser> = self.client.get(USERS_PATH, &[]).await?;
        Ok(listing.into_page().data)
    }

    pub async fn create(&self, request: &CreateUserRequest) -> ApiResult<TenantUser> {
        request.validate()?;
        let user: TenantUser = self.client.post(USERS_PATH, request).await?;
        info!(user_id = %user.id, role = %user.role, "Tenant user created");
        Ok(user)
    }

    /// Replaces the permission set of a user.
    pub async fn update_permissions(&self, id: &str, permissions: &[String]) -> ApiResult<TenantUser> {
        #[derive(Serialize)]
        struct Body<'b> {
            permissions: &'b [String],
        }

        let user: TenantUser = self
            .client
            .patch(&format!("{}/{}", USERS_PATH, segment(id)), &Body { permissions })
            .await?;
        info!(user_id = %user.id, count = user.permissions.len(), "Permissions updated");
        Ok(user)
    }

    pub async fn delete(&self, id: &str) -> ApiResult<()> {
        self.client
            .delete(&format!("{}/{}", USERS_PATH, segment(id)))
            .await?;
        info!(user_id = %id, "Tenant user deleted");
        Ok(())
    }
}
