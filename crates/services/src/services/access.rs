use models::{
    Record,
    access::{AssignRoles, Permission, Role, RolePermissionsChange},
    user::User,
};
use reqwest::Method;
use serde::Serialize;
use tracing::info;

use super::{
    api_client::{ApiClient, ApiError},
    resources::{ResourceService, Users},
};

const ASSIGN_PERMISSIONS_PATH: &str = "/api/access/roles/assign-permissions";
const REVOKE_PERMISSIONS_PATH: &str = "/api/access/roles/revoke-permissions";
const ASSIGN_ROLE_PATH: &str = "/api/access/assign-role";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PermissionChange {
    Assigned,
    Revoked,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ToggleOutcome {
    pub change: PermissionChange,
    /// Permission ids the role holds after the change
    pub permission_ids: Vec<String>,
}

pub struct AccessService;

impl AccessService {
    /// Revoke `permission` if `role` holds it, assign it otherwise.
    pub async fn toggle_permission(
        client: &ApiClient,
        role: &Role,
        permission: &Permission,
    ) -> Result<ToggleOutcome, ApiError> {
        client.require_auth()?;
        let mut permission_ids = role.permission_ids();
        let held = role.has_permission(permission.id());
        let (path, change) = if held {
            (REVOKE_PERMISSIONS_PATH, PermissionChange::Revoked)
        } else {
            (ASSIGN_PERMISSIONS_PATH, PermissionChange::Assigned)
        };

        let body = RolePermissionsChange {
            role_id: role.id.clone(),
            permission_ids: vec![permission.id.clone()],
        };
        client.send(Method::POST, path, Some(&body)).await?;

        match change {
            PermissionChange::Revoked => permission_ids.retain(|id| id != &permission.id),
            PermissionChange::Assigned => permission_ids.push(permission.id.clone()),
        }
        info!(
            role_id = %role.id,
            permission = %permission.name,
            ?change,
            "Changed role permission"
        );
        Ok(ToggleOutcome {
            change,
            permission_ids,
        })
    }

    /// Replace a user's roles, then return the refreshed user list.
    pub async fn assign_roles(
        client: &ApiClient,
        user_id: &str,
        roles: Vec<String>,
    ) -> Result<Vec<User>, ApiError> {
        client.require_auth()?;
        let body = AssignRoles {
            user_id: user_id.to_string(),
            roles,
        };
        client.send(Method::POST, ASSIGN_ROLE_PATH, Some(&body)).await?;
        info!(user_id, roles = ?body.roles, "Assigned roles");
        ResourceService::list::<Users>(client).await
    }
}

/// Resolve role names or ids against the role catalogue. Unknown entries are
/// returned as the error value.
pub fn resolve_roles(roles: &[Role], wanted: &[String]) -> Result<Vec<String>, String> {
    wanted
        .iter()
        .map(|w| {
            roles
                .iter()
                .find(|r| r.id == *w || r.name == *w || r.display_name() == *w)
                .map(|r| r.id.clone())
                .ok_or_else(|| w.clone())
        })
        .collect()
}
