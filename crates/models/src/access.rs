use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::record_ref::{Record, RecordRef, ref_ids};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
pub struct Permission {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
}

impl Record for Permission {
    fn id(&self) -> &str {
        &self.id
    }

    fn label(&self) -> &str {
        &self.name
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
pub struct Role {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub permissions: Vec<RecordRef<Permission>>,
}

impl Record for Role {
    fn id(&self) -> &str {
        &self.id
    }

    fn label(&self) -> &str {
        &self.name
    }
}

impl Role {
    /// Role names are stored snake_case; tables show them spaced.
    pub fn display_name(&self) -> String {
        self.name.replace('_', " ")
    }

    pub fn permission_ids(&self) -> Vec<String> {
        ref_ids(&self.permissions)
    }

    pub fn has_permission(&self, permission_id: &str) -> bool {
        self.permissions.iter().any(|p| p.id() == permission_id)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
pub struct CreateRole {
    pub name: String,
    pub permissions: Vec<String>,
}

pub type UpdateRole = CreateRole;

/// Body of the assign/revoke permission endpoints
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
pub struct RolePermissionsChange {
    #[serde(rename = "roleId")]
    pub role_id: String,
    #[serde(rename = "permissionsIds")]
    pub permission_ids: Vec<String>,
}

/// Body of `POST /api/access/assign-role`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
pub struct AssignRoles {
    #[serde(rename = "userId")]
    pub user_id: String,
    pub roles: Vec<String>,
}
