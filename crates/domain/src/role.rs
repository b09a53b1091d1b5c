use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::Permission;

/// Named set of permissions assignable to users and groups.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Role {
    /// Stable role identifier.
    pub id: String,
    /// Unique role name in tenant scope.
    pub name: String,
    /// Optional description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Indicates a system-managed role.
    pub is_system: bool,
    /// Indicates the role new users receive by default.
    #[serde(default)]
    pub is_default: bool,
    /// Granted permissions; order carries no meaning.
    #[serde(default)]
    pub permissions: Vec<Permission>,
    /// Number of users holding the role.
    #[serde(default)]
    pub user_count: u64,
    /// Number of groups holding the role.
    #[serde(default)]
    pub group_count: u64,
    /// Creation timestamp.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    /// Last update timestamp.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Role {
    /// Returns the identifiers of granted permissions.
    pub fn permission_ids(&self) -> impl Iterator<Item = &str> {
        self.permissions
            .iter()
            .map(|permission| permission.id.as_str())
    }

    /// Returns a lightweight reference to this role.
    #[must_use]
    pub fn to_ref(&self) -> RoleRef {
        RoleRef {
            id: self.id.clone(),
            name: self.name.clone(),
        }
    }
}

/// Reference to a role embedded in other entities.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RoleRef {
    /// Role identifier.
    pub id: String,
    /// Role name.
    pub name: String,
}

/// Predefined permission set offered when composing a role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleTemplate {
    /// Template identifier.
    pub id: String,
    /// Suggested role name.
    pub name: String,
    /// Template description.
    #[serde(default)]
    pub description: String,
    /// Icon hint.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    /// Permissions granted by the template.
    pub permission_ids: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::Role;

    #[test]
    fn role_deserializes_with_sparse_payload() {
        let role: Result<Role, _> = serde_json::from_str(
            r#"{
                "id": "r1",
                "name": "Archivist",
                "is_system": false,
                "permissions": [
                    {"id": "p1", "codename": "document.view", "name": "View", "category": "document"}
                ],
                "created_at": "2026-01-02T03:04:05Z"
            }"#,
        );

        let Ok(role) = role else {
            panic!("role payload should deserialize");
        };
        assert_eq!(role.permission_ids().collect::<Vec<_>>(), vec!["p1"]);
        assert_eq!(role.user_count, 0);
        assert!(role.created_at.is_some());
        assert_eq!(role.to_ref().name, "Archivist");
    }
}
