use async_trait::async_trait;
use serde::Serialize;

use darchiva_core::{AppResult, ListPage, PageRequest};
use darchiva_domain::{
    EntityType, Group, Permission, PermissionCellUpdate, PermissionGroup, PermissionMatrixRow,
    Role, RoleTemplate,
};

/// Filters for role listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoleListQuery {
    /// One-based page number.
    pub page: u32,
    /// Page size.
    #[serde(rename = "pageSize")]
    pub page_size: u32,
    /// Name search.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    /// Restricts to system or custom roles.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_system: Option<bool>,
}

impl Default for RoleListQuery {
    fn default() -> Self {
        let page = PageRequest::default();
        Self {
            page: page.page,
            page_size: page.page_size,
            search: None,
            is_system: None,
        }
    }
}

impl RoleListQuery {
    /// Returns the cache key segment for these parameters.
    #[must_use]
    pub fn cache_segment(&self) -> String {
        format!(
            "page={}&page_size={}&search={}&is_system={}",
            self.page,
            self.page_size,
            self.search.as_deref().unwrap_or_default(),
            self.is_system.map(|value| value.to_string()).unwrap_or_default()
        )
    }
}

/// Body for role create and update calls.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SaveRoleRequest {
    /// Trimmed role name.
    pub name: String,
    /// Trimmed description, omitted when blank.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Selected permission identifiers in ascending order.
    pub permission_ids: Vec<String>,
}

/// Filters for the permission matrix.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct MatrixQuery {
    /// Subject kind shown as rows.
    pub entity_type: EntityType,
    /// Restricts to one resource type.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource_type: Option<String>,
}

impl MatrixQuery {
    /// Returns the cache key segment for these parameters.
    #[must_use]
    pub fn cache_segment(&self) -> String {
        format!(
            "entity_type={}&resource_type={}",
            self.entity_type,
            self.resource_type.as_deref().unwrap_or_default()
        )
    }
}

/// Port for the identity and access administration API.
#[async_trait]
pub trait IamApi: Send + Sync {
    /// Lists roles matching the filters.
    async fn list_roles(&self, query: &RoleListQuery) -> AppResult<ListPage<Role>>;

    /// Returns one role.
    async fn get_role(&self, role_id: &str) -> AppResult<Role>;

    /// Creates a role.
    async fn create_role(&self, request: &SaveRoleRequest) -> AppResult<Role>;

    /// Replaces name, description and grants of a role.
    async fn update_role(&self, role_id: &str, request: &SaveRoleRequest) -> AppResult<Role>;

    /// Deletes a role.
    async fn delete_role(&self, role_id: &str) -> AppResult<()>;

    /// Copies a role under a new name.
    async fn clone_role(&self, role_id: &str, name: &str) -> AppResult<Role>;

    /// Lists predefined role templates.
    async fn list_role_templates(&self) -> AppResult<Vec<RoleTemplate>>;

    /// Lists the flat permission catalog.
    async fn list_permissions(&self) -> AppResult<Vec<Permission>>;

    /// Lists the permission catalog grouped by category.
    async fn list_permission_groups(&self) -> AppResult<Vec<PermissionGroup>>;

    /// Returns the group hierarchy.
    async fn group_tree(&self) -> AppResult<Vec<Group>>;

    /// Returns matrix rows for the filters.
    async fn permission_matrix(&self, query: &MatrixQuery) -> AppResult<Vec<PermissionMatrixRow>>;

    /// Writes one matrix cell.
    async fn update_permission_cell(&self, update: &PermissionCellUpdate) -> AppResult<()>;
}
