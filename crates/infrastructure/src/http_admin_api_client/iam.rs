use darchiva_application::{IamApi, MatrixQuery, RoleListQuery, SaveRoleRequest};
use darchiva_core::ListPage;
use darchiva_domain::{
    Group, Permission, PermissionCellUpdate, PermissionGroup, PermissionMatrixRow, Role,
    RoleTemplate,
};

use super::*;

#[async_trait]
impl IamApi for HttpAdminApiClient {
    async fn list_roles(&self, query: &RoleListQuery) -> AppResult<ListPage<Role>> {
        self.send_json(self.iam(Method::GET, &["roles"])?.query(query))
            .await
    }

    async fn get_role(&self, role_id: &str) -> AppResult<Role> {
        self.send_json(self.iam(Method::GET, &["roles", role_id])?)
            .await
    }

    async fn create_role(&self, request: &SaveRoleRequest) -> AppResult<Role> {
        self.send_json(self.iam(Method::POST, &["roles"])?.json(request))
            .await
    }

    async fn update_role(&self, role_id: &str, request: &SaveRoleRequest) -> AppResult<Role> {
        self.send_json(self.iam(Method::PATCH, &["roles", role_id])?.json(request))
            .await
    }

    async fn delete_role(&self, role_id: &str) -> AppResult<()> {
        self.send_empty(self.iam(Method::DELETE, &["roles", role_id])?)
            .await
    }

    async fn clone_role(&self, role_id: &str, name: &str) -> AppResult<Role> {
        let body = serde_json::json!({ "name": name });
        self.send_json(
            self.iam(Method::POST, &["roles", role_id, "clone"])?
                .json(&body),
        )
        .await
    }

    async fn list_role_templates(&self) -> AppResult<Vec<RoleTemplate>> {
        self.send_json(self.iam(Method::GET, &["roles", "templates"])?)
            .await
    }

    async fn list_permissions(&self) -> AppResult<Vec<Permission>> {
        self.send_json(self.iam(Method::GET, &["permissions"])?)
            .await
    }

    async fn list_permission_groups(&self) -> AppResult<Vec<PermissionGroup>> {
        self.send_json(self.iam(Method::GET, &["permissions", "grouped"])?)
            .await
    }

    async fn group_tree(&self) -> AppResult<Vec<Group>> {
        self.send_json(self.iam(Method::GET, &["groups", "tree"])?)
            .await
    }

    async fn permission_matrix(&self, query: &MatrixQuery) -> AppResult<Vec<PermissionMatrixRow>> {
        self.send_json(self.iam(Method::GET, &["permission-matrix"])?.query(query))
            .await
    }

    async fn update_permission_cell(&self, update: &PermissionCellUpdate) -> AppResult<()> {
        self.send_empty(self.iam(Method::PATCH, &["permission-matrix"])?.json(update))
            .await
    }
}
