use tracing::{info, warn};

use darchiva_core::{AppError, AppResult, ListPage, NonEmptyString};
use darchiva_domain::Role;

use super::IamAdminService;
use crate::admin_api_ports::RoleListQuery;
use crate::query_cache::QueryKey;
use crate::role_builder::RoleDraft;

impl IamAdminService {
    /// Lists roles for the filters.
    pub async fn list_roles(&self, query: &RoleListQuery) -> AppResult<ListPage<Role>> {
        let key = QueryKey::roles().child(query.cache_segment());
        self.queries
            .fetch_cached(&key, None, || self.api.list_roles(query))
            .await
    }

    /// Returns one role.
    pub async fn get_role(&self, role_id: &str) -> AppResult<Role> {
        self.queries
            .fetch_cached(&QueryKey::role(role_id), None, || self.api.get_role(role_id))
            .await
    }

    /// Returns an empty draft bound to the permission catalog.
    pub async fn new_draft(&self) -> AppResult<RoleDraft> {
        let catalog = self.permissions().await?;
        Ok(RoleDraft::new().with_catalog(&catalog))
    }

    /// Returns a draft seeded from an existing role and bound to the catalog.
    pub async fn draft_for_role(&self, role_id: &str) -> AppResult<RoleDraft> {
        let role = self.get_role(role_id).await?;
        let catalog = self.permissions().await?;
        Ok(RoleDraft::from_role(&role).with_catalog(&catalog))
    }

    /// Validates and persists a draft as a new or updated role.
    ///
    /// Lints are logged but never block the save. The draft is left as is.
    pub async fn save_role(&self, draft: &RoleDraft) -> AppResult<Role> {
        if draft.is_system() {
            return Err(AppError::Conflict(format!(
                "system role '{}' cannot be modified",
                draft.name()
            )));
        }

        if let Err(errors) = draft.validate() {
            let message = errors
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join("; ");
            return Err(AppError::Validation(message));
        }

        for lint in draft.lint() {
            warn!(role = %draft.name(), lint = %lint, "saving role with permission conflict");
        }

        let request = draft.to_save_request();
        let result = match draft.role_id() {
            Some(role_id) => self.api.update_role(role_id, &request).await,
            None => self.api.create_role(&request).await,
        };

        let role = match result {
            Ok(role) => role,
            Err(error) => {
                warn!(role = %request.name, error = %error, "failed to save role");
                return Err(error);
            }
        };

        if let Some(role_id) = draft.role_id() {
            self.queries.invalidate(&QueryKey::role(role_id)).await?;
        }
        self.queries.invalidate(&QueryKey::roles()).await?;

        info!(
            role_id = %role.id,
            permissions = role.permissions.len(),
            created = draft.role_id().is_none(),
            "saved role"
        );
        Ok(role)
    }

    /// Deletes a custom role.
    pub async fn delete_role(&self, role: &Role) -> AppResult<()> {
        if role.is_system {
            return Err(AppError::Conflict(format!(
                "system role '{}' cannot be deleted",
                role.name
            )));
        }

        if let Err(error) = self.api.delete_role(&role.id).await {
            warn!(role_id = %role.id, error = %error, "failed to delete role");
            return Err(error);
        }

        self.queries.invalidate(&QueryKey::role(&role.id)).await?;
        self.queries.invalidate(&QueryKey::roles()).await?;
        info!(role_id = %role.id, "deleted role");
        Ok(())
    }

    /// Copies a role under a new name.
    pub async fn clone_role(&self, role_id: &str, name: &str) -> AppResult<Role> {
        let name = NonEmptyString::trimmed(name)?;
        let role = match self.api.clone_role(role_id, name.as_str()).await {
            Ok(role) => role,
            Err(error) => {
                warn!(role_id, error = %error, "failed to clone role");
                return Err(error);
            }
        };

        self.queries.invalidate(&QueryKey::roles()).await?;
        info!(source_role_id = role_id, role_id = %role.id, "cloned role");
        Ok(role)
    }
}
