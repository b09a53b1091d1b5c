use std::sync::Arc;
use std::time::Duration;

use darchiva_core::AppResult;
use darchiva_domain::{Permission, PermissionGroup, RoleTemplate};

use crate::admin_api_ports::IamApi;
use crate::query_cache::{QueryClient, QueryKey};

mod groups;
mod matrix;
mod roles;

/// Catalog freshness window used when none is configured.
pub const DEFAULT_CATALOG_TTL: Duration = Duration::from_secs(300);

/// Identity and access administration: roles, catalog, groups and matrix.
#[derive(Clone)]
pub struct IamAdminService {
    api: Arc<dyn IamApi>,
    queries: QueryClient,
    catalog_ttl: Duration,
}

impl IamAdminService {
    /// Creates a new service from required dependencies.
    #[must_use]
    pub fn new(api: Arc<dyn IamApi>, queries: QueryClient) -> Self {
        Self {
            api,
            queries,
            catalog_ttl: DEFAULT_CATALOG_TTL,
        }
    }

    /// Overrides how long catalog reads stay cached.
    #[must_use]
    pub fn with_catalog_ttl(mut self, catalog_ttl: Duration) -> Self {
        self.catalog_ttl = catalog_ttl;
        self
    }

    /// Returns the flat permission catalog.
    pub async fn permissions(&self) -> AppResult<Vec<Permission>> {
        self.queries
            .fetch_cached(&QueryKey::permissions(), Some(self.catalog_ttl), || {
                self.api.list_permissions()
            })
            .await
    }

    /// Returns the permission catalog grouped by category.
    pub async fn permission_groups(&self) -> AppResult<Vec<PermissionGroup>> {
        self.queries
            .fetch_cached(&QueryKey::permission_groups(), Some(self.catalog_ttl), || {
                self.api.list_permission_groups()
            })
            .await
    }

    /// Returns role templates.
    pub async fn role_templates(&self) -> AppResult<Vec<RoleTemplate>> {
        self.queries
            .fetch_cached(&QueryKey::role_templates(), Some(self.catalog_ttl), || {
                self.api.list_role_templates()
            })
            .await
    }
}
