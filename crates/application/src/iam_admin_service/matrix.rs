use tracing::{info, warn};

use darchiva_core::AppResult;
use darchiva_domain::{PermissionCellUpdate, PermissionMatrixRow};

use super::IamAdminService;
use crate::admin_api_ports::MatrixQuery;
use crate::query_cache::QueryKey;

impl IamAdminService {
    /// Returns matrix rows for the filters.
    pub async fn permission_matrix(&self, query: &MatrixQuery) -> AppResult<Vec<PermissionMatrixRow>> {
        self.queries
            .fetch_cached(&matrix_key(query), None, || self.api.permission_matrix(query))
            .await
    }

    /// Writes one cell, showing the new level in the cached grid until the
    /// call settles.
    pub async fn update_permission_cell(
        &self,
        query: &MatrixQuery,
        update: &PermissionCellUpdate,
    ) -> AppResult<()> {
        let key = matrix_key(query);
        let result = self
            .queries
            .optimistic_update(
                &key,
                |rows: Option<Vec<PermissionMatrixRow>>| {
                    rows.map(|mut rows| {
                        for row in &mut rows {
                            row.apply(update);
                        }
                        rows
                    })
                },
                self.api.update_permission_cell(update),
            )
            .await;

        match &result {
            Ok(()) => info!(
                entity_type = %update.entity_type,
                entity_id = %update.entity_id,
                resource = %update.resource,
                level = %update.level,
                "updated permission cell"
            ),
            Err(error) => warn!(
                entity_id = %update.entity_id,
                resource = %update.resource,
                error = %error,
                "failed to update permission cell"
            ),
        }

        result
    }
}

fn matrix_key(query: &MatrixQuery) -> QueryKey {
    QueryKey::permission_matrix().child(query.cache_segment())
}
