use tracing::warn;

use darchiva_core::AppResult;
use darchiva_domain::Group;

use super::IamAdminService;
use crate::query_cache::QueryKey;

impl IamAdminService {
    /// Returns the group hierarchy.
    ///
    /// Structural inconsistencies are logged; the tree is returned unchanged.
    pub async fn group_tree(&self) -> AppResult<Vec<Group>> {
        let tree: Vec<Group> = self
            .queries
            .fetch_cached(&QueryKey::group_tree(), None, || self.api.group_tree())
            .await?;

        for violation in Group::check_hierarchy(&tree) {
            warn!(violation = %violation, "group hierarchy is inconsistent");
        }

        Ok(tree)
    }
}
