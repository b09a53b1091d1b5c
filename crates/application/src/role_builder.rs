//! Role composition state with advisory lints and blocking validation.
//!
//! Lints describe questionable grant combinations and never block a save.
//! Validation errors do.

use std::collections::{BTreeSet, HashMap};
use std::fmt::{Display, Formatter};

use darchiva_domain::{
    Permission, PermissionGroup, Role, RoleTemplate, codename_category,
};

use crate::admin_api_ports::SaveRoleRequest;

const SYSTEM_ADMIN: &str = "system.admin";
const TENANT_ADMIN: &str = "tenant.admin";

/// Advisory warning about the selected grants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoleLint {
    /// `system.admin` without `tenant.admin`.
    LimitedSystemScope,
    /// A delete grant without a view grant in the same category.
    DeleteWithoutView {
        /// Codename category segment.
        category: String,
    },
}

impl Display for RoleLint {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::LimitedSystemScope => {
                formatter.write_str("System admin without tenant admin may have limited scope")
            }
            Self::DeleteWithoutView { category } => write!(
                formatter,
                "Delete permission for {category} without view permission"
            ),
        }
    }
}

/// Issue that prevents saving a draft.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoleValidationError {
    /// Name is empty after trimming.
    BlankName,
    /// Selected identifier is missing from the catalog.
    UnknownPermission(String),
}

impl Display for RoleValidationError {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BlankName => formatter.write_str("role name is required"),
            Self::UnknownPermission(permission_id) => {
                write!(formatter, "permission '{permission_id}' is not in the catalog")
            }
        }
    }
}

/// Editable role: name, description and the selected permission identifiers.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RoleDraft {
    role_id: Option<String>,
    is_system: bool,
    name: String,
    description: String,
    selected: BTreeSet<String>,
    codenames: Option<HashMap<String, String>>,
}

impl RoleDraft {
    /// Creates an empty draft for a new role.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a draft seeded from an existing role.
    #[must_use]
    pub fn from_role(role: &Role) -> Self {
        Self {
            role_id: Some(role.id.clone()),
            is_system: role.is_system,
            name: role.name.clone(),
            description: role.description.clone().unwrap_or_default(),
            selected: role.permission_ids().map(str::to_owned).collect(),
            codenames: None,
        }
    }

    /// Attaches the catalog so lints resolve identifiers to codenames and
    /// validation can detect unknown identifiers.
    #[must_use]
    pub fn with_catalog(mut self, catalog: &[Permission]) -> Self {
        self.codenames = Some(
            catalog
                .iter()
                .map(|permission| (permission.id.clone(), permission.codename.clone()))
                .collect(),
        );
        self
    }

    /// Replaces the selection with the given identifiers.
    #[must_use]
    pub fn with_selection<I, S>(mut self, permission_ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.selected = permission_ids.into_iter().map(Into::into).collect();
        self
    }

    /// Returns the existing role identifier, if editing.
    #[must_use]
    pub fn role_id(&self) -> Option<&str> {
        self.role_id.as_deref()
    }

    /// Returns whether the draft edits a system role.
    #[must_use]
    pub fn is_system(&self) -> bool {
        self.is_system
    }

    /// Returns the current name.
    #[must_use]
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Returns the current description.
    #[must_use]
    pub fn description(&self) -> &str {
        self.description.as_str()
    }

    /// Returns the selected identifiers in ascending order.
    #[must_use]
    pub fn selected(&self) -> &BTreeSet<String> {
        &self.selected
    }

    /// Returns whether an identifier is selected.
    #[must_use]
    pub fn is_selected(&self, permission_id: &str) -> bool {
        self.selected.contains(permission_id)
    }

    /// Sets the name.
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// Sets the description.
    pub fn set_description(&mut self, description: impl Into<String>) {
        self.description = description.into();
    }

    /// Flips membership of one identifier.
    pub fn toggle_permission(&mut self, permission_id: &str) {
        if !self.selected.remove(permission_id) {
            self.selected.insert(permission_id.to_owned());
        }
    }

    /// Clears the group when fully selected, otherwise selects all of it.
    pub fn toggle_category_all(&mut self, group: &PermissionGroup) {
        let all_selected = group
            .permissions
            .iter()
            .all(|permission| self.selected.contains(&permission.id));

        for permission in &group.permissions {
            if all_selected {
                self.selected.remove(&permission.id);
            } else {
                self.selected.insert(permission.id.clone());
            }
        }
    }

    /// Replaces the selection with the template's grants.
    pub fn apply_template(&mut self, template: &RoleTemplate) {
        self.selected = template.permission_ids.iter().cloned().collect();
        if self.name.trim().is_empty() {
            self.name.clone_from(&template.name);
        }
    }

    /// Computes advisory warnings for the current selection.
    #[must_use]
    pub fn lint(&self) -> Vec<RoleLint> {
        let codenames: BTreeSet<&str> = self
            .selected
            .iter()
            .map(|permission_id| self.codename_for(permission_id))
            .collect();

        let mut lints = Vec::new();
        if codenames.contains(SYSTEM_ADMIN) && !codenames.contains(TENANT_ADMIN) {
            lints.push(RoleLint::LimitedSystemScope);
        }

        let mut delete_categories = BTreeSet::new();
        let mut view_categories = BTreeSet::new();
        for codename in &codenames {
            let category = codename_category(codename);
            if codename.contains(".delete") {
                delete_categories.insert(category);
            }
            if codename.contains(".view") {
                view_categories.insert(category);
            }
        }

        lints.extend(
            delete_categories
                .difference(&view_categories)
                .map(|category| RoleLint::DeleteWithoutView {
                    category: (*category).to_owned(),
                }),
        );

        lints
    }

    /// Returns lint messages as rendered to users.
    #[must_use]
    pub fn conflicts(&self) -> Vec<String> {
        self.lint().iter().map(ToString::to_string).collect()
    }

    /// Returns every issue that blocks saving.
    pub fn validate(&self) -> Result<(), Vec<RoleValidationError>> {
        let mut errors = Vec::new();
        if self.name.trim().is_empty() {
            errors.push(RoleValidationError::BlankName);
        }

        if let Some(codenames) = &self.codenames {
            errors.extend(
                self.selected
                    .iter()
                    .filter(|permission_id| !codenames.contains_key(*permission_id))
                    .map(|permission_id| RoleValidationError::UnknownPermission(permission_id.clone())),
            );
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Builds the request body for create or update.
    #[must_use]
    pub fn to_save_request(&self) -> SaveRoleRequest {
        let description = self.description.trim();
        SaveRoleRequest {
            name: self.name.trim().to_owned(),
            description: (!description.is_empty()).then(|| description.to_owned()),
            permission_ids: self.selected.iter().cloned().collect(),
        }
    }

    fn codename_for<'a>(&'a self, permission_id: &'a str) -> &'a str {
        self.codenames
            .as_ref()
            .and_then(|codenames| codenames.get(permission_id))
            .map_or(permission_id, String::as_str)
    }
}

/// Keeps permissions whose name, codename or description contains `query`,
/// ignoring case, and drops groups left empty.
#[must_use]
pub fn filter_catalog(groups: &[PermissionGroup], query: &str) -> Vec<PermissionGroup> {
    let query = query.trim().to_lowercase();
    if query.is_empty() {
        return groups.to_vec();
    }

    groups
        .iter()
        .filter_map(|group| {
            let permissions: Vec<Permission> = group
                .permissions
                .iter()
                .filter(|permission| permission.matches_query(&query))
                .cloned()
                .collect();

            (!permissions.is_empty()).then(|| PermissionGroup {
                category: group.category,
                label: group.label.clone(),
                permissions,
            })
        })
        .collect()
}
