use clap::{Args, Subcommand};
use tracing::warn;

use darchiva_application::{RoleDraft, RoleListQuery, filter_catalog};
use darchiva_core::{AppError, AppResult};
use darchiva_domain::{Permission, PermissionCategory};

use super::print_json;
use crate::console_services::ConsoleServices;

/// Role builder and role lifecycle commands.
#[derive(Debug, Subcommand)]
pub enum RolesCommand {
    /// List roles.
    List {
        /// Name search.
        #[arg(long)]
        search: Option<String>,
        /// Only system roles.
        #[arg(long, conflicts_with = "custom")]
        system: bool,
        /// Only custom roles.
        #[arg(long)]
        custom: bool,
        /// One-based page number.
        #[arg(long, default_value_t = 1)]
        page: u32,
        /// Page size.
        #[arg(long, default_value_t = 25)]
        page_size: u32,
    },
    /// Print one role as JSON.
    Show {
        /// Role identifier.
        role_id: String,
    },
    /// Print the permission catalog grouped by category.
    Catalog {
        /// Name, codename or description search.
        #[arg(long, default_value = "")]
        search: String,
    },
    /// List role templates.
    Templates,
    /// Apply edits to a draft and print its warnings without saving.
    Lint(DraftEdits),
    /// Apply edits to a draft and save it.
    Save(DraftEdits),
    /// Delete a custom role.
    Delete {
        /// Role identifier.
        role_id: String,
    },
    /// Copy a role under a new name.
    Clone {
        /// Source role identifier.
        role_id: String,
        /// Name of the copy.
        #[arg(long)]
        name: String,
    },
}

/// Edits applied, in order, to a new or existing role draft.
#[derive(Debug, Args)]
pub struct DraftEdits {
    /// Start from an existing role instead of an empty draft.
    #[arg(long, value_name = "ROLE_ID")]
    role: Option<String>,
    /// Replace the selection with a template's grants.
    #[arg(long, value_name = "TEMPLATE_ID")]
    template: Option<String>,
    /// Role name.
    #[arg(long)]
    name: Option<String>,
    /// Role description.
    #[arg(long)]
    description: Option<String>,
    /// Select all of a category, or clear it when fully selected.
    #[arg(long = "toggle-category", value_name = "CATEGORY")]
    toggle_categories: Vec<PermissionCategory>,
    /// Permission id or codename to select.
    #[arg(long = "grant", value_name = "PERMISSION")]
    grants: Vec<String>,
    /// Permission id or codename to deselect.
    #[arg(long = "revoke", value_name = "PERMISSION")]
    revokes: Vec<String>,
}

pub async fn run(services: &ConsoleServices, command: RolesCommand) -> AppResult<()> {
    let iam = &services.iam;
    match command {
        RolesCommand::List {
            search,
            system,
            custom,
            page,
            page_size,
        } => {
            let query = RoleListQuery {
                page,
                page_size,
                search,
                is_system: (system || custom).then_some(system),
            };
            let roles = iam.list_roles(&query).await?;
            for role in &roles.items {
                println!(
                    "{:<38} {:<32} {:<7} users={:<5} groups={:<5} permissions={}",
                    role.id,
                    role.name,
                    if role.is_system { "system" } else { "custom" },
                    role.user_count,
                    role.group_count,
                    role.permissions.len()
                );
            }
            println!(
                "page {}, {} roles total{}",
                roles.page,
                roles.total,
                if roles.has_more() { " (more available)" } else { "" }
            );
            Ok(())
        }
        RolesCommand::Show { role_id } => print_json(&iam.get_role(&role_id).await?),
        RolesCommand::Catalog { search } => {
            let groups = iam.permission_groups().await?;
            for group in filter_catalog(&groups, &search) {
                println!("{} ({})", group.label, group.category.as_str());
                for permission in &group.permissions {
                    println!(
                        "  {:<36} {:<28} {}{}",
                        permission.id,
                        permission.codename,
                        permission.name,
                        if permission.is_dangerous { " [dangerous]" } else { "" }
                    );
                }
            }
            Ok(())
        }
        RolesCommand::Templates => {
            for template in iam.role_templates().await? {
                println!(
                    "{:<24} {:<28} {} permissions",
                    template.id,
                    template.name,
                    template.permission_ids.len()
                );
            }
            Ok(())
        }
        RolesCommand::Lint(edits) => {
            let draft = build_draft(services, &edits).await?;
            let conflicts = draft.conflicts();
            if conflicts.is_empty() {
                println!("no warnings");
            }
            for conflict in conflicts {
                println!("warning: {conflict}");
            }
            if let Err(errors) = draft.validate() {
                for error in errors {
                    println!("error: {error}");
                }
            }
            Ok(())
        }
        RolesCommand::Save(edits) => {
            let draft = build_draft(services, &edits).await?;
            for conflict in draft.conflicts() {
                warn!(warning = %conflict, "saving role with warning");
            }
            let role = iam.save_role(&draft).await?;
            println!("saved role {} ({})", role.name, role.id);
            Ok(())
        }
        RolesCommand::Delete { role_id } => {
            let role = iam.get_role(&role_id).await?;
            iam.delete_role(&role).await?;
            println!("deleted role {}", role.name);
            Ok(())
        }
        RolesCommand::Clone { role_id, name } => {
            let role = iam.clone_role(&role_id, &name).await?;
            println!("cloned role as {} ({})", role.name, role.id);
            Ok(())
        }
    }
}

async fn build_draft(services: &ConsoleServices, edits: &DraftEdits) -> AppResult<RoleDraft> {
    let iam = &services.iam;
    let mut draft = match &edits.role {
        Some(role_id) => iam.draft_for_role(role_id).await?,
        None => iam.new_draft().await?,
    };

    if let Some(template_id) = &edits.template {
        let templates = iam.role_templates().await?;
        let template = templates
            .iter()
            .find(|template| &template.id == template_id)
            .ok_or_else(|| {
                AppError::NotFound(format!("role template '{template_id}' does not exist"))
            })?;
        draft.apply_template(template);
    }
    if let Some(name) = &edits.name {
        draft.set_name(name.as_str());
    }
    if let Some(description) = &edits.description {
        draft.set_description(description.as_str());
    }

    if !edits.toggle_categories.is_empty() {
        let groups = iam.permission_groups().await?;
        for category in &edits.toggle_categories {
            let group = groups
                .iter()
                .find(|group| group.category == *category)
                .ok_or_else(|| {
                    AppError::NotFound(format!(
                        "permission category '{}' is empty",
                        category.as_str()
                    ))
                })?;
            draft.toggle_category_all(group);
        }
    }

    if !edits.grants.is_empty() || !edits.revokes.is_empty() {
        let catalog = iam.permissions().await?;
        for grant in &edits.grants {
            let permission_id = resolve_permission(&catalog, grant);
            if !draft.is_selected(permission_id) {
                draft.toggle_permission(permission_id);
            }
        }
        for revoke in &edits.revokes {
            let permission_id = resolve_permission(&catalog, revoke);
            if draft.is_selected(permission_id) {
                draft.toggle_permission(permission_id);
            }
        }
    }

    Ok(draft)
}

/// Maps a codename to its identifier; unknown values pass through and are
/// reported by draft validation.
fn resolve_permission<'a>(catalog: &'a [Permission], value: &'a str) -> &'a str {
    catalog
        .iter()
        .find(|permission| permission.id == value || permission.codename == value)
        .map_or(value, |permission| permission.id.as_str())
}

#[cfg(test)]
mod tests {
    use darchiva_domain::{Permission, PermissionCategory};

    use super::resolve_permission;

    fn permission(id: &str, codename: &str) -> Permission {
        Permission {
            id: id.to_owned(),
            codename: codename.to_owned(),
            name: codename.to_owned(),
            category: PermissionCategory::Document,
            description: None,
            is_dangerous: false,
        }
    }

    #[test]
    fn codenames_resolve_to_identifiers() {
        let catalog = vec![permission("p-1", "document.view"), permission("p-2", "document.delete")];

        assert_eq!(resolve_permission(&catalog, "document.delete"), "p-2");
        assert_eq!(resolve_permission(&catalog, "p-1"), "p-1");
        assert_eq!(resolve_permission(&catalog, "folder.view"), "folder.view");
    }
}
