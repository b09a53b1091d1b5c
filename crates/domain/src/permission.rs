use std::fmt::{Display, Formatter};
use std::str::FromStr;

use darchiva_core::AppError;
use serde::{Deserialize, Serialize};

/// Grant strength for one resource, ordered from weakest to strongest.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum PermissionLevel {
    /// No access.
    #[default]
    None,
    /// Read-only access.
    Read,
    /// Read and write access.
    Write,
    /// Administrative access.
    Admin,
    /// Full ownership.
    Owner,
}

impl PermissionLevel {
    /// Returns a stable transport value for this level.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Read => "read",
            Self::Write => "write",
            Self::Admin => "admin",
            Self::Owner => "owner",
        }
    }

    /// Returns the numeric rank used for grid sorting.
    #[must_use]
    pub fn rank(&self) -> u8 {
        match self {
            Self::None => 0,
            Self::Read => 1,
            Self::Write => 2,
            Self::Admin => 3,
            Self::Owner => 4,
        }
    }

    /// Returns all levels in ascending order.
    #[must_use]
    pub fn all() -> &'static [Self] {
        const ALL: &[PermissionLevel] = &[
            PermissionLevel::None,
            PermissionLevel::Read,
            PermissionLevel::Write,
            PermissionLevel::Admin,
            PermissionLevel::Owner,
        ];

        ALL
    }
}

impl Display for PermissionLevel {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(self.as_str())
    }
}

impl FromStr for PermissionLevel {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "none" => Ok(Self::None),
            "read" => Ok(Self::Read),
            "write" => Ok(Self::Write),
            "admin" => Ok(Self::Admin),
            "owner" => Ok(Self::Owner),
            _ => Err(AppError::Validation(format!(
                "unknown permission level '{value}'"
            ))),
        }
    }
}

/// Permission categories aligned with backend scopes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PermissionCategory {
    /// Files and folders.
    Node,
    /// Documents.
    Document,
    /// Document pages.
    Page,
    /// Tags.
    Tag,
    /// Users.
    User,
    /// Groups.
    Group,
    /// Roles.
    Role,
    /// Workflows.
    Workflow,
    /// Portfolios.
    Portfolio,
    /// Cases.
    Case,
    /// Bundles.
    Bundle,
    /// Scanning.
    Scanning,
    /// Billing.
    Billing,
    /// Settings.
    Settings,
    /// Audit logs.
    Audit,
    /// Tenant administration.
    Tenant,
    /// System administration.
    System,
}

impl PermissionCategory {
    /// Returns a stable transport value for this category.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Node => "node",
            Self::Document => "document",
            Self::Page => "page",
            Self::Tag => "tag",
            Self::User => "user",
            Self::Group => "group",
            Self::Role => "role",
            Self::Workflow => "workflow",
            Self::Portfolio => "portfolio",
            Self::Case => "case",
            Self::Bundle => "bundle",
            Self::Scanning => "scanning",
            Self::Billing => "billing",
            Self::Settings => "settings",
            Self::Audit => "audit",
            Self::Tenant => "tenant",
            Self::System => "system",
        }
    }

    /// Returns the human-readable label shown in admin listings.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::Node => "Files & Folders",
            Self::Document => "Documents",
            Self::Page => "Pages",
            Self::Tag => "Tags",
            Self::User => "Users",
            Self::Group => "Groups",
            Self::Role => "Roles",
            Self::Workflow => "Workflows",
            Self::Portfolio => "Portfolios",
            Self::Case => "Cases",
            Self::Bundle => "Bundles",
            Self::Scanning => "Scanning",
            Self::Billing => "Billing",
            Self::Settings => "Settings",
            Self::Audit => "Audit Logs",
            Self::Tenant => "Tenant",
            Self::System => "System",
        }
    }

    /// Returns all known categories.
    #[must_use]
    pub fn all() -> &'static [Self] {
        const ALL: &[PermissionCategory] = &[
            PermissionCategory::Node,
            PermissionCategory::Document,
            PermissionCategory::Page,
            PermissionCategory::Tag,
            PermissionCategory::User,
            PermissionCategory::Group,
            PermissionCategory::Role,
            PermissionCategory::Workflow,
            PermissionCategory::Portfolio,
            PermissionCategory::Case,
            PermissionCategory::Bundle,
            PermissionCategory::Scanning,
            PermissionCategory::Billing,
            PermissionCategory::Settings,
            PermissionCategory::Audit,
            PermissionCategory::Tenant,
            PermissionCategory::System,
        ];

        ALL
    }
}

impl FromStr for PermissionCategory {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::all()
            .iter()
            .copied()
            .find(|category| category.as_str() == value)
            .ok_or_else(|| AppError::Validation(format!("unknown permission category '{value}'")))
    }
}

/// One grantable permission from the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Permission {
    /// Stable permission identifier.
    pub id: String,
    /// Dotted `category.action` string.
    pub codename: String,
    /// Display name.
    pub name: String,
    /// Owning category.
    pub category: PermissionCategory,
    /// Optional description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Marks permissions that warrant extra review.
    #[serde(default)]
    pub is_dangerous: bool,
}

impl Permission {
    /// Returns whether the permission matches a lower-cased search query.
    #[must_use]
    pub fn matches_query(&self, lowered_query: &str) -> bool {
        self.name.to_lowercase().contains(lowered_query)
            || self.codename.to_lowercase().contains(lowered_query)
            || self
                .description
                .as_deref()
                .is_some_and(|description| description.to_lowercase().contains(lowered_query))
    }
}

/// Catalog permissions grouped by category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissionGroup {
    /// Grouping category.
    pub category: PermissionCategory,
    /// Display label.
    pub label: String,
    /// Permissions in the category.
    pub permissions: Vec<Permission>,
}

/// Returns the category segment of a dotted codename.
#[must_use]
pub fn codename_category(codename: &str) -> &str {
    codename
        .split_once('.')
        .map_or(codename, |(category, _)| category)
}
