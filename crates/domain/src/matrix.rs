use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

use darchiva_core::AppError;
use serde::{Deserialize, Serialize};

use crate::PermissionLevel;

/// Subject kind of a permission grant.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityType {
    /// Individual user.
    #[default]
    User,
    /// User group.
    Group,
}

impl EntityType {
    /// Returns a stable transport value.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Group => "group",
        }
    }
}

impl Display for EntityType {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(self.as_str())
    }
}

impl FromStr for EntityType {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "user" => Ok(Self::User),
            "group" => Ok(Self::Group),
            _ => Err(AppError::Validation(format!(
                "unknown entity type '{value}'"
            ))),
        }
    }
}

/// Denormalized grid row mapping resources to grant levels for one entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissionMatrixRow {
    /// Subject kind.
    pub entity_type: EntityType,
    /// Subject identifier.
    pub entity_id: String,
    /// Subject display name.
    pub entity_name: String,
    /// Level per resource key.
    #[serde(default)]
    pub permissions: BTreeMap<String, PermissionLevel>,
}

impl PermissionMatrixRow {
    /// Returns the level for a resource, `none` when absent.
    #[must_use]
    pub fn level_for(&self, resource: &str) -> PermissionLevel {
        self.permissions.get(resource).copied().unwrap_or_default()
    }

    /// Returns whether this row describes the given subject.
    #[must_use]
    pub fn is_entity(&self, entity_type: EntityType, entity_id: &str) -> bool {
        self.entity_type == entity_type && self.entity_id == entity_id
    }

    /// Applies one cell update when it targets this row.
    pub fn apply(&mut self, update: &PermissionCellUpdate) -> bool {
        if !self.is_entity(update.entity_type, update.entity_id.as_str()) {
            return false;
        }

        self.permissions
            .insert(update.resource.clone(), update.level);
        true
    }
}

/// Single-cell grant change sent to the matrix endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PermissionCellUpdate {
    /// Subject kind.
    pub entity_type: EntityType,
    /// Subject identifier.
    pub entity_id: String,
    /// Resource key.
    pub resource: String,
    /// New level.
    pub level: PermissionLevel,
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::{EntityType, PermissionCellUpdate, PermissionMatrixRow};
    use crate::PermissionLevel;

    fn row() -> PermissionMatrixRow {
        PermissionMatrixRow {
            entity_type: EntityType::User,
            entity_id: "u1".to_owned(),
            entity_name: "Ada".to_owned(),
            permissions: BTreeMap::from([("documents".to_owned(), PermissionLevel::Write)]),
        }
    }

    #[test]
    fn missing_resource_defaults_to_none() {
        let row = row();
        assert_eq!(row.level_for("documents"), PermissionLevel::Write);
        assert_eq!(row.level_for("billing"), PermissionLevel::None);
    }

    #[test]
    fn apply_only_touches_matching_entity() {
        let mut row = row();
        let foreign = PermissionCellUpdate {
            entity_type: EntityType::Group,
            entity_id: "u1".to_owned(),
            resource: "billing".to_owned(),
            level: PermissionLevel::Owner,
        };
        assert!(!row.apply(&foreign));
        assert_eq!(row.level_for("billing"), PermissionLevel::None);

        let own = PermissionCellUpdate {
            entity_type: EntityType::User,
            ..foreign
        };
        assert!(row.apply(&own));
        assert_eq!(row.level_for("billing"), PermissionLevel::Owner);
    }

    #[test]
    fn row_deserializes_from_transport_payload() {
        let row: Result<PermissionMatrixRow, _> = serde_json::from_str(
            r#"{"entity_type":"group","entity_id":"g1","entity_name":"Ops","permissions":{"tags":"read"}}"#,
        );
        assert!(matches!(
            row,
            Ok(row) if row.entity_type == EntityType::Group && row.level_for("tags") == PermissionLevel::Read
        ));
    }
}
