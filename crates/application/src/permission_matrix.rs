//! Client-side pipeline over permission matrix rows: filter, sort, edit and
//! CSV export.

use std::cmp::Ordering;

use darchiva_core::{AppError, AppResult};
use darchiva_domain::{EntityType, PermissionCellUpdate, PermissionLevel, PermissionMatrixRow};

/// Resource columns in display order as `(key, header)`.
pub const RESOURCE_COLUMNS: [(&str, &str); 8] = [
    ("documents", "Documents"),
    ("folders", "Folders"),
    ("tags", "Tags"),
    ("workflows", "Workflows"),
    ("scanning", "Scanning"),
    ("settings", "Settings"),
    ("users", "Users"),
    ("billing", "Billing"),
];

/// Column a matrix is ordered by.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum MatrixSortKey {
    /// Entity name.
    #[default]
    Name,
    /// Level in one resource column.
    Resource(String),
}

impl MatrixSortKey {
    /// Parses `name` or a resource key.
    #[must_use]
    pub fn parse(value: &str) -> Self {
        if value == "name" {
            Self::Name
        } else {
            Self::Resource(value.to_owned())
        }
    }
}

/// Active ordering of the grid.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MatrixSort {
    /// Ordering column.
    pub key: MatrixSortKey,
    /// Reverses the comparator.
    pub descending: bool,
}

impl MatrixSort {
    /// Header click: same column flips direction, another column is adopted
    /// with the current direction.
    pub fn click_column(&mut self, key: MatrixSortKey) {
        if self.key == key {
            self.descending = !self.descending;
        } else {
            self.key = key;
        }
    }

    fn compare(&self, left: &PermissionMatrixRow, right: &PermissionMatrixRow) -> Ordering {
        let ordering = match &self.key {
            MatrixSortKey::Name => left
                .entity_name
                .to_lowercase()
                .cmp(&right.entity_name.to_lowercase()),
            MatrixSortKey::Resource(resource) => left
                .level_for(resource)
                .rank()
                .cmp(&right.level_for(resource).rank()),
        };

        if self.descending {
            ordering.reverse()
        } else {
            ordering
        }
    }
}

/// Search and sort state of the grid.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MatrixView {
    /// Entity name search.
    pub search: String,
    /// Active ordering.
    pub sort: MatrixSort,
}

impl MatrixView {
    /// Returns the visible rows: filtered by name, then stably sorted.
    #[must_use]
    pub fn process<'a>(&self, rows: &'a [PermissionMatrixRow]) -> Vec<&'a PermissionMatrixRow> {
        let mut visible = filter_rows(rows, &self.search);
        visible.sort_by(|left, right| self.sort.compare(left, right));
        visible
    }
}

/// Keeps rows whose name contains `query`, ignoring case.
#[must_use]
pub fn filter_rows<'a>(rows: &'a [PermissionMatrixRow], query: &str) -> Vec<&'a PermissionMatrixRow> {
    let query = query.to_lowercase();
    rows.iter()
        .filter(|row| query.is_empty() || row.entity_name.to_lowercase().contains(&query))
        .collect()
}

/// Single-cell edit mode.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CellEditor {
    editing: Option<EditingCell>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct EditingCell {
    entity_type: EntityType,
    entity_id: String,
    resource: String,
}

impl CellEditor {
    /// Enters edit mode for one cell, replacing any other.
    pub fn select_cell(&mut self, row: &PermissionMatrixRow, resource: &str) {
        self.editing = Some(EditingCell {
            entity_type: row.entity_type,
            entity_id: row.entity_id.clone(),
            resource: resource.to_owned(),
        });
    }

    /// Returns `(entity_id, resource)` of the cell being edited.
    #[must_use]
    pub fn editing(&self) -> Option<(&str, &str)> {
        self.editing
            .as_ref()
            .map(|cell| (cell.entity_id.as_str(), cell.resource.as_str()))
    }

    /// Picks a level for the edited cell and leaves edit mode.
    pub fn choose_level(&mut self, level: PermissionLevel) -> Option<PermissionCellUpdate> {
        self.editing.take().map(|cell| PermissionCellUpdate {
            entity_type: cell.entity_type,
            entity_id: cell.entity_id,
            resource: cell.resource,
            level,
        })
    }

    /// Leaves edit mode without a change.
    pub fn cancel(&mut self) {
        self.editing = None;
    }
}

/// Renders rows as CSV with the fixed resource column order.
pub fn export_csv(rows: &[PermissionMatrixRow]) -> AppResult<String> {
    let mut writer = csv::WriterBuilder::new()
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    let header = ["Entity", "Type"]
        .into_iter()
        .chain(RESOURCE_COLUMNS.iter().map(|(_, label)| *label));
    writer.write_record(header).map_err(csv_error)?;

    for row in rows {
        let levels = RESOURCE_COLUMNS
            .iter()
            .map(|(resource, _)| row.level_for(resource).as_str());
        let record = [row.entity_name.as_str(), row.entity_type.as_str()]
            .into_iter()
            .chain(levels);
        writer.write_record(record).map_err(csv_error)?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|error| AppError::Internal(format!("failed to flush matrix csv: {error}")))?;
    String::from_utf8(bytes)
        .map_err(|error| AppError::Internal(format!("matrix csv is not valid utf-8: {error}")))
}

/// Returns the download name for an export of one entity type.
#[must_use]
pub fn export_file_name(entity_type: EntityType) -> String {
    format!("permission-matrix-{entity_type}s.csv")
}

fn csv_error(error: csv::Error) -> AppError {
    AppError::Internal(format!("failed to write matrix csv: {error}"))
}

#[cfg(test)]
mod tests;
