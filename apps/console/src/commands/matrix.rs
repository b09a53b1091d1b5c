use std::path::PathBuf;

use clap::{Args, Subcommand};
use tracing::info;

use darchiva_application::{
    CellEditor, MatrixQuery, MatrixSort, MatrixSortKey, MatrixView, RESOURCE_COLUMNS, export_csv,
    export_file_name,
};
use darchiva_core::{AppError, AppResult};
use darchiva_domain::{EntityType, PermissionLevel, PermissionMatrixRow};

use crate::console_services::ConsoleServices;

/// Permission matrix commands.
#[derive(Debug, Subcommand)]
pub enum MatrixCommand {
    /// Print the grid.
    Show {
        #[command(flatten)]
        source: MatrixSource,
        #[command(flatten)]
        view: ViewArgs,
    },
    /// Write every loaded row to `permission-matrix-<type>s.csv`.
    Export {
        #[command(flatten)]
        source: MatrixSource,
        /// Directory the file is written to.
        #[arg(long, default_value = ".")]
        output_dir: PathBuf,
    },
    /// Change one cell.
    Set {
        #[command(flatten)]
        source: MatrixSource,
        /// User or group identifier.
        #[arg(long)]
        entity_id: String,
        /// Resource column key.
        #[arg(long)]
        resource: String,
        /// New level: none, read, write, admin or owner.
        #[arg(long)]
        level: PermissionLevel,
    },
}

/// Which rows are fetched.
#[derive(Debug, Args)]
pub struct MatrixSource {
    /// Subject kind: user or group.
    #[arg(long, default_value = "user")]
    entity_type: EntityType,
    /// Restricts to one resource type.
    #[arg(long)]
    resource_type: Option<String>,
}

impl MatrixSource {
    fn query(&self) -> MatrixQuery {
        MatrixQuery {
            entity_type: self.entity_type,
            resource_type: self.resource_type.clone(),
        }
    }
}

/// Client-side search and ordering.
#[derive(Debug, Args)]
pub struct ViewArgs {
    /// Entity name search.
    #[arg(long, default_value = "")]
    search: String,
    /// `name` or a resource column key.
    #[arg(long, default_value = "name")]
    sort: String,
    /// Sort descending.
    #[arg(long)]
    desc: bool,
}

impl ViewArgs {
    fn view(&self) -> AppResult<MatrixView> {
        let key = MatrixSortKey::parse(self.sort.trim());
        if let MatrixSortKey::Resource(resource) = &key
            && !RESOURCE_COLUMNS.iter().any(|(column, _)| column == resource)
        {
            return Err(AppError::Validation(format!(
                "unknown sort column '{resource}'"
            )));
        }

        Ok(MatrixView {
            search: self.search.clone(),
            sort: MatrixSort {
                key,
                descending: self.desc,
            },
        })
    }
}

pub async fn run(services: &ConsoleServices, command: MatrixCommand) -> AppResult<()> {
    let iam = &services.iam;
    match command {
        MatrixCommand::Show { source, view } => {
            let view = view.view()?;
            let rows = iam.permission_matrix(&source.query()).await?;
            print_grid(&view.process(&rows));
            Ok(())
        }
        MatrixCommand::Export { source, output_dir } => {
            let rows = iam.permission_matrix(&source.query()).await?;
            let csv = export_csv(&rows)?;

            let path = output_dir.join(export_file_name(source.entity_type));
            tokio::fs::write(&path, csv).await.map_err(|error| {
                AppError::Internal(format!("failed to write '{}': {error}", path.display()))
            })?;
            info!(path = %path.display(), rows = rows.len(), "exported permission matrix");
            println!("{}", path.display());
            Ok(())
        }
        MatrixCommand::Set {
            source,
            entity_id,
            resource,
            level,
        } => {
            if !RESOURCE_COLUMNS.iter().any(|(column, _)| *column == resource) {
                return Err(AppError::Validation(format!(
                    "unknown resource column '{resource}'"
                )));
            }

            let query = source.query();
            let rows = iam.permission_matrix(&query).await?;
            let row = rows
                .iter()
                .find(|row| row.is_entity(query.entity_type, &entity_id))
                .ok_or_else(|| {
                    AppError::NotFound(format!(
                        "{} '{entity_id}' is not in the permission matrix",
                        query.entity_type
                    ))
                })?;

            let previous = row.level_for(&resource);
            let mut editor = CellEditor::default();
            editor.select_cell(row, &resource);
            let Some(update) = editor.choose_level(level) else {
                return Ok(());
            };

            iam.update_permission_cell(&query, &update).await?;
            println!(
                "{} {resource}: {} -> {}",
                row.entity_name,
                previous.as_str(),
                level.as_str()
            );
            Ok(())
        }
    }
}

fn print_grid(rows: &[&PermissionMatrixRow]) {
    let mut header = format!("{:<32} {:<6}", "Entity", "Type");
    for (_, label) in RESOURCE_COLUMNS {
        header.push_str(&format!(" {label:<10}"));
    }
    println!("{}", header.trim_end());

    for row in rows {
        let mut line = format!("{:<32} {:<6}", row.entity_name, row.entity_type.as_str());
        for (resource, _) in RESOURCE_COLUMNS {
            line.push_str(&format!(" {:<10}", row.level_for(resource).as_str()));
        }
        println!("{}", line.trim_end());
    }
}
