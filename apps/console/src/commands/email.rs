use std::path::PathBuf;

use clap::Subcommand;

use darchiva_application::{EmailImportOptions, EmailImportQuery};
use darchiva_core::{AppError, AppResult};
use darchiva_domain::EmailUpload;

use crate::console_services::ConsoleServices;

/// Email import commands.
#[derive(Debug, Subcommand)]
pub enum EmailCommand {
    /// Upload one `.eml` or `.msg` file.
    Import {
        /// Message file.
        file: PathBuf,
        /// Destination folder.
        #[arg(long)]
        folder: Option<String>,
        /// Import attachments as separate documents.
        #[arg(long)]
        attachments: Option<bool>,
    },
    /// List imported messages.
    List {
        /// Restricts to one folder.
        #[arg(long)]
        folder: Option<String>,
        /// Subject or sender search.
        #[arg(long)]
        search: Option<String>,
        /// One-based page number.
        #[arg(long, default_value_t = 1)]
        page: u32,
        /// Page size.
        #[arg(long, default_value_t = 25)]
        page_size: u32,
    },
    /// Delete one import.
    Delete {
        /// Import identifier.
        import_id: String,
    },
}

pub async fn run(services: &ConsoleServices, command: EmailCommand) -> AppResult<()> {
    let emails = &services.emails;
    match command {
        EmailCommand::Import {
            file,
            folder,
            attachments,
        } => {
            let file_name = file
                .file_name()
                .and_then(|name| name.to_str())
                .ok_or_else(|| {
                    AppError::Validation(format!("'{}' is not a file path", file.display()))
                })?
                .to_owned();
            let bytes = tokio::fs::read(&file).await.map_err(|error| {
                AppError::Validation(format!("failed to read '{}': {error}", file.display()))
            })?;
            let upload = EmailUpload::new(file_name, bytes)?;

            let options = EmailImportOptions {
                folder_id: folder,
                import_attachments: attachments,
            };
            let imported = emails.import(upload, &options).await?;
            println!(
                "{} {} {}",
                imported.id,
                imported.import_status.as_str(),
                imported.subject.as_deref().unwrap_or("(no subject)")
            );
            Ok(())
        }
        EmailCommand::List {
            folder,
            search,
            page,
            page_size,
        } => {
            let query = EmailImportQuery {
                page,
                page_size,
                folder_id: folder,
                search,
            };
            let imports = emails.list(&query).await?;
            for import in &imports.items {
                println!(
                    "{:<38} {:<10} {:<20} {:<32} {}",
                    import.id,
                    import.import_status.as_str(),
                    import.created_at.format("%Y-%m-%d %H:%M"),
                    import.from_address,
                    import.subject.as_deref().unwrap_or("(no subject)")
                );
            }
            println!("page {}, {} imports total", imports.page, imports.total);
            Ok(())
        }
        EmailCommand::Delete { import_id } => {
            emails.delete(&import_id).await?;
            println!("deleted import {import_id}");
            Ok(())
        }
    }
}
