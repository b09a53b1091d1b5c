//! Darchiva administration console.

#![forbid(unsafe_code)]

mod commands;
mod console_config;
mod console_services;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use darchiva_core::AppError;

use crate::commands::{
    EmailCommand, GroupsCommand, MatrixCommand, PreferencesCommand, RolesCommand, ScanCommand,
};
use crate::console_config::ConsoleConfig;
use crate::console_services::ConsoleServices;

#[derive(Debug, Parser)]
#[command(
    name = "darchiva",
    version,
    about = "Darchiva archive administration console",
    long_about = None
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    #[command(subcommand, about = "Role builder and role lifecycle")]
    Roles(RolesCommand),
    #[command(subcommand, about = "Permission matrix view, edit and export")]
    Matrix(MatrixCommand),
    #[command(subcommand, about = "Group hierarchy")]
    Groups(GroupsCommand),
    #[command(subcommand, about = "Scanners and scan jobs")]
    Scan(ScanCommand),
    #[command(subcommand, about = "Email imports")]
    Email(EmailCommand),
    #[command(subcommand, about = "Current user preferences")]
    Preferences(PreferencesCommand),
}

#[tokio::main]
async fn main() -> Result<(), AppError> {
    dotenvy::dotenv().ok();
    init_tracing();

    let cli = Cli::parse();
    let config = ConsoleConfig::load()?;
    let services = ConsoleServices::build(&config)?;

    match cli.command {
        Commands::Roles(command) => commands::roles::run(&services, command).await,
        Commands::Matrix(command) => commands::matrix::run(&services, command).await,
        Commands::Groups(command) => commands::groups::run(&services, command).await,
        Commands::Scan(command) => commands::scan::run(&services, command).await,
        Commands::Email(command) => commands::email::run(&services, command).await,
        Commands::Preferences(command) => commands::preferences::run(&services, command).await,
    }
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::Cli;

    #[test]
    fn command_tree_is_consistent() {
        Cli::command().debug_assert();
    }
}
