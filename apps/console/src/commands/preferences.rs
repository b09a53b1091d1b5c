use clap::Subcommand;

use darchiva_core::{AppError, AppResult};
use darchiva_domain::PreferencesPatch;

use super::print_json;
use crate::console_services::ConsoleServices;

/// Preference commands.
#[derive(Debug, Subcommand)]
pub enum PreferencesCommand {
    /// Print the current preferences.
    Show,
    /// Change one or more preferences given as `field=value`.
    Set {
        /// Assignments such as `theme=dark` or `default_scan_resolution=600`.
        #[arg(required = true, value_name = "FIELD=VALUE")]
        assignments: Vec<String>,
    },
    /// Restore the defaults.
    Reset,
}

pub async fn run(services: &ConsoleServices, command: PreferencesCommand) -> AppResult<()> {
    let preferences = &services.preferences;
    match command {
        PreferencesCommand::Show => print_json(&preferences.get().await?),
        PreferencesCommand::Set { assignments } => {
            let patch = parse_assignments(&assignments)?;
            print_json(&preferences.update(&patch).await?)
        }
        PreferencesCommand::Reset => print_json(&preferences.reset().await?),
    }
}

fn parse_assignments(assignments: &[String]) -> AppResult<PreferencesPatch> {
    let mut patch = PreferencesPatch::default();
    for assignment in assignments {
        let (field, value) = assignment.split_once('=').ok_or_else(|| {
            AppError::Validation(format!("expected FIELD=VALUE, got '{assignment}'"))
        })?;
        patch.set(field.trim(), value.trim())?;
    }
    Ok(patch)
}

#[cfg(test)]
mod tests {
    use darchiva_core::AppError;
    use darchiva_domain::ThemeMode;

    use super::parse_assignments;

    #[test]
    fn assignments_build_a_patch() {
        let patch = parse_assignments(&["theme = dark".to_owned()]);

        assert!(matches!(patch, Ok(patch) if patch.theme == Some(ThemeMode::Dark)));
    }

    #[test]
    fn malformed_assignments_are_rejected() {
        assert!(matches!(
            parse_assignments(&["theme".to_owned()]),
            Err(AppError::Validation(_))
        ));
    }
}
