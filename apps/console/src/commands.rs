use serde::Serialize;

use darchiva_core::{AppError, AppResult};

pub mod email;
pub mod groups;
pub mod matrix;
pub mod preferences;
pub mod roles;
pub mod scan;

pub use email::EmailCommand;
pub use groups::GroupsCommand;
pub use matrix::MatrixCommand;
pub use preferences::PreferencesCommand;
pub use roles::RolesCommand;
pub use scan::ScanCommand;

fn print_json<T>(value: &T) -> AppResult<()>
where
    T: Serialize + ?Sized,
{
    let rendered = serde_json::to_string_pretty(value)
        .map_err(|error| AppError::Internal(format!("failed to render output: {error}")))?;
    println!("{rendered}");
    Ok(())
}
