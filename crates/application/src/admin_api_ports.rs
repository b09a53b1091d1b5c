mod email;
mod iam;
mod preferences;
mod scanning;

pub use email::{EmailImportApi, EmailImportOptions, EmailImportQuery};
pub use iam::{IamApi, MatrixQuery, RoleListQuery, SaveRoleRequest};
pub use preferences::PreferencesApi;
pub use scanning::ScannerApi;
