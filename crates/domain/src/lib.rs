//! Domain entities and invariants.

#![forbid(unsafe_code)]

mod email;
mod group;
mod matrix;
mod permission;
mod preferences;
mod role;
mod scanner;

pub use email::{EMAIL_IMPORT_EXTENSIONS, EmailImport, EmailImportStatus, EmailSource, EmailUpload};
pub use group::{Group, HierarchyViolation};
pub use matrix::{EntityType, PermissionCellUpdate, PermissionMatrixRow};
pub use permission::{
    Permission, PermissionCategory, PermissionGroup, PermissionLevel, codename_category,
};
pub use preferences::{
    DateFormat, PreferencesPatch, ScanColorPreference, ScanFormatPreference, ThemeMode,
    UserPreferences, ViewMode,
};
pub use role::{Role, RoleRef, RoleTemplate};
pub use scanner::{
    ColorMode, ImageFormat, InputSource, ScanJob, ScanJobStatus, ScanOption, ScanOptionViolation,
    ScanOptions, Scanner, ScannerCapabilities, ScannerProtocol, ScannerStatus, StartScanRequest,
};
