//! Application services and ports.

#![forbid(unsafe_code)]

mod admin_api_ports;
mod email_import_service;
mod iam_admin_service;
mod permission_matrix;
mod preferences_service;
mod query_cache;
mod role_builder;
mod scan_service;

pub use admin_api_ports::{
    EmailImportApi, EmailImportOptions, EmailImportQuery, IamApi, MatrixQuery, PreferencesApi,
    RoleListQuery, SaveRoleRequest, ScannerApi,
};
pub use email_import_service::EmailImportService;
pub use iam_admin_service::{DEFAULT_CATALOG_TTL, IamAdminService};
pub use permission_matrix::{
    CellEditor, MatrixSort, MatrixSortKey, MatrixView, RESOURCE_COLUMNS, export_csv,
    export_file_name, filter_rows,
};
pub use preferences_service::PreferencesService;
pub use query_cache::{InvalidationGraph, QueryCache, QueryClient, QueryKey};
pub use role_builder::{RoleDraft, RoleLint, RoleValidationError, filter_catalog};
pub use scan_service::{DEFAULT_POLL_INTERVAL, ScanService};
