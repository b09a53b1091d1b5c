use async_trait::async_trait;

use darchiva_core::AppResult;
use darchiva_domain::{ScanJob, Scanner, StartScanRequest};

/// Port for scanner fleet and scan job endpoints.
#[async_trait]
pub trait ScannerApi: Send + Sync {
    /// Lists registered scanners.
    async fn list_scanners(&self) -> AppResult<Vec<Scanner>>;

    /// Starts a scan job on a scanner.
    async fn start_scan(&self, scanner_id: &str, request: &StartScanRequest) -> AppResult<ScanJob>;

    /// Returns the current job snapshot.
    async fn get_scan_job(&self, job_id: &str) -> AppResult<ScanJob>;

    /// Requests cancellation of a job.
    async fn cancel_scan_job(&self, job_id: &str) -> AppResult<()>;
}
