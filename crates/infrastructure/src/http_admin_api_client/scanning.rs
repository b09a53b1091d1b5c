use darchiva_application::ScannerApi;
use darchiva_domain::{ScanJob, Scanner, StartScanRequest};

use super::*;

#[async_trait]
impl ScannerApi for HttpAdminApiClient {
    async fn list_scanners(&self) -> AppResult<Vec<Scanner>> {
        self.send_json(self.v1(Method::GET, &["scanners"])?).await
    }

    async fn start_scan(&self, scanner_id: &str, request: &StartScanRequest) -> AppResult<ScanJob> {
        self.send_json(
            self.v1(Method::POST, &["scanners", scanner_id, "scan"])?
                .json(request),
        )
        .await
    }

    async fn get_scan_job(&self, job_id: &str) -> AppResult<ScanJob> {
        self.send_json(self.v1(Method::GET, &["scanners", "jobs", job_id])?)
            .await
    }

    async fn cancel_scan_job(&self, job_id: &str) -> AppResult<()> {
        self.send_empty(self.v1(Method::POST, &["scanners", "jobs", job_id, "cancel"])?)
            .await
    }
}
