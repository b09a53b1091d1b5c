use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Mutex;

use darchiva_core::{AppError, AppResult};
use darchiva_domain::{
    ColorMode, ImageFormat, ScanJob, ScanJobStatus, ScanOption, ScanOptions, Scanner,
    ScannerCapabilities, ScannerProtocol, ScannerStatus, StartScanRequest,
};

use crate::admin_api_ports::ScannerApi;

use super::ScanService;

struct FakeScannerApi {
    scanners: Vec<Scanner>,
    statuses: Mutex<VecDeque<ScanJobStatus>>,
    started: Mutex<Vec<(String, StartScanRequest)>>,
    cancelled: Mutex<Vec<String>>,
    polls: Mutex<usize>,
}

impl FakeScannerApi {
    fn new(scanners: Vec<Scanner>, statuses: &[ScanJobStatus]) -> Self {
        Self {
            scanners,
            statuses: Mutex::new(statuses.iter().copied().collect()),
            started: Mutex::new(Vec::new()),
            cancelled: Mutex::new(Vec::new()),
            polls: Mutex::new(0),
        }
    }
}

fn job(status: ScanJobStatus, pages_scanned: u32) -> ScanJob {
    ScanJob {
        id: "job-1".to_owned(),
        scanner_id: "s1".to_owned(),
        user_id: None,
        status,
        options: ScanOptions::default(),
        pages_scanned,
        destination_folder_id: None,
        error_message: None,
        created_at: None,
        started_at: None,
        completed_at: None,
    }
}

fn scanner(id: &str, capabilities: Option<ScannerCapabilities>) -> Scanner {
    Scanner {
        id: id.to_owned(),
        name: format!("Scanner {id}"),
        protocol: ScannerProtocol::Escl,
        connection_uri: format!("http://{id}.local/eSCL"),
        manufacturer: None,
        model: None,
        status: ScannerStatus::Online,
        is_default: false,
        is_active: true,
        total_pages_scanned: 0,
        capabilities,
        last_seen_at: None,
    }
}

fn flatbed() -> ScannerCapabilities {
    ScannerCapabilities {
        platen: true,
        resolutions: vec![300, 600],
        color_modes: vec![ColorMode::Color],
        formats: vec![ImageFormat::Jpeg, ImageFormat::Pdf],
        ..ScannerCapabilities::default()
    }
}

#[async_trait]
impl ScannerApi for FakeScannerApi {
    async fn list_scanners(&self) -> AppResult<Vec<Scanner>> {
        Ok(self.scanners.clone())
    }

    async fn start_scan(&self, scanner_id: &str, request: &StartScanRequest) -> AppResult<ScanJob> {
        self.started
            .lock()
            .await
            .push((scanner_id.to_owned(), request.clone()));
        Ok(job(ScanJobStatus::Pending, 0))
    }

    async fn get_scan_job(&self, _job_id: &str) -> AppResult<ScanJob> {
        let mut polls = self.polls.lock().await;
        *polls += 1;
        let status = self
            .statuses
            .lock()
            .await
            .pop_front()
            .ok_or_else(|| AppError::Internal("poll after terminal status".to_owned()))?;
        Ok(job(status, u32::try_from(*polls).unwrap_or(u32::MAX)))
    }

    async fn cancel_scan_job(&self, job_id: &str) -> AppResult<()> {
        self.cancelled.lock().await.push(job_id.to_owned());
        Ok(())
    }
}

fn service(api: FakeScannerApi) -> (ScanService, Arc<FakeScannerApi>) {
    let api = Arc::new(api);
    let service = ScanService::new(api.clone()).with_poll_interval(Duration::from_millis(1));
    (service, api)
}

#[tokio::test]
async fn watch_polls_until_terminal_and_reports_every_snapshot() {
    let (service, api) = service(FakeScannerApi::new(
        Vec::new(),
        &[
            ScanJobStatus::Pending,
            ScanJobStatus::Scanning,
            ScanJobStatus::Processing,
            ScanJobStatus::Completed,
        ],
    ));
    let mut seen = Vec::new();

    let result = service
        .watch_job("job-1", |job| seen.push(job.status))
        .await;

    assert!(matches!(result, Ok(job) if job.status == ScanJobStatus::Completed && job.pages_scanned == 4));
    assert_eq!(
        seen,
        vec![
            ScanJobStatus::Pending,
            ScanJobStatus::Scanning,
            ScanJobStatus::Processing,
            ScanJobStatus::Completed,
        ]
    );
    assert_eq!(*api.polls.lock().await, 4);
}

#[tokio::test]
async fn watch_stops_on_failure_status() {
    let (service, api) = service(FakeScannerApi::new(
        Vec::new(),
        &[ScanJobStatus::Scanning, ScanJobStatus::Failed, ScanJobStatus::Completed],
    ));

    let result = service.watch_job("job-1", |_| {}).await;

    assert!(matches!(result, Ok(job) if job.status == ScanJobStatus::Failed));
    assert_eq!(api.statuses.lock().await.len(), 1);
}

#[tokio::test]
async fn start_scan_sends_options_and_target_folder() {
    let (service, api) = service(FakeScannerApi::new(vec![scanner("s1", Some(flatbed()))], &[]));
    let options = ScanOptions::default().with(ScanOption::Resolution(600));

    let result = service
        .start_scan("s1", options.clone(), Some("folder-9".to_owned()))
        .await;

    assert!(matches!(result, Ok(job) if job.status == ScanJobStatus::Pending));
    let started = api.started.lock().await;
    assert_eq!(started.len(), 1);
    assert_eq!(started[0].0, "s1");
    assert_eq!(started[0].1.options, options);
    assert_eq!(started[0].1.target_folder_id.as_deref(), Some("folder-9"));
}

#[tokio::test]
async fn start_scan_rejects_unsupported_options_before_calling_api() {
    let (service, api) = service(FakeScannerApi::new(vec![scanner("s1", Some(flatbed()))], &[]));
    let options = ScanOptions::default()
        .with(ScanOption::Duplex(true))
        .with(ScanOption::Resolution(1200));

    let result = service.start_scan("s1", options, None).await;

    assert!(matches!(
        result,
        Err(AppError::Validation(message))
            if message.contains("duplex") && message.contains("1200 dpi")
    ));
    assert!(api.started.lock().await.is_empty());
}

#[tokio::test]
async fn unknown_capabilities_still_check_ranges() {
    let (service, api) = service(FakeScannerApi::new(vec![scanner("s1", None)], &[]));

    let accepted = service
        .start_scan("s1", ScanOptions::default().with(ScanOption::Duplex(true)), None)
        .await;
    let rejected = service
        .start_scan("s1", ScanOptions::default().with(ScanOption::Quality(0)), None)
        .await;

    assert!(accepted.is_ok());
    assert!(matches!(rejected, Err(AppError::Validation(_))));
    assert_eq!(api.started.lock().await.len(), 1);
}

#[tokio::test]
async fn missing_or_disabled_scanner_is_rejected() {
    let mut disabled = scanner("s2", None);
    disabled.is_active = false;
    let (service, _) = service(FakeScannerApi::new(vec![disabled], &[]));

    assert!(matches!(
        service.start_scan("s1", ScanOptions::default(), None).await,
        Err(AppError::NotFound(_))
    ));
    assert!(matches!(
        service.start_scan("s2", ScanOptions::default(), None).await,
        Err(AppError::Conflict(_))
    ));
}

#[tokio::test]
async fn cancel_forwards_job_id() {
    let (service, api) = service(FakeScannerApi::new(Vec::new(), &[]));
    assert!(service.cancel_job("job-7").await.is_ok());
    assert_eq!(api.cancelled.lock().await.as_slice(), &["job-7".to_owned()]);
}
