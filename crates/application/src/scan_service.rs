use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, warn};

use darchiva_core::{AppError, AppResult};
use darchiva_domain::{
    ScanJob, ScanOptionViolation, ScanOptions, Scanner, ScannerStatus, StartScanRequest,
};

use crate::admin_api_ports::ScannerApi;

/// Interval between job polls used when none is configured.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(1);

/// Scanner control: start, watch and cancel scan jobs.
#[derive(Clone)]
pub struct ScanService {
    api: Arc<dyn ScannerApi>,
    poll_interval: Duration,
}

impl ScanService {
    /// Creates a new service from required dependencies.
    #[must_use]
    pub fn new(api: Arc<dyn ScannerApi>) -> Self {
        Self {
            api,
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }

    /// Overrides the job polling interval.
    #[must_use]
    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    /// Lists registered scanners.
    pub async fn list_scanners(&self) -> AppResult<Vec<Scanner>> {
        self.api.list_scanners().await
    }

    /// Validates options against the scanner and starts a job.
    pub async fn start_scan(
        &self,
        scanner_id: &str,
        options: ScanOptions,
        target_folder_id: Option<String>,
    ) -> AppResult<ScanJob> {
        let scanners = self.api.list_scanners().await?;
        let scanner = scanners
            .iter()
            .find(|scanner| scanner.id == scanner_id)
            .ok_or_else(|| AppError::NotFound(format!("scanner '{scanner_id}' does not exist")))?;

        if !scanner.is_active {
            return Err(AppError::Conflict(format!(
                "scanner '{}' is disabled",
                scanner.name
            )));
        }
        if scanner.status != ScannerStatus::Online {
            warn!(
                scanner_id,
                status = scanner.status.as_str(),
                "starting scan on scanner that is not online"
            );
        }

        let validation = match &scanner.capabilities {
            Some(capabilities) => options.validate_for(capabilities),
            None => options.validate(),
        };
        validation.map_err(violations_error)?;

        let request = StartScanRequest {
            options,
            target_folder_id,
        };
        let job = match self.api.start_scan(scanner_id, &request).await {
            Ok(job) => job,
            Err(error) => {
                warn!(scanner_id, error = %error, "failed to start scan");
                return Err(error);
            }
        };

        info!(scanner_id, job_id = %job.id, "scan job started");
        Ok(job)
    }

    /// Returns the current job snapshot.
    pub async fn job(&self, job_id: &str) -> AppResult<ScanJob> {
        self.api.get_scan_job(job_id).await
    }

    /// Polls a job at the configured interval until it is terminal.
    ///
    /// Every snapshot, including the final one, is passed to `on_update`.
    pub async fn watch_job<F>(&self, job_id: &str, mut on_update: F) -> AppResult<ScanJob>
    where
        F: FnMut(&ScanJob) + Send,
    {
        loop {
            let job = self.api.get_scan_job(job_id).await?;
            on_update(&job);

            if job.status.is_terminal() {
                info!(
                    job_id,
                    status = job.status.as_str(),
                    pages = job.pages_scanned,
                    "scan job finished"
                );
                return Ok(job);
            }

            debug!(
                job_id,
                status = job.status.as_str(),
                pages = job.pages_scanned,
                "scan job in progress"
            );
            tokio::time::sleep(self.poll_interval).await;
        }
    }

    /// Requests cancellation of a job.
    pub async fn cancel_job(&self, job_id: &str) -> AppResult<()> {
        if let Err(error) = self.api.cancel_scan_job(job_id).await {
            warn!(job_id, error = %error, "failed to cancel scan job");
            return Err(error);
        }

        info!(job_id, "scan job cancellation requested");
        Ok(())
    }
}

fn violations_error(violations: Vec<ScanOptionViolation>) -> AppError {
    AppError::Validation(
        violations
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("; "),
    )
}

#[cfg(test)]
mod tests;
