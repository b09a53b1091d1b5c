use clap::{Args, Subcommand};

use darchiva_core::AppResult;
use darchiva_domain::{ColorMode, ImageFormat, InputSource, ScanJob, ScanOption, ScanOptions};

use crate::console_services::ConsoleServices;

/// Scanner and scan job commands.
#[derive(Debug, Subcommand)]
pub enum ScanCommand {
    /// List registered scanners.
    List,
    /// Start a scan job.
    Start {
        /// Scanner identifier.
        scanner_id: String,
        #[command(flatten)]
        options: ScanOptionArgs,
        /// Folder receiving the scanned document.
        #[arg(long)]
        folder: Option<String>,
        /// Poll the job until it finishes.
        #[arg(long)]
        watch: bool,
    },
    /// Print the current state of a job.
    Status {
        /// Job identifier.
        job_id: String,
    },
    /// Poll a job until it finishes.
    Watch {
        /// Job identifier.
        job_id: String,
    },
    /// Request cancellation of a job.
    Cancel {
        /// Job identifier.
        job_id: String,
    },
}

/// Overrides applied on top of the default scan options.
#[derive(Debug, Default, Args)]
pub struct ScanOptionArgs {
    /// Resolution in dpi.
    #[arg(long)]
    resolution: Option<u32>,
    /// color, grayscale or bw.
    #[arg(long)]
    color_mode: Option<ColorMode>,
    /// platen, adf or adf_duplex.
    #[arg(long)]
    source: Option<InputSource>,
    /// pdf, jpeg, png or tiff.
    #[arg(long)]
    format: Option<ImageFormat>,
    /// Compression quality, 1-100.
    #[arg(long)]
    quality: Option<u8>,
    /// Scan area left offset.
    #[arg(long)]
    x_offset: Option<u32>,
    /// Scan area top offset.
    #[arg(long)]
    y_offset: Option<u32>,
    /// Scan area width.
    #[arg(long)]
    width: Option<u32>,
    /// Scan area height.
    #[arg(long)]
    height: Option<u32>,
    /// Scan both sides.
    #[arg(long)]
    duplex: bool,
    /// Crop to the detected page.
    #[arg(long)]
    auto_crop: bool,
    /// Straighten skewed pages.
    #[arg(long)]
    auto_deskew: bool,
    /// Drop blank pages.
    #[arg(long)]
    blank_page_removal: bool,
    /// Keep feeding until the tray is empty.
    #[arg(long)]
    batch: bool,
    /// Stop after this many pages.
    #[arg(long)]
    max_pages: Option<u32>,
    /// Brightness, -100 to 100.
    #[arg(long, allow_negative_numbers = true)]
    brightness: Option<i16>,
    /// Contrast, -100 to 100.
    #[arg(long, allow_negative_numbers = true)]
    contrast: Option<i16>,
}

impl ScanOptionArgs {
    fn to_options(&self) -> ScanOptions {
        let mut changes = Vec::new();
        changes.extend(self.resolution.map(ScanOption::Resolution));
        changes.extend(self.color_mode.map(ScanOption::ColorMode));
        changes.extend(self.source.map(ScanOption::InputSource));
        changes.extend(self.format.map(ScanOption::Format));
        changes.extend(self.quality.map(ScanOption::Quality));
        if self.x_offset.is_some()
            || self.y_offset.is_some()
            || self.width.is_some()
            || self.height.is_some()
        {
            changes.push(ScanOption::Area(
                self.x_offset,
                self.y_offset,
                self.width,
                self.height,
            ));
        }
        changes.push(ScanOption::Duplex(self.duplex));
        changes.push(ScanOption::AutoCrop(self.auto_crop));
        changes.push(ScanOption::AutoDeskew(self.auto_deskew));
        changes.push(ScanOption::BlankPageRemoval(self.blank_page_removal));
        changes.push(ScanOption::BatchMode(self.batch));
        changes.extend(self.max_pages.map(|pages| ScanOption::MaxPages(Some(pages))));
        changes.extend(self.brightness.map(ScanOption::Brightness));
        changes.extend(self.contrast.map(ScanOption::Contrast));

        changes
            .into_iter()
            .fold(ScanOptions::default(), ScanOptions::with)
    }
}

pub async fn run(services: &ConsoleServices, command: ScanCommand) -> AppResult<()> {
    let scans = &services.scans;
    match command {
        ScanCommand::List => {
            for scanner in scans.list_scanners().await? {
                println!(
                    "{:<38} {:<28} {:<8} {:<11}{}{}",
                    scanner.id,
                    scanner.name,
                    scanner.protocol.as_str(),
                    scanner.status.as_str(),
                    if scanner.is_default { " default" } else { "" },
                    if scanner.is_active { "" } else { " disabled" }
                );
            }
            Ok(())
        }
        ScanCommand::Start {
            scanner_id,
            options,
            folder,
            watch,
        } => {
            let job = scans
                .start_scan(&scanner_id, options.to_options(), folder)
                .await?;
            print_job(&job);
            if watch {
                scans.watch_job(&job.id, print_job).await?;
            }
            Ok(())
        }
        ScanCommand::Status { job_id } => {
            print_job(&scans.job(&job_id).await?);
            Ok(())
        }
        ScanCommand::Watch { job_id } => {
            scans.watch_job(&job_id, print_job).await?;
            Ok(())
        }
        ScanCommand::Cancel { job_id } => {
            scans.cancel_job(&job_id).await?;
            println!("cancellation requested for {job_id}");
            Ok(())
        }
    }
}

fn print_job(job: &ScanJob) {
    match &job.error_message {
        Some(error) => println!(
            "{} {} pages={} error={error}",
            job.id,
            job.status.as_str(),
            job.pages_scanned
        ),
        None => println!(
            "{} {} pages={}",
            job.id,
            job.status.as_str(),
            job.pages_scanned
        ),
    }
}
