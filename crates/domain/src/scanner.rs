//! Scanner fleet types and scan-option validation.

use std::fmt::{Display, Formatter};
use std::str::FromStr;

use chrono::{DateTime, Utc};
use darchiva_core::AppError;
use serde::{Deserialize, Serialize};

/// Discovery protocol spoken by a scanner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScannerProtocol {
    /// eSCL / AirScan.
    Escl,
    /// SANE.
    Sane,
    /// TWAIN.
    Twain,
    /// WIA.
    Wia,
}

impl ScannerProtocol {
    /// Returns a stable transport value.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Escl => "escl",
            Self::Sane => "sane",
            Self::Twain => "twain",
            Self::Wia => "wia",
        }
    }
}

/// Last reported device state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScannerStatus {
    /// Ready to accept jobs.
    Online,
    /// Not reachable.
    Offline,
    /// Running a job.
    Busy,
    /// Reporting a fault.
    Error,
    /// Taken out of service.
    Maintenance,
}

impl ScannerStatus {
    /// Returns a stable transport value.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Online => "online",
            Self::Offline => "offline",
            Self::Busy => "busy",
            Self::Error => "error",
            Self::Maintenance => "maintenance",
        }
    }
}

/// Colour mode of a scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColorMode {
    /// Full colour.
    Color,
    /// Grayscale.
    Grayscale,
    /// Black and white.
    Monochrome,
}

impl ColorMode {
    /// Returns a stable transport value.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Color => "color",
            Self::Grayscale => "grayscale",
            Self::Monochrome => "monochrome",
        }
    }
}

impl FromStr for ColorMode {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "color" => Ok(Self::Color),
            "grayscale" => Ok(Self::Grayscale),
            "monochrome" => Ok(Self::Monochrome),
            _ => Err(AppError::Validation(format!("unknown color mode '{value}'"))),
        }
    }
}

/// Paper feed used for a scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InputSource {
    /// Flatbed glass.
    Platen,
    /// Automatic document feeder, single-sided.
    Adf,
    /// Automatic document feeder, double-sided.
    AdfDuplex,
}

impl InputSource {
    /// Returns a stable transport value.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Platen => "platen",
            Self::Adf => "adf",
            Self::AdfDuplex => "adf_duplex",
        }
    }
}

impl FromStr for InputSource {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "platen" => Ok(Self::Platen),
            "adf" => Ok(Self::Adf),
            "adf_duplex" => Ok(Self::AdfDuplex),
            _ => Err(AppError::Validation(format!(
                "unknown input source '{value}'"
            ))),
        }
    }
}

/// Output image format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImageFormat {
    /// JPEG.
    Jpeg,
    /// PNG.
    Png,
    /// TIFF.
    Tiff,
    /// PDF.
    Pdf,
}

impl ImageFormat {
    /// Returns a stable transport value.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Jpeg => "jpeg",
            Self::Png => "png",
            Self::Tiff => "tiff",
            Self::Pdf => "pdf",
        }
    }
}

impl FromStr for ImageFormat {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "jpeg" => Ok(Self::Jpeg),
            "png" => Ok(Self::Png),
            "tiff" => Ok(Self::Tiff),
            "pdf" => Ok(Self::Pdf),
            _ => Err(AppError::Validation(format!(
                "unknown image format '{value}'"
            ))),
        }
    }
}

/// Hardware features reported by a scanner.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ScannerCapabilities {
    /// Flatbed available.
    pub platen: bool,
    /// Document feeder available.
    pub adf_present: bool,
    /// Feeder scans both sides.
    pub adf_duplex: bool,
    /// Feeder sheet capacity.
    pub adf_capacity: u32,
    /// Supported resolutions in dpi.
    pub resolutions: Vec<u32>,
    /// Supported colour modes.
    pub color_modes: Vec<ColorMode>,
    /// Supported output formats.
    pub formats: Vec<ImageFormat>,
    /// Maximum scan width in millimetres.
    pub max_width_mm: u32,
    /// Maximum scan height in millimetres.
    pub max_height_mm: u32,
    /// Device-side auto crop.
    pub auto_crop: bool,
    /// Device-side deskew.
    pub auto_deskew: bool,
    /// Device-side blank page removal.
    pub blank_page_removal: bool,
    /// Brightness adjustable.
    pub brightness_control: bool,
    /// Contrast adjustable.
    pub contrast_control: bool,
}

/// Full option set sent with a scan request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanOptions {
    /// Resolution in dpi.
    pub resolution: u32,
    /// Colour mode.
    pub color_mode: ColorMode,
    /// Paper feed.
    pub input_source: InputSource,
    /// Output format.
    pub format: ImageFormat,
    /// Compression quality, 1..=100.
    pub quality: u8,
    /// Scan area left offset in millimetres.
    pub x_offset: Option<u32>,
    /// Scan area top offset in millimetres.
    pub y_offset: Option<u32>,
    /// Scan area width in millimetres.
    pub width: Option<u32>,
    /// Scan area height in millimetres.
    pub height: Option<u32>,
    /// Scan both sides.
    pub duplex: bool,
    /// Crop to content.
    pub auto_crop: bool,
    /// Straighten pages.
    pub auto_deskew: bool,
    /// Drop blank pages.
    pub blank_page_removal: bool,
    /// Keep feeding until the tray is empty.
    pub batch_mode: bool,
    /// Page limit; `None` scans everything.
    pub max_pages: Option<u32>,
    /// Brightness adjustment, -100..=100.
    pub brightness: i16,
    /// Contrast adjustment, -100..=100.
    pub contrast: i16,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            resolution: 300,
            color_mode: ColorMode::Color,
            input_source: InputSource::Platen,
            format: ImageFormat::Jpeg,
            quality: 85,
            x_offset: None,
            y_offset: None,
            width: None,
            height: None,
            duplex: false,
            auto_crop: false,
            auto_deskew: false,
            blank_page_removal: false,
            batch_mode: false,
            max_pages: None,
            brightness: 0,
            contrast: 0,
        }
    }
}

/// One field assignment applied to [`ScanOptions`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanOption {
    /// Sets the resolution.
    Resolution(u32),
    /// Sets the colour mode.
    ColorMode(ColorMode),
    /// Sets the paper feed.
    InputSource(InputSource),
    /// Sets the output format.
    Format(ImageFormat),
    /// Sets the compression quality.
    Quality(u8),
    /// Sets the scan area as `(x, y, width, height)`.
    Area(Option<u32>, Option<u32>, Option<u32>, Option<u32>),
    /// Sets duplex scanning.
    Duplex(bool),
    /// Sets auto crop.
    AutoCrop(bool),
    /// Sets deskew.
    AutoDeskew(bool),
    /// Sets blank page removal.
    BlankPageRemoval(bool),
    /// Sets batch mode.
    BatchMode(bool),
    /// Sets the page limit.
    MaxPages(Option<u32>),
    /// Sets brightness.
    Brightness(i16),
    /// Sets contrast.
    Contrast(i16),
}

/// Option combination a scanner cannot honour.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanOptionViolation {
    /// Paper feed missing on the device.
    SourceUnavailable(InputSource),
    /// Duplex requested without duplex feeder.
    DuplexUnsupported,
    /// Duplex requested on the flatbed.
    DuplexRequiresFeeder,
    /// Resolution not offered by the device.
    UnsupportedResolution(u32),
    /// Colour mode not offered by the device.
    UnsupportedColorMode(ColorMode),
    /// Format not offered by the device.
    UnsupportedFormat(ImageFormat),
    /// Device lacks a requested control.
    ControlUnavailable(&'static str),
    /// Numeric field outside its allowed range.
    OutOfRange(&'static str),
    /// Scan area exceeds the device bed.
    AreaOutOfBounds,
}

impl Display for ScanOptionViolation {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::SourceUnavailable(source) => {
                write!(formatter, "input source '{}' is not available", source.as_str())
            }
            Self::DuplexUnsupported => formatter.write_str("scanner does not support duplex"),
            Self::DuplexRequiresFeeder => {
                formatter.write_str("duplex scanning requires the document feeder")
            }
            Self::UnsupportedResolution(resolution) => {
                write!(formatter, "resolution {resolution} dpi is not supported")
            }
            Self::UnsupportedColorMode(mode) => {
                write!(formatter, "color mode '{}' is not supported", mode.as_str())
            }
            Self::UnsupportedFormat(format) => {
                write!(formatter, "format '{}' is not supported", format.as_str())
            }
            Self::ControlUnavailable(control) => {
                write!(formatter, "scanner has no {control} control")
            }
            Self::OutOfRange(field) => write!(formatter, "{field} is out of range"),
            Self::AreaOutOfBounds => formatter.write_str("scan area exceeds the scanner bed"),
        }
    }
}

impl ScanOptions {
    /// Applies one field assignment; later assignments win.
    pub fn apply(&mut self, option: ScanOption) {
        match option {
            ScanOption::Resolution(value) => self.resolution = value,
            ScanOption::ColorMode(value) => self.color_mode = value,
            ScanOption::InputSource(value) => self.input_source = value,
            ScanOption::Format(value) => self.format = value,
            ScanOption::Quality(value) => self.quality = value,
            ScanOption::Area(x_offset, y_offset, width, height) => {
                self.x_offset = x_offset;
                self.y_offset = y_offset;
                self.width = width;
                self.height = height;
            }
            ScanOption::Duplex(value) => self.duplex = value,
            ScanOption::AutoCrop(value) => self.auto_crop = value,
            ScanOption::AutoDeskew(value) => self.auto_deskew = value,
            ScanOption::BlankPageRemoval(value) => self.blank_page_removal = value,
            ScanOption::BatchMode(value) => self.batch_mode = value,
            ScanOption::MaxPages(value) => self.max_pages = value,
            ScanOption::Brightness(value) => self.brightness = value,
            ScanOption::Contrast(value) => self.contrast = value,
        }
    }

    /// Returns a copy with the assignment applied.
    #[must_use]
    pub fn with(mut self, option: ScanOption) -> Self {
        self.apply(option);
        self
    }

    /// Checks device-independent ranges.
    pub fn validate(&self) -> Result<(), Vec<ScanOptionViolation>> {
        let violations = self.range_violations();
        if violations.is_empty() {
            Ok(())
        } else {
            Err(violations)
        }
    }

    /// Checks ranges and every capability constraint of a device.
    pub fn validate_for(
        &self,
        capabilities: &ScannerCapabilities,
    ) -> Result<(), Vec<ScanOptionViolation>> {
        let mut violations = self.range_violations();

        let source_available = match self.input_source {
            InputSource::Platen => capabilities.platen,
            InputSource::Adf => capabilities.adf_present,
            InputSource::AdfDuplex => capabilities.adf_present && capabilities.adf_duplex,
        };
        if !source_available {
            violations.push(ScanOptionViolation::SourceUnavailable(self.input_source));
        }

        if self.duplex {
            if !capabilities.adf_duplex {
                violations.push(ScanOptionViolation::DuplexUnsupported);
            }
            if self.input_source == InputSource::Platen {
                violations.push(ScanOptionViolation::DuplexRequiresFeeder);
            }
        }

        if !capabilities.resolutions.is_empty()
            && !capabilities.resolutions.contains(&self.resolution)
        {
            violations.push(ScanOptionViolation::UnsupportedResolution(self.resolution));
        }
        if !capabilities.color_modes.is_empty()
            && !capabilities.color_modes.contains(&self.color_mode)
        {
            violations.push(ScanOptionViolation::UnsupportedColorMode(self.color_mode));
        }
        if !capabilities.formats.is_empty() && !capabilities.formats.contains(&self.format) {
            violations.push(ScanOptionViolation::UnsupportedFormat(self.format));
        }

        let controls = [
            (self.brightness != 0, capabilities.brightness_control, "brightness"),
            (self.contrast != 0, capabilities.contrast_control, "contrast"),
            (self.auto_crop, capabilities.auto_crop, "auto crop"),
            (self.auto_deskew, capabilities.auto_deskew, "deskew"),
            (
                self.blank_page_removal,
                capabilities.blank_page_removal,
                "blank page removal",
            ),
        ];
        for (requested, supported, control) in controls {
            if requested && !supported {
                violations.push(ScanOptionViolation::ControlUnavailable(control));
            }
        }

        let exceeds = |offset: Option<u32>, extent: Option<u32>, limit: u32| {
            limit > 0
                && extent.is_some_and(|extent| offset.unwrap_or(0).saturating_add(extent) > limit)
        };
        if exceeds(self.x_offset, self.width, capabilities.max_width_mm)
            || exceeds(self.y_offset, self.height, capabilities.max_height_mm)
        {
            violations.push(ScanOptionViolation::AreaOutOfBounds);
        }

        if violations.is_empty() {
            Ok(())
        } else {
            Err(violations)
        }
    }

    fn range_violations(&self) -> Vec<ScanOptionViolation> {
        let mut violations = Vec::new();
        if self.resolution == 0 {
            violations.push(ScanOptionViolation::OutOfRange("resolution"));
        }
        if !(1..=100).contains(&self.quality) {
            violations.push(ScanOptionViolation::OutOfRange("quality"));
        }
        if !(-100..=100).contains(&self.brightness) {
            violations.push(ScanOptionViolation::OutOfRange("brightness"));
        }
        if !(-100..=100).contains(&self.contrast) {
            violations.push(ScanOptionViolation::OutOfRange("contrast"));
        }
        if self.max_pages == Some(0) {
            violations.push(ScanOptionViolation::OutOfRange("max_pages"));
        }
        if self.width == Some(0) || self.height == Some(0) {
            violations.push(ScanOptionViolation::OutOfRange("scan area"));
        }

        violations
    }
}

/// Registered scanner device.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scanner {
    /// Stable scanner identifier.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Discovery protocol.
    pub protocol: ScannerProtocol,
    /// Device endpoint.
    pub connection_uri: String,
    /// Manufacturer name.
    #[serde(default)]
    pub manufacturer: Option<String>,
    /// Model name.
    #[serde(default)]
    pub model: Option<String>,
    /// Current status.
    pub status: ScannerStatus,
    /// Default device for new jobs.
    #[serde(default)]
    pub is_default: bool,
    /// Enabled for use.
    #[serde(default = "default_true")]
    pub is_active: bool,
    /// Lifetime page counter.
    #[serde(default)]
    pub total_pages_scanned: u64,
    /// Reported capabilities, when probed.
    #[serde(default)]
    pub capabilities: Option<ScannerCapabilities>,
    /// Last contact time.
    #[serde(default)]
    pub last_seen_at: Option<DateTime<Utc>>,
}

/// Lifecycle state of a scan job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScanJobStatus {
    /// Queued on the device.
    Pending,
    /// Pages are being captured.
    Scanning,
    /// Captured pages are being processed.
    Processing,
    /// Finished successfully.
    Completed,
    /// Cancelled by a user.
    Cancelled,
    /// Finished with an error.
    Failed,
}

impl ScanJobStatus {
    /// Returns a stable transport value.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Scanning => "scanning",
            Self::Processing => "processing",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
            Self::Failed => "failed",
        }
    }

    /// Returns whether the job can no longer change.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled | Self::Failed)
    }
}

/// Scan job snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanJob {
    /// Stable job identifier.
    pub id: String,
    /// Scanner running the job.
    pub scanner_id: String,
    /// Requesting user.
    #[serde(default)]
    pub user_id: Option<String>,
    /// Lifecycle state.
    pub status: ScanJobStatus,
    /// Options the job runs with.
    pub options: ScanOptions,
    /// Pages captured so far.
    #[serde(default)]
    pub pages_scanned: u32,
    /// Destination folder.
    #[serde(default)]
    pub destination_folder_id: Option<String>,
    /// Failure reason.
    #[serde(default)]
    pub error_message: Option<String>,
    /// Creation timestamp.
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    /// Start timestamp.
    #[serde(default)]
    pub started_at: Option<DateTime<Utc>>,
    /// Completion timestamp.
    #[serde(default)]
    pub completed_at: Option<DateTime<Utc>>,
}

/// Body of a scan start request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StartScanRequest {
    /// Options to scan with.
    pub options: ScanOptions,
    /// Folder receiving the output documents.
    pub target_folder_id: Option<String>,
}

fn default_true() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::{
        ColorMode, ImageFormat, InputSource, ScanJobStatus, ScanOption, ScanOptionViolation,
        ScanOptions, ScannerCapabilities,
    };

    fn flatbed_only() -> ScannerCapabilities {
        ScannerCapabilities {
            platen: true,
            resolutions: vec![150, 300, 600],
            color_modes: vec![ColorMode::Color, ColorMode::Grayscale],
            formats: vec![ImageFormat::Jpeg, ImageFormat::Pdf],
            max_width_mm: 216,
            max_height_mm: 297,
            ..ScannerCapabilities::default()
        }
    }

    #[test]
    fn later_assignment_wins_per_field() {
        let options = ScanOptions::default()
            .with(ScanOption::Resolution(600))
            .with(ScanOption::ColorMode(ColorMode::Grayscale))
            .with(ScanOption::Resolution(150));

        assert_eq!(options.resolution, 150);
        assert_eq!(options.color_mode, ColorMode::Grayscale);
        assert_eq!(options.format, ImageFormat::Jpeg);
    }

    #[test]
    fn defaults_are_valid_on_flatbed() {
        assert!(ScanOptions::default().validate_for(&flatbed_only()).is_ok());
    }

    #[test]
    fn duplex_without_duplex_feeder_is_rejected() {
        let options = ScanOptions::default().with(ScanOption::Duplex(true));
        let result = options.validate_for(&flatbed_only());

        assert_eq!(
            result,
            Err(vec![
                ScanOptionViolation::DuplexUnsupported,
                ScanOptionViolation::DuplexRequiresFeeder,
            ])
        );
    }

    #[test]
    fn duplex_feeder_accepts_duplex() {
        let capabilities = ScannerCapabilities {
            adf_present: true,
            adf_duplex: true,
            ..flatbed_only()
        };
        let options = ScanOptions::default()
            .with(ScanOption::InputSource(InputSource::AdfDuplex))
            .with(ScanOption::Duplex(true));

        assert!(options.validate_for(&capabilities).is_ok());
    }

    #[test]
    fn missing_feeder_and_controls_are_reported() {
        let options = ScanOptions::default()
            .with(ScanOption::InputSource(InputSource::Adf))
            .with(ScanOption::Brightness(20))
            .with(ScanOption::Format(ImageFormat::Tiff));
        let Err(violations) = options.validate_for(&flatbed_only()) else {
            panic!("options should be rejected");
        };

        assert!(violations.contains(&ScanOptionViolation::SourceUnavailable(InputSource::Adf)));
        assert!(violations.contains(&ScanOptionViolation::ControlUnavailable("brightness")));
        assert!(violations.contains(&ScanOptionViolation::UnsupportedFormat(ImageFormat::Tiff)));
    }

    #[test]
    fn ranges_are_checked_without_capabilities() {
        let options = ScanOptions::default()
            .with(ScanOption::Quality(0))
            .with(ScanOption::Contrast(-250))
            .with(ScanOption::MaxPages(Some(0)));

        assert_eq!(
            options.validate(),
            Err(vec![
                ScanOptionViolation::OutOfRange("quality"),
                ScanOptionViolation::OutOfRange("contrast"),
                ScanOptionViolation::OutOfRange("max_pages"),
            ])
        );
    }

    #[test]
    fn scan_area_must_fit_the_bed() {
        let options =
            ScanOptions::default().with(ScanOption::Area(Some(100), None, Some(150), None));
        let result = options.validate_for(&flatbed_only());
        assert_eq!(result, Err(vec![ScanOptionViolation::AreaOutOfBounds]));
    }

    #[test]
    fn job_status_classification() {
        assert!(!ScanJobStatus::Scanning.is_terminal());
        assert!(!ScanJobStatus::Processing.is_terminal());
        assert!(!ScanJobStatus::Pending.is_terminal());
        assert!(ScanJobStatus::Cancelled.is_terminal());
    }

    mod properties {
        use proptest::prelude::*;

        use super::super::{ColorMode, ScanOption, ScanOptions};

        fn option_strategy() -> impl Strategy<Value = ScanOption> {
            prop_oneof![
                prop_oneof![Just(150_u32), Just(300), Just(600)].prop_map(ScanOption::Resolution),
                prop_oneof![
                    Just(ColorMode::Color),
                    Just(ColorMode::Grayscale),
                    Just(ColorMode::Monochrome),
                ]
                .prop_map(ScanOption::ColorMode),
                any::<bool>().prop_map(ScanOption::Duplex),
                (-100_i16..=100).prop_map(ScanOption::Brightness),
            ]
        }

        proptest! {
            #[test]
            fn merge_keeps_last_assignment_per_field(
                options in prop::collection::vec(option_strategy(), 0..12)
            ) {
                let mut merged = ScanOptions::default();
                for option in &options {
                    merged.apply(*option);
                }

                let last_resolution = options.iter().rev().find_map(|option| match option {
                    ScanOption::Resolution(value) => Some(*value),
                    _ => None,
                });
                let last_duplex = options.iter().rev().find_map(|option| match option {
                    ScanOption::Duplex(value) => Some(*value),
                    _ => None,
                });

                prop_assert_eq!(merged.resolution, last_resolution.unwrap_or(300));
                prop_assert_eq!(merged.duplex, last_duplex.unwrap_or(false));
                prop_assert_eq!(merged.quality, 85);
            }
        }
    }
}
