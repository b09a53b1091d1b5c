//! Per-user interface preferences and partial updates.

use std::str::FromStr;

use darchiva_core::AppError;
use serde::{Deserialize, Serialize};

/// Colour scheme.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ThemeMode {
    /// Light theme.
    Light,
    /// Dark theme.
    Dark,
    /// Follow the operating system.
    #[default]
    System,
}

impl FromStr for ThemeMode {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "light" => Ok(Self::Light),
            "dark" => Ok(Self::Dark),
            "system" => Ok(Self::System),
            _ => Err(AppError::Validation(format!("unknown theme '{value}'"))),
        }
    }
}

/// Document browser layout.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewMode {
    /// Thumbnail grid.
    #[default]
    Grid,
    /// Compact list.
    List,
    /// Sortable table.
    Table,
}

impl FromStr for ViewMode {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "grid" => Ok(Self::Grid),
            "list" => Ok(Self::List),
            "table" => Ok(Self::Table),
            _ => Err(AppError::Validation(format!("unknown view mode '{value}'"))),
        }
    }
}

/// Date rendering style.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DateFormat {
    /// "3 hours ago".
    #[default]
    Relative,
    /// Short locale date.
    Short,
    /// Long locale date.
    Long,
    /// ISO 8601.
    Iso,
}

impl FromStr for DateFormat {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "relative" => Ok(Self::Relative),
            "short" => Ok(Self::Short),
            "long" => Ok(Self::Long),
            "iso" => Ok(Self::Iso),
            _ => Err(AppError::Validation(format!("unknown date format '{value}'"))),
        }
    }
}

/// Colour mode preselected for new scans.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScanColorPreference {
    /// Colour.
    #[default]
    Color,
    /// Grayscale.
    Grayscale,
    /// Black and white.
    Bw,
}

impl FromStr for ScanColorPreference {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "color" => Ok(Self::Color),
            "grayscale" => Ok(Self::Grayscale),
            "bw" => Ok(Self::Bw),
            _ => Err(AppError::Validation(format!(
                "unknown scan color mode '{value}'"
            ))),
        }
    }
}

/// Output format preselected for new scans.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScanFormatPreference {
    /// PDF.
    #[default]
    Pdf,
    /// PNG.
    Png,
    /// JPEG.
    Jpg,
    /// TIFF.
    Tiff,
}

impl FromStr for ScanFormatPreference {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "pdf" => Ok(Self::Pdf),
            "png" => Ok(Self::Png),
            "jpg" => Ok(Self::Jpg),
            "tiff" => Ok(Self::Tiff),
            _ => Err(AppError::Validation(format!(
                "unknown scan format '{value}'"
            ))),
        }
    }
}

/// Stored preferences; missing fields fall back to defaults on read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserPreferences {
    /// Colour scheme.
    pub theme: ThemeMode,
    /// Accent colour override.
    pub accent_color: Option<String>,
    /// Dense layout.
    pub compact_mode: bool,
    /// Document browser layout.
    pub default_view: ViewMode,
    /// Show thumbnails in listings.
    pub show_thumbnails: bool,
    /// Date rendering style.
    pub date_format: DateFormat,
    /// Interface language code.
    pub language: String,
    /// IANA time zone.
    pub timezone: Option<String>,
    /// Send notification emails.
    pub email_notifications: bool,
    /// Show browser notifications.
    pub browser_notifications: bool,
    /// Preselected scanner.
    pub default_scanner_id: Option<String>,
    /// Preselected scan resolution in dpi.
    pub default_scan_resolution: u32,
    /// Preselected scan colour mode.
    pub default_scan_color_mode: ScanColorPreference,
    /// Preselected scan output format.
    pub default_scan_format: ScanFormatPreference,
    /// Run OCR after scanning.
    pub auto_ocr_on_scan: bool,
    /// OCR language code.
    pub default_ocr_language: String,
    /// Ask before deleting.
    pub confirm_on_delete: bool,
}

impl Default for UserPreferences {
    fn default() -> Self {
        Self {
            theme: ThemeMode::System,
            accent_color: None,
            compact_mode: false,
            default_view: ViewMode::Grid,
            show_thumbnails: true,
            date_format: DateFormat::Relative,
            language: "en".to_owned(),
            timezone: None,
            email_notifications: true,
            browser_notifications: true,
            default_scanner_id: None,
            default_scan_resolution: 300,
            default_scan_color_mode: ScanColorPreference::Color,
            default_scan_format: ScanFormatPreference::Pdf,
            auto_ocr_on_scan: true,
            default_ocr_language: "eng".to_owned(),
            confirm_on_delete: true,
        }
    }
}

/// Partial preferences update; only present fields are sent and applied.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreferencesPatch {
    /// New `theme` value.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub theme: Option<ThemeMode>,
    /// New `accent_color` value.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accent_color: Option<String>,
    /// New `compact_mode` value.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compact_mode: Option<bool>,
    /// New `default_view` value.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_view: Option<ViewMode>,
    /// New `show_thumbnails` value.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub show_thumbnails: Option<bool>,
    /// New `date_format` value.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_format: Option<DateFormat>,
    /// New `language` value.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    /// New `timezone` value.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timezone: Option<String>,
    /// New `email_notifications` value.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email_notifications: Option<bool>,
    /// New `browser_notifications` value.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub browser_notifications: Option<bool>,
    /// New `default_scanner_id` value.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_scanner_id: Option<String>,
    /// New `default_scan_resolution` value.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_scan_resolution: Option<u32>,
    /// New `default_scan_color_mode` value.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_scan_color_mode: Option<ScanColorPreference>,
    /// New `default_scan_format` value.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_scan_format: Option<ScanFormatPreference>,
    /// New `auto_ocr_on_scan` value.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auto_ocr_on_scan: Option<bool>,
    /// New `default_ocr_language` value.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_ocr_language: Option<String>,
    /// New `confirm_on_delete` value.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confirm_on_delete: Option<bool>,
}

impl PreferencesPatch {
    /// Returns whether the patch changes nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    /// Sets one field from its transport name and textual value.
    pub fn set(&mut self, field: &str, value: &str) -> Result<(), AppError> {
        match field {
            "theme" => self.theme = Some(value.parse()?),
            "accent_color" => self.accent_color = Some(value.to_owned()),
            "compact_mode" => self.compact_mode = Some(parse_flag(field, value)?),
            "default_view" => self.default_view = Some(value.parse()?),
            "show_thumbnails" => self.show_thumbnails = Some(parse_flag(field, value)?),
            "date_format" => self.date_format = Some(value.parse()?),
            "language" => self.language = Some(value.to_owned()),
            "timezone" => self.timezone = Some(value.to_owned()),
            "email_notifications" => self.email_notifications = Some(parse_flag(field, value)?),
            "browser_notifications" => {
                self.browser_notifications = Some(parse_flag(field, value)?);
            }
            "default_scanner_id" => self.default_scanner_id = Some(value.to_owned()),
            "default_scan_resolution" => {
                let resolution = value.parse::<u32>().map_err(|_| {
                    AppError::Validation(format!("{field} must be a positive integer"))
                })?;
                if resolution == 0 {
                    return Err(AppError::Validation(format!(
                        "{field} must be a positive integer"
                    )));
                }
                self.default_scan_resolution = Some(resolution);
            }
            "default_scan_color_mode" => self.default_scan_color_mode = Some(value.parse()?),
            "default_scan_format" => self.default_scan_format = Some(value.parse()?),
            "auto_ocr_on_scan" => self.auto_ocr_on_scan = Some(parse_flag(field, value)?),
            "default_ocr_language" => self.default_ocr_language = Some(value.to_owned()),
            "confirm_on_delete" => self.confirm_on_delete = Some(parse_flag(field, value)?),
            _ => {
                return Err(AppError::Validation(format!(
                    "unknown preference '{field}'"
                )));
            }
        }

        Ok(())
    }
}

impl UserPreferences {
    /// Returns a copy with every present patch field applied.
    #[must_use]
    pub fn merged(&self, patch: &PreferencesPatch) -> Self {
        let mut merged = self.clone();
        if let Some(theme) = patch.theme {
            merged.theme = theme;
        }
        if let Some(accent_color) = &patch.accent_color {
            merged.accent_color = Some(accent_color.clone());
        }
        if let Some(compact_mode) = patch.compact_mode {
            merged.compact_mode = compact_mode;
        }
        if let Some(default_view) = patch.default_view {
            merged.default_view = default_view;
        }
        if let Some(show_thumbnails) = patch.show_thumbnails {
            merged.show_thumbnails = show_thumbnails;
        }
        if let Some(date_format) = patch.date_format {
            merged.date_format = date_format;
        }
        if let Some(language) = &patch.language {
            merged.language.clone_from(language);
        }
        if let Some(timezone) = &patch.timezone {
            merged.timezone = Some(timezone.clone());
        }
        if let Some(email_notifications) = patch.email_notifications {
            merged.email_notifications = email_notifications;
        }
        if let Some(browser_notifications) = patch.browser_notifications {
            merged.browser_notifications = browser_notifications;
        }
        if let Some(default_scanner_id) = &patch.default_scanner_id {
            merged.default_scanner_id = Some(default_scanner_id.clone());
        }
        if let Some(resolution) = patch.default_scan_resolution {
            merged.default_scan_resolution = resolution;
        }
        if let Some(color_mode) = patch.default_scan_color_mode {
            merged.default_scan_color_mode = color_mode;
        }
        if let Some(format) = patch.default_scan_format {
            merged.default_scan_format = format;
        }
        if let Some(auto_ocr_on_scan) = patch.auto_ocr_on_scan {
            merged.auto_ocr_on_scan = auto_ocr_on_scan;
        }
        if let Some(language) = &patch.default_ocr_language {
            merged.default_ocr_language.clone_from(language);
        }
        if let Some(confirm_on_delete) = patch.confirm_on_delete {
            merged.confirm_on_delete = confirm_on_delete;
        }

        merged
    }
}

fn parse_flag(field: &str, value: &str) -> Result<bool, AppError> {
    match value {
        "true" | "on" | "yes" | "1" => Ok(true),
        "false" | "off" | "no" | "0" => Ok(false),
        _ => Err(AppError::Validation(format!(
            "{field} expects true or false, got '{value}'"
        ))),
    }
}
