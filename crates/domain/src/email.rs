use chrono::{DateTime, Utc};
use darchiva_core::AppError;
use serde::{Deserialize, Serialize};

/// File extensions accepted by the email import endpoint.
pub const EMAIL_IMPORT_EXTENSIONS: &[&str] = &["eml", "msg"];

/// Processing state of an imported message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmailImportStatus {
    /// Waiting for processing.
    Pending,
    /// Being parsed.
    Processing,
    /// Stored as a document.
    Completed,
    /// Import failed.
    Failed,
}

impl EmailImportStatus {
    /// Returns a stable transport value.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Processing => "processing",
            Self::Completed => "completed",
            Self::Failed => "failed",
        }
    }
}

/// Channel a message arrived through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmailSource {
    /// Manual upload.
    Upload,
    /// IMAP mailbox.
    Imap,
    /// API client.
    Api,
    /// Outlook integration.
    Outlook,
    /// Gmail integration.
    Gmail,
}

/// Imported email message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailImport {
    /// Import identifier.
    pub id: String,
    /// RFC 5322 message id.
    pub message_id: String,
    /// Conversation thread.
    #[serde(default)]
    pub thread_id: Option<String>,
    /// Resulting document.
    #[serde(default)]
    pub document_id: Option<String>,
    /// Subject line.
    #[serde(default)]
    pub subject: Option<String>,
    /// Sender address.
    pub from_address: String,
    /// Sender display name.
    #[serde(default)]
    pub from_name: Option<String>,
    /// Recipients.
    #[serde(default)]
    pub to_addresses: Vec<String>,
    /// Carbon-copy recipients.
    #[serde(default)]
    pub cc_addresses: Vec<String>,
    /// Whether the message carries attachments.
    #[serde(default)]
    pub has_attachments: bool,
    /// Attachment count.
    #[serde(default)]
    pub attachment_count: u32,
    /// Arrival channel.
    pub source: EmailSource,
    /// Processing state.
    pub import_status: EmailImportStatus,
    /// Failure reason.
    #[serde(default)]
    pub import_error: Option<String>,
    /// Destination folder.
    #[serde(default)]
    pub folder_id: Option<String>,
    /// Import timestamp.
    pub created_at: DateTime<Utc>,
}

/// Raw message file queued for import.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailUpload {
    file_name: String,
    bytes: Vec<u8>,
}

impl EmailUpload {
    /// Creates an upload after checking the extension and payload.
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Result<Self, AppError> {
        let file_name = file_name.into();
        let extension = file_name
            .rsplit_once('.')
            .map(|(_, extension)| extension.to_ascii_lowercase());
        let accepted = extension
            .as_deref()
            .is_some_and(|extension| EMAIL_IMPORT_EXTENSIONS.contains(&extension));
        if !accepted {
            return Err(AppError::Validation(format!(
                "'{file_name}' is not an .eml or .msg file"
            )));
        }

        if bytes.is_empty() {
            return Err(AppError::Validation(format!("'{file_name}' is empty")));
        }

        Ok(Self { file_name, bytes })
    }

    /// Returns the original file name.
    #[must_use]
    pub fn file_name(&self) -> &str {
        self.file_name.as_str()
    }

    /// Returns the raw message bytes.
    #[must_use]
    pub fn bytes(&self) -> &[u8] {
        self.bytes.as_slice()
    }

    /// Consumes the upload into its parts.
    #[must_use]
    pub fn into_parts(self) -> (String, Vec<u8>) {
        (self.file_name, self.bytes)
    }
}
