use async_trait::async_trait;
use serde::Serialize;

use darchiva_core::{AppResult, ListPage, PageRequest};
use darchiva_domain::{EmailImport, EmailUpload};

/// Query parameters attached to an email upload.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct EmailImportOptions {
    /// Destination folder.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub folder_id: Option<String>,
    /// Whether attachments become separate documents.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub import_attachments: Option<bool>,
}

/// Filters for import listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EmailImportQuery {
    /// One-based page number.
    pub page: u32,
    /// Page size.
    pub page_size: u32,
    /// Restricts to one folder.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub folder_id: Option<String>,
    /// Subject or sender search.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
}

impl Default for EmailImportQuery {
    fn default() -> Self {
        let page = PageRequest::default();
        Self {
            page: page.page,
            page_size: page.page_size,
            folder_id: None,
            search: None,
        }
    }
}

impl EmailImportQuery {
    /// Returns the cache key segment for these parameters.
    #[must_use]
    pub fn cache_segment(&self) -> String {
        format!(
            "page={}&page_size={}&folder_id={}&search={}",
            self.page,
            self.page_size,
            self.folder_id.as_deref().unwrap_or_default(),
            self.search.as_deref().unwrap_or_default()
        )
    }
}

/// Port for email import endpoints.
#[async_trait]
pub trait EmailImportApi: Send + Sync {
    /// Uploads one message file.
    async fn import_email(
        &self,
        upload: EmailUpload,
        options: &EmailImportOptions,
    ) -> AppResult<EmailImport>;

    /// Lists imports matching the filters.
    async fn list_email_imports(&self, query: &EmailImportQuery) -> AppResult<ListPage<EmailImport>>;

    /// Deletes one import.
    async fn delete_email_import(&self, import_id: &str) -> AppResult<()>;
}
