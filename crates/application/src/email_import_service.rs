use std::sync::Arc;

use tracing::{info, warn};

use darchiva_core::{AppResult, ListPage};
use darchiva_domain::{EmailImport, EmailUpload};

use crate::admin_api_ports::{EmailImportApi, EmailImportOptions, EmailImportQuery};
use crate::query_cache::{QueryClient, QueryKey};

/// Email upload and import history.
#[derive(Clone)]
pub struct EmailImportService {
    api: Arc<dyn EmailImportApi>,
    queries: QueryClient,
}

impl EmailImportService {
    /// Creates a new service from required dependencies.
    #[must_use]
    pub fn new(api: Arc<dyn EmailImportApi>, queries: QueryClient) -> Self {
        Self { api, queries }
    }

    /// Uploads one `.eml` or `.msg` file.
    pub async fn import(
        &self,
        upload: EmailUpload,
        options: &EmailImportOptions,
    ) -> AppResult<EmailImport> {
        let file_name = upload.file_name().to_owned();
        let size = upload.bytes().len();

        let imported = match self.api.import_email(upload, options).await {
            Ok(imported) => imported,
            Err(error) => {
                warn!(file = %file_name, error = %error, "email import failed");
                return Err(error);
            }
        };

        self.queries.invalidate(&QueryKey::emails()).await?;
        info!(
            file = %file_name,
            bytes = size,
            import_id = %imported.id,
            status = imported.import_status.as_str(),
            "email imported"
        );
        Ok(imported)
    }

    /// Lists imports for the filters.
    pub async fn list(&self, query: &EmailImportQuery) -> AppResult<ListPage<EmailImport>> {
        let key = QueryKey::emails().child("list").child(query.cache_segment());
        self.queries
            .fetch_cached(&key, None, || self.api.list_email_imports(query))
            .await
    }

    /// Deletes one import.
    pub async fn delete(&self, import_id: &str) -> AppResult<()> {
        if let Err(error) = self.api.delete_email_import(import_id).await {
            warn!(import_id, error = %error, "failed to delete email import");
            return Err(error);
        }

        self.queries.invalidate(&QueryKey::emails()).await?;
        info!(import_id, "deleted email import");
        Ok(())
    }
}
