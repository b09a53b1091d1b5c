use reqwest::multipart::{Form, Part};

use darchiva_application::{EmailImportApi, EmailImportOptions, EmailImportQuery};
use darchiva_core::ListPage;
use darchiva_domain::{EmailImport, EmailUpload};

use super::*;

/// Content type sent for an uploaded message file.
fn upload_mime(file_name: &str) -> &'static str {
    if file_name.to_ascii_lowercase().ends_with(".msg") {
        "application/vnd.ms-outlook"
    } else {
        "message/rfc822"
    }
}

#[async_trait]
impl EmailImportApi for HttpAdminApiClient {
    async fn import_email(
        &self,
        upload: EmailUpload,
        options: &EmailImportOptions,
    ) -> AppResult<EmailImport> {
        let (file_name, bytes) = upload.into_parts();
        let mime = upload_mime(file_name.as_str());
        let part = Part::bytes(bytes)
            .file_name(file_name)
            .mime_str(mime)
            .map_err(|error| {
                AppError::Internal(format!("invalid upload content type '{mime}': {error}"))
            })?;

        self.send_json(
            self.v1(Method::POST, &["emails", "import"])?
                .query(options)
                .multipart(Form::new().part("file", part)),
        )
        .await
    }

    async fn list_email_imports(&self, query: &EmailImportQuery) -> AppResult<ListPage<EmailImport>> {
        self.send_json(self.v1(Method::GET, &["emails", "imports"])?.query(query))
            .await
    }

    async fn delete_email_import(&self, import_id: &str) -> AppResult<()> {
        self.send_empty(self.v1(Method::DELETE, &["emails", "imports", import_id])?)
            .await
    }
}
