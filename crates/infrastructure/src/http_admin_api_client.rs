use async_trait::async_trait;
use reqwest::{Method, RequestBuilder, Response};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, warn};
use url::Url;

use darchiva_core::{AppError, AppResult, TenantId};

mod email;
mod iam;
mod preferences;
mod scanning;

const IAM: [&str; 2] = ["api", "iam"];
const V1: [&str; 2] = ["api", "v1"];

/// Header carrying the active tenant.
pub const TENANT_HEADER: &str = "X-Tenant-ID";

/// REST adapter for the darchiva admin API.
#[derive(Clone)]
pub struct HttpAdminApiClient {
    http_client: reqwest::Client,
    base_url: Url,
    bearer_token: Option<String>,
    tenant_id: Option<TenantId>,
}

impl HttpAdminApiClient {
    /// Creates a client rooted at `base_url`.
    #[must_use]
    pub fn new(http_client: reqwest::Client, base_url: Url) -> Self {
        Self {
            http_client,
            base_url,
            bearer_token: None,
            tenant_id: None,
        }
    }

    /// Sends `Authorization: Bearer <token>` with every request.
    #[must_use]
    pub fn with_bearer_token(mut self, token: impl Into<String>) -> Self {
        self.bearer_token = Some(token.into());
        self
    }

    /// Sends the tenant header with every request.
    #[must_use]
    pub fn with_tenant(mut self, tenant_id: TenantId) -> Self {
        self.tenant_id = Some(tenant_id);
        self
    }

    /// Builds an absolute URL from the base and percent-encoded segments.
    fn endpoint(&self, segments: &[&str]) -> AppResult<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| {
                AppError::Internal(format!(
                    "admin API base URL '{}' cannot carry a path",
                    self.base_url
                ))
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn request(&self, method: Method, segments: &[&str]) -> AppResult<RequestBuilder> {
        let url = self.endpoint(segments)?;
        debug!(method = %method, path = url.path(), "admin API request");

        let mut builder = self.http_client.request(method, url);
        if let Some(token) = &self.bearer_token {
            builder = builder.bearer_auth(token);
        }
        if let Some(tenant_id) = self.tenant_id {
            builder = builder.header(TENANT_HEADER, tenant_id.to_string());
        }

        Ok(builder)
    }

    fn iam(&self, method: Method, segments: &[&str]) -> AppResult<RequestBuilder> {
        self.request(method, &[IAM.as_slice(), segments].concat())
    }

    fn v1(&self, method: Method, segments: &[&str]) -> AppResult<RequestBuilder> {
        self.request(method, &[V1.as_slice(), segments].concat())
    }

    async fn send(&self, builder: RequestBuilder) -> AppResult<Response> {
        let response = builder.send().await.map_err(|error| {
            AppError::Internal(format!("admin API transport error: {error}"))
        })?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let path = response.url().path().to_owned();
        let body = response.text().await.unwrap_or_default();
        let error = status_error(status.as_u16(), body.as_str());
        warn!(status = status.as_u16(), path = %path, error = %error, "admin API request failed");
        Err(error)
    }

    async fn send_json<T>(&self, builder: RequestBuilder) -> AppResult<T>
    where
        T: DeserializeOwned,
    {
        self.send(builder).await?.json::<T>().await.map_err(|error| {
            AppError::Internal(format!("failed to decode admin API response: {error}"))
        })
    }

    async fn send_empty(&self, builder: RequestBuilder) -> AppResult<()> {
        self.send(builder).await.map(|_| ())
    }
}

#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    detail: Option<Value>,
    #[serde(default)]
    message: Option<String>,
}

/// Maps a failed response to an application error.
pub(crate) fn status_error(status: u16, body: &str) -> AppError {
    let message = error_message(body).unwrap_or_else(|| format!("API error: {status}"));

    match status {
        400 | 422 => AppError::Validation(message),
        401 => AppError::Unauthorized(message),
        403 => AppError::Forbidden(message),
        404 => AppError::NotFound(message),
        409 => AppError::Conflict(message),
        _ => AppError::Internal(message),
    }
}

/// Extracts `detail` or `message` from an error body.
///
/// Structured `detail` values (field error lists) are kept as compact JSON.
fn error_message(body: &str) -> Option<String> {
    let parsed = serde_json::from_str::<ErrorBody>(body).ok()?;

    let detail = match parsed.detail {
        Some(Value::String(detail)) => Some(detail),
        Some(Value::Null) | None => None,
        Some(structured) => Some(structured.to_string()),
    };

    detail
        .or(parsed.message)
        .filter(|message| !message.trim().is_empty())
}

#[cfg(test)]
mod tests;
