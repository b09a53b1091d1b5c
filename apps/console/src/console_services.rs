use std::sync::Arc;

use darchiva_application::{
    EmailImportService, IamAdminService, InvalidationGraph, PreferencesService, QueryClient,
    ScanService,
};
use darchiva_core::{AppError, AppResult};
use darchiva_infrastructure::{HttpAdminApiClient, InMemoryQueryCache};

use crate::console_config::ConsoleConfig;

pub struct ConsoleServices {
    pub iam: IamAdminService,
    pub scans: ScanService,
    pub emails: EmailImportService,
    pub preferences: PreferencesService,
}

impl ConsoleServices {
    pub fn build(config: &ConsoleConfig) -> AppResult<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(config.http_timeout)
            .build()
            .map_err(|error| AppError::Internal(format!("failed to build HTTP client: {error}")))?;

        let mut api = HttpAdminApiClient::new(http_client, config.api_base_url.clone());
        if let Some(token) = &config.api_token {
            api = api.with_bearer_token(token.clone());
        }
        if let Some(tenant_id) = config.tenant_id {
            api = api.with_tenant(tenant_id);
        }
        let api = Arc::new(api);

        let queries = QueryClient::new(
            Arc::new(InMemoryQueryCache::new()),
            InvalidationGraph::admin_defaults(),
        );

        Ok(Self {
            iam: IamAdminService::new(api.clone(), queries.clone())
                .with_catalog_ttl(config.catalog_ttl),
            scans: ScanService::new(api.clone()).with_poll_interval(config.scan_poll_interval),
            emails: EmailImportService::new(api.clone(), queries.clone()),
            preferences: PreferencesService::new(api, queries),
        })
    }
}
