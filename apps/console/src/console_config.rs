use std::env;
use std::time::Duration;

use url::Url;

use darchiva_application::{DEFAULT_CATALOG_TTL, DEFAULT_POLL_INTERVAL};
use darchiva_core::{AppError, AppResult, TenantId};

const DEFAULT_API_BASE_URL: &str = "http://127.0.0.1:8000";
const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 15;

#[derive(Debug, Clone)]
pub struct ConsoleConfig {
    pub api_base_url: Url,
    pub api_token: Option<String>,
    pub tenant_id: Option<TenantId>,
    pub http_timeout: Duration,
    pub scan_poll_interval: Duration,
    pub catalog_ttl: Duration,
}

impl ConsoleConfig {
    pub fn load() -> AppResult<Self> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> AppResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let optional = |name: &str| {
            lookup(name)
                .map(|value| value.trim().to_owned())
                .filter(|value| !value.is_empty())
        };

        let api_base_url = optional("DARCHIVA_API_BASE_URL")
            .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_owned());
        let api_base_url = Url::parse(api_base_url.as_str()).map_err(|error| {
            AppError::Validation(format!(
                "invalid DARCHIVA_API_BASE_URL value '{api_base_url}': {error}"
            ))
        })?;
        if api_base_url.cannot_be_a_base() {
            return Err(AppError::Validation(format!(
                "DARCHIVA_API_BASE_URL '{api_base_url}' must be an http(s) base URL"
            )));
        }

        let tenant_id = optional("DARCHIVA_TENANT_ID")
            .map(|value| {
                value.parse::<TenantId>().map_err(|error| {
                    AppError::Validation(format!("invalid DARCHIVA_TENANT_ID: {error}"))
                })
            })
            .transpose()?;

        let http_timeout_secs = parse_u64(
            "DARCHIVA_HTTP_TIMEOUT_SECS",
            optional("DARCHIVA_HTTP_TIMEOUT_SECS"),
            DEFAULT_HTTP_TIMEOUT_SECS,
        )?;
        let poll_interval_ms = parse_u64(
            "DARCHIVA_SCAN_POLL_INTERVAL_MS",
            optional("DARCHIVA_SCAN_POLL_INTERVAL_MS"),
            u64::try_from(DEFAULT_POLL_INTERVAL.as_millis()).unwrap_or(1000),
        )?;
        let catalog_ttl_secs = parse_u64(
            "DARCHIVA_CATALOG_TTL_SECS",
            optional("DARCHIVA_CATALOG_TTL_SECS"),
            DEFAULT_CATALOG_TTL.as_secs(),
        )?;

        if http_timeout_secs == 0 {
            return Err(AppError::Validation(
                "DARCHIVA_HTTP_TIMEOUT_SECS must be greater than zero".to_owned(),
            ));
        }
        if poll_interval_ms == 0 {
            return Err(AppError::Validation(
                "DARCHIVA_SCAN_POLL_INTERVAL_MS must be greater than zero".to_owned(),
            ));
        }

        Ok(Self {
            api_base_url,
            api_token: optional("DARCHIVA_API_TOKEN"),
            tenant_id,
            http_timeout: Duration::from_secs(http_timeout_secs),
            scan_poll_interval: Duration::from_millis(poll_interval_ms),
            catalog_ttl: Duration::from_secs(catalog_ttl_secs),
        })
    }
}

fn parse_u64(name: &str, value: Option<String>, default: u64) -> AppResult<u64> {
    match value {
        Some(value) => value.parse::<u64>().map_err(|error| {
            AppError::Validation(format!("invalid {name} value '{value}': {error}"))
        }),
        None => Ok(default),
    }
}
