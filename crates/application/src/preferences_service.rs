use std::sync::Arc;

use tracing::{info, warn};

use darchiva_core::AppResult;
use darchiva_domain::{PreferencesPatch, UserPreferences};

use crate::admin_api_ports::PreferencesApi;
use crate::query_cache::{QueryClient, QueryKey};

/// Current user's interface preferences.
#[derive(Clone)]
pub struct PreferencesService {
    api: Arc<dyn PreferencesApi>,
    queries: QueryClient,
}

impl PreferencesService {
    /// Creates a new service from required dependencies.
    #[must_use]
    pub fn new(api: Arc<dyn PreferencesApi>, queries: QueryClient) -> Self {
        Self { api, queries }
    }

    /// Returns preferences merged over defaults.
    pub async fn get(&self) -> AppResult<UserPreferences> {
        self.queries
            .fetch_cached(&QueryKey::preferences(), None, || self.api.get_preferences())
            .await
    }

    /// Applies a partial update, showing it in the cache until the call
    /// settles and restoring the previous value on failure.
    pub async fn update(&self, patch: &PreferencesPatch) -> AppResult<UserPreferences> {
        if patch.is_empty() {
            return self.get().await;
        }

        let result = self
            .queries
            .optimistic_update(
                &QueryKey::preferences(),
                |current: Option<UserPreferences>| Some(current.unwrap_or_default().merged(patch)),
                self.api.update_preferences(patch),
            )
            .await;

        match &result {
            Ok(_) => info!("updated preferences"),
            Err(error) => warn!(error = %error, "failed to update preferences"),
        }

        result
    }

    /// Deletes stored preferences and caches the defaults.
    pub async fn reset(&self) -> AppResult<UserPreferences> {
        if let Err(error) = self.api.reset_preferences().await {
            warn!(error = %error, "failed to reset preferences");
            return Err(error);
        }

        let defaults = UserPreferences::default();
        self.queries.set(&QueryKey::preferences(), &defaults).await?;
        info!("reset preferences to defaults");
        Ok(defaults)
    }
}
