use async_trait::async_trait;

use darchiva_core::AppResult;
use darchiva_domain::{PreferencesPatch, UserPreferences};

/// Port for the current user's preferences.
#[async_trait]
pub trait PreferencesApi: Send + Sync {
    /// Returns stored preferences merged over defaults.
    async fn get_preferences(&self) -> AppResult<UserPreferences>;

    /// Applies a partial update and returns the stored result.
    async fn update_preferences(&self, patch: &PreferencesPatch) -> AppResult<UserPreferences>;

    /// Deletes stored preferences.
    async fn reset_preferences(&self) -> AppResult<()>;
}
