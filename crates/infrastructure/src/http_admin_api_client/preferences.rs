use darchiva_application::PreferencesApi;
use darchiva_domain::{PreferencesPatch, UserPreferences};

use super::*;

const PREFERENCES: [&str; 3] = ["users", "me", "preferences"];

#[async_trait]
impl PreferencesApi for HttpAdminApiClient {
    async fn get_preferences(&self) -> AppResult<UserPreferences> {
        self.send_json(self.v1(Method::GET, &PREFERENCES)?).await
    }

    async fn update_preferences(&self, patch: &PreferencesPatch) -> AppResult<UserPreferences> {
        self.send_json(self.v1(Method::PATCH, &PREFERENCES)?.json(patch))
            .await
    }

    async fn reset_preferences(&self) -> AppResult<()> {
        self.send_empty(self.v1(Method::DELETE, &PREFERENCES)?).await
    }
}
