//! Pre-built test data

use crate::models::Session;
use crate::settings::FaceplateSettings;
use crate::testing::constants::{TEST_ACCESS_TOKEN, TEST_APP_ID, TEST_USER_ID};

/// Factory for common fixture objects
pub struct TestFixtures;

impl TestFixtures {
    /// Settings with the test application id and a short scope list
    #[must_use]
    pub fn settings() -> FaceplateSettings {
        let mut settings = FaceplateSettings::default();
        settings.provider.app_id = TEST_APP_ID.to_string();
        settings.provider.scopes = vec!["email".to_string(), "user_likes".to_string()];
        settings
    }

    /// A connected session for the test user
    #[must_use]
    pub fn session() -> Session {
        Session::new(TEST_USER_ID, TEST_ACCESS_TOKEN)
    }
}
