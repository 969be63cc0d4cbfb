use serde::{Deserialize, Serialize};
use std::fs;

use crate::error::ProviderError;

/// Default permission scope requested on interactive login
const DEFAULT_SCOPES: &[&str] = &[
    "email",
    "user_likes",
    "user_photos",
    "user_birthday",
    "user_relationships",
    "user_location",
    "user_actions.music",
];

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct FaceplateSettings {
    pub provider: ProviderSettings,
    pub login: LoginSettings,
    pub logging: LoggingSettings,
}

/// Fixed configuration of one provider instance
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderSettings {
    /// Application identifier registered with the platform (required)
    pub app_id: String,
    /// Authorization dialog endpoint used for redirect login
    pub dialog_endpoint: String,
    /// Base endpoint of the data-query API
    pub graph_endpoint: String,
    /// Locator of the platform's embeddable SDK resource
    pub sdk_resource: String,
    /// Optional initialization channel resource
    pub init_channel: Option<String>,
    /// Permission scope: data categories the user authorizes
    pub scopes: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoginSettings {
    /// Seconds to wait for an interactive login to resolve; 0 disables the
    /// timeout and restores wait-forever behavior
    pub login_timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    pub level: String,
}

impl Default for ProviderSettings {
    fn default() -> Self {
        Self {
            app_id: String::new(),
            dialog_endpoint: "https://www.facebook.com/dialog/oauth".to_string(),
            graph_endpoint: "https://graph.facebook.com".to_string(),
            sdk_resource: "//connect.facebook.net/en_US/all.js".to_string(),
            init_channel: None,
            scopes: DEFAULT_SCOPES.iter().map(ToString::to_string).collect(),
        }
    }
}

impl Default for LoginSettings {
    fn default() -> Self {
        Self {
            login_timeout_secs: 300,
        }
    }
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl ProviderSettings {
    /// Comma-separated scope list as sent in the authorization URL
    #[must_use]
    pub fn scope_csv(&self) -> String {
        self.scopes.join(",")
    }
}

impl FaceplateSettings {
    /// Load settings from configuration files and environment variables
    ///
    /// Settings are loaded with the following priority (highest to lowest):
    /// 1. `FACEPLATE_*` environment variables
    /// 2. `Faceplate.toml` at the path named by `FACEPLATE_CONFIG` (if set)
    /// 3. `Faceplate.toml` in the current directory (if it exists)
    /// 4. Default settings
    ///
    /// # Errors
    ///
    /// Returns an error if a settings file cannot be read, TOML parsing
    /// fails, or the resulting settings are invalid.
    pub fn load() -> Result<Self, ProviderError> {
        Self::initialize_environment();

        let mut settings = Self::load_base_settings()?;
        Self::apply_env_overrides(&mut settings);
        settings.validate()?;

        Ok(settings)
    }

    /// Parse settings from a TOML document
    ///
    /// # Errors
    ///
    /// Returns an error if TOML parsing fails or the parsed settings are
    /// invalid.
    pub fn from_toml_str(toml: &str) -> Result<Self, ProviderError> {
        let settings: Self = basic_toml::from_str(toml)
            .map_err(|e| ProviderError::Configuration(format!("TOML parsing failed: {e}")))?;
        settings.validate()?;
        Ok(settings)
    }

    /// Initialize logging
    ///
    /// Idempotent: a second initialization on top of an already-configured
    /// logger is a no-op.
    fn initialize_environment() {
        let _ = env_logger::try_init();
    }

    /// Load base settings from TOML file(s) or use defaults
    fn load_base_settings() -> Result<Self, ProviderError> {
        let mut settings = Self::default();

        let default_config_path = std::path::PathBuf::from("Faceplate.toml");
        if default_config_path.exists() {
            let toml_content = fs::read_to_string(&default_config_path).map_err(|e| {
                ProviderError::Configuration(format!(
                    "Cannot read {}: {e}",
                    default_config_path.display()
                ))
            })?;
            settings = basic_toml::from_str(&toml_content)
                .map_err(|e| ProviderError::Configuration(format!("TOML parsing failed: {e}")))?;
            log::info!("Loaded base settings from {}", default_config_path.display());
        }

        // An explicit config path overrides the conventional location
        if let Ok(config_path) = std::env::var("FACEPLATE_CONFIG") {
            let path = std::path::Path::new(&config_path);
            if path.exists() {
                let toml_content = fs::read_to_string(path).map_err(|e| {
                    ProviderError::Configuration(format!("Cannot read {}: {e}", path.display()))
                })?;
                settings = basic_toml::from_str(&toml_content).map_err(|e| {
                    ProviderError::Configuration(format!("TOML parsing failed: {e}"))
                })?;
                log::info!("Overriding settings from {}", path.display());
            } else {
                log::warn!("FACEPLATE_CONFIG set but no file found at: {}", path.display());
            }
        }

        Ok(settings)
    }

    /// Apply environment variable overrides to settings
    fn apply_env_overrides(settings: &mut Self) {
        if let Ok(app_id) = std::env::var("FACEPLATE_APP_ID") {
            settings.provider.app_id = app_id;
        }
        if let Ok(dialog_endpoint) = std::env::var("FACEPLATE_DIALOG_ENDPOINT") {
            settings.provider.dialog_endpoint = dialog_endpoint;
        }
        if let Ok(graph_endpoint) = std::env::var("FACEPLATE_GRAPH_ENDPOINT") {
            settings.provider.graph_endpoint = graph_endpoint;
        }
        if let Ok(scopes) = std::env::var("FACEPLATE_SCOPES") {
            settings.provider.scopes = scopes
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(ToString::to_string)
                .collect();
        }
        if let Ok(timeout) = std::env::var("FACEPLATE_LOGIN_TIMEOUT_SECS") {
            if let Ok(secs) = timeout.parse::<u64>() {
                settings.login.login_timeout_secs = secs;
            }
        }
        if let Ok(level) = std::env::var("FACEPLATE_LOG_LEVEL") {
            settings.logging.level = level;
        }
    }

    /// Validate that the settings describe a usable provider instance
    ///
    /// # Errors
    ///
    /// Returns an error if the application id is missing or the endpoints are
    /// empty.
    pub fn validate(&self) -> Result<(), ProviderError> {
        if self.provider.app_id.trim().is_empty() {
            return Err(ProviderError::Configuration(
                "provider.app_id is required".to_string(),
            ));
        }
        if self.provider.dialog_endpoint.trim().is_empty() {
            return Err(ProviderError::Configuration(
                "provider.dialog_endpoint must not be empty".to_string(),
            ));
        }
        if self.provider.graph_endpoint.trim().is_empty() {
            return Err(ProviderError::Configuration(
                "provider.graph_endpoint must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    fn test_defaults() {
        let settings = FaceplateSettings::default();
        assert!(settings.provider.app_id.is_empty());
        assert_eq!(
            settings.provider.dialog_endpoint,
            "https://www.facebook.com/dialog/oauth"
        );
        assert_eq!(settings.provider.graph_endpoint, "https://graph.facebook.com");
        assert!(settings.provider.scopes.contains(&"email".to_string()));
        assert!(settings.provider.scopes.contains(&"user_likes".to_string()));
        assert_eq!(settings.login.login_timeout_secs, 300);
        assert_eq!(settings.logging.level, "info");
    }

    #[test]
    fn test_scope_csv() {
        let mut settings = FaceplateSettings::default();
        settings.provider.scopes = vec!["email".to_string(), "user_likes".to_string()];
        assert_eq!(settings.provider.scope_csv(), "email,user_likes");
    }

    #[test]
    fn test_from_toml_str_partial_document() {
        let settings = FaceplateSettings::from_toml_str(
            r#"
            [provider]
            app_id = "123"
            scopes = ["email"]
            "#,
        )
        .unwrap();
        assert_eq!(settings.provider.app_id, "123");
        assert_eq!(settings.provider.scopes, vec!["email".to_string()]);
        // Unspecified sections keep their defaults
        assert_eq!(settings.login.login_timeout_secs, 300);
    }

    #[test]
    fn test_validate_rejects_missing_app_id() {
        let settings = FaceplateSettings::default();
        let err = settings.validate().unwrap_err();
        assert!(err.to_string().contains("app_id"));
    }

    #[test]
    #[serial]
    fn test_env_overrides() {
        std::env::set_var("FACEPLATE_APP_ID", "env-app");
        std::env::set_var("FACEPLATE_SCOPES", "email, user_photos ,");
        std::env::set_var("FACEPLATE_LOGIN_TIMEOUT_SECS", "42");

        let mut settings = FaceplateSettings::default();
        FaceplateSettings::apply_env_overrides(&mut settings);

        assert_eq!(settings.provider.app_id, "env-app");
        assert_eq!(
            settings.provider.scopes,
            vec!["email".to_string(), "user_photos".to_string()]
        );
        assert_eq!(settings.login.login_timeout_secs, 42);

        std::env::remove_var("FACEPLATE_APP_ID");
        std::env::remove_var("FACEPLATE_SCOPES");
        std::env::remove_var("FACEPLATE_LOGIN_TIMEOUT_SECS");
    }

    #[test]
    #[serial]
    fn test_load_from_explicit_config_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Faceplate.toml");
        std::fs::write(
            &path,
            r#"
            [provider]
            app_id = "file-app"

            [login]
            login_timeout_secs = 7
            "#,
        )
        .unwrap();
        std::env::set_var("FACEPLATE_CONFIG", path.to_str().unwrap());

        let settings = FaceplateSettings::load().unwrap();
        assert_eq!(settings.provider.app_id, "file-app");
        assert_eq!(settings.login.login_timeout_secs, 7);

        std::env::remove_var("FACEPLATE_CONFIG");
    }
}
