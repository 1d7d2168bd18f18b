//! # Client Configuration
//!
//! Where the backend lives, which storefront to talk to, and where local
//! storage and uploads go.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     VITRINA_API_URL, then NEXT_PUBLIC_API_URL                          │
//! │     VITRINA_SUBDOMAIN, VITRINA_DB_PATH, VITRINA_TIMEOUT_SECS           │
//! │     VITRINA_CLOUDINARY_CLOUD, VITRINA_CLOUDINARY_PRESET                │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     ~/.config/vitrina/vitrina.toml (Linux)                             │
//! │     ~/Library/Application Support/app.vitrina.vitrina/vitrina.toml     │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! │     http://localhost:3001/api, 30 s timeout                            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! # vitrina.toml
//! [api]
//! base_url = "https://api.mitienda.com/api"
//! timeout_secs = 30
//!
//! [store]
//! subdomain = "mi-tienda"
//!
//! [cloudinary]
//! cloud_name = "mi-cloud"
//! upload_preset = "unsigned_products"
//!
//! [storage]
//! database_path = "/var/lib/vitrina/vitrina.db"
//! ```

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, info, warn};
use url::Url;
use vitrina_core::validation::validate_subdomain;

use crate::error::{ApiError, ApiResult};

/// Backend used when nothing else is configured.
pub const DEFAULT_API_URL: &str = "http://localhost:3001/api";

/// Request timeout used when nothing else is configured.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

// =============================================================================
// Sections
// =============================================================================

/// `[api]`: the backend REST API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiSettings {
    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

fn default_base_url() -> String {
    DEFAULT_API_URL.to_string()
}

fn default_timeout() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

impl Default for ApiSettings {
    fn default() -> Self {
        ApiSettings {
            base_url: default_base_url(),
            timeout_secs: default_timeout(),
        }
    }
}

/// `[store]`: the public storefront the shopping commands use.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subdomain: Option<String>,
}

/// `[cloudinary]`: unsigned image uploads.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CloudinarySettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cloud_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub upload_preset: Option<String>,
}

/// `[storage]`: the local storage database.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageSettings {
    /// Defaults to `vitrina.db` in the platform data directory.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub database_path: Option<PathBuf>,
}

// =============================================================================
// Vitrina Configuration
// =============================================================================

/// Complete client configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VitrinaConfig {
    #[serde(default)]
    pub api: ApiSettings,

    #[serde(default)]
    pub store: StoreSettings,

    #[serde(default)]
    pub cloudinary: CloudinarySettings,

    #[serde(default)]
    pub storage: StorageSettings,
}

impl VitrinaConfig {
    /// Loads configuration: defaults, then the TOML file, then environment.
    ///
    /// ## Arguments
    /// * `config_path` - Explicit file, or `None` for the platform default
    pub fn load(config_path: Option<PathBuf>) -> ApiResult<Self> {
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading config from file");
                let contents = std::fs::read_to_string(&path)?;
                config = toml::from_str(&contents)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    /// Loads config or returns defaults (plus environment) if loading fails.
    pub fn load_or_default(config_path: Option<PathBuf>) -> Self {
        Self::load(config_path).unwrap_or_else(|e| {
            warn!("Failed to load config: {}. Using defaults.", e);
            let mut config = Self::default();
            config.apply_env_overrides();
            config
        })
    }

    /// Saves configuration to file.
    pub fn save(&self, config_path: Option<PathBuf>) -> ApiResult<PathBuf> {
        let path = config_path
            .or_else(Self::default_config_path)
            .ok_or_else(|| ApiError::ConfigSaveFailed("No config path available".into()))?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| ApiError::ConfigSaveFailed(e.to_string()))?;
        }

        let contents = toml::to_string_pretty(self)?;
        std::fs::write(&path, contents).map_err(|e| ApiError::ConfigSaveFailed(e.to_string()))?;

        info!(?path, "Config saved");
        Ok(path)
    }

    /// Validates the configuration.
    ///
    /// ## Rules
    /// - `api.base_url` parses and uses http or https
    /// - `api.timeout_secs` is greater than 0
    /// - `store.subdomain`, when set, is a valid subdomain
    pub fn validate(&self) -> ApiResult<()> {
        let url = Url::parse(&self.api.base_url)
            .map_err(|e| ApiError::InvalidUrl(format!("{}: {}", self.api.base_url, e)))?;

        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(ApiError::InvalidUrl(format!(
                "API URL must start with http:// or https://, got: {}",
                self.api.base_url
            )));
        }

        if self.api.timeout_secs == 0 {
            return Err(ApiError::InvalidConfig(
                "timeout_secs must be greater than 0".into(),
            ));
        }

        if let Some(ref subdomain) = self.store.subdomain {
            validate_subdomain(subdomain)?;
        }

        Ok(())
    }

    /// Applies overrides from the process environment.
    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Applies overrides from any key lookup.
    ///
    /// Blank values are ignored so an exported-but-empty variable does not
    /// wipe a configured setting.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        // API URL, with the web frontend's variable as fallback
        if let Some(url) = get("VITRINA_API_URL").or_else(|| get("NEXT_PUBLIC_API_URL")) {
            debug!(url = %url, "Overriding API URL from environment");
            self.api.base_url = url;
        }

        if let Some(timeout) = get("VITRINA_TIMEOUT_SECS") {
            match timeout.parse::<u64>() {
                Ok(secs) => self.api.timeout_secs = secs,
                Err(_) => warn!(value = %timeout, "Ignoring non-numeric VITRINA_TIMEOUT_SECS"),
            }
        }

        if let Some(subdomain) = get("VITRINA_SUBDOMAIN") {
            debug!(subdomain = %subdomain, "Overriding subdomain from environment");
            self.store.subdomain = Some(subdomain);
        }

        if let Some(path) = get("VITRINA_DB_PATH") {
            self.storage.database_path = Some(PathBuf::from(path));
        }

        if let Some(cloud) = get("VITRINA_CLOUDINARY_CLOUD") {
            self.cloudinary.cloud_name = Some(cloud);
        }

        if let Some(preset) = get("VITRINA_CLOUDINARY_PRESET") {
            self.cloudinary.upload_preset = Some(preset);
        }
    }

    /// Returns the default config file path.
    pub fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("app", "vitrina", "vitrina")
            .map(|dirs| dirs.config_dir().join("vitrina.toml"))
    }

    // =========================================================================
    // Convenience Methods
    // =========================================================================

    /// Local storage database path: configured, or the platform data dir.
    pub fn database_path(&self) -> PathBuf {
        self.storage.database_path.clone().unwrap_or_else(|| {
            directories::ProjectDirs::from("app", "vitrina", "vitrina")
                .map(|dirs| dirs.data_dir().join("vitrina.db"))
                .unwrap_or_else(|| PathBuf::from("vitrina.db"))
        })
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.api.timeout_secs)
    }

    pub fn base_url(&self) -> &str {
        &self.api.base_url
    }

    pub fn subdomain(&self) -> Option<&str> {
        self.store.subdomain.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_default_config() {
        let config = VitrinaConfig::default();
        assert_eq!(config.base_url(), DEFAULT_API_URL);
        assert_eq!(config.timeout(), Duration::from_secs(30));
        assert_eq!(config.subdomain(), None);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_env_overrides() {
        let mut config = VitrinaConfig::default();
        config.apply_overrides(env(&[
            ("NEXT_PUBLIC_API_URL", "https://next.example.com/api"),
            ("VITRINA_SUBDOMAIN", "mi-tienda"),
            ("VITRINA_TIMEOUT_SECS", "5"),
            ("VITRINA_DB_PATH", "/tmp/v.db"),
            ("VITRINA_CLOUDINARY_CLOUD", "demo"),
            ("VITRINA_CLOUDINARY_PRESET", "unsigned"),
        ]));

        assert_eq!(config.base_url(), "https://next.example.com/api");
        assert_eq!(config.subdomain(), Some("mi-tienda"));
        assert_eq!(config.api.timeout_secs, 5);
        assert_eq!(config.database_path(), PathBuf::from("/tmp/v.db"));
        assert_eq!(config.cloudinary.cloud_name.as_deref(), Some("demo"));
        assert_eq!(config.cloudinary.upload_preset.as_deref(), Some("unsigned"));
    }

    #[test]
    fn test_vitrina_url_wins_over_next_public() {
        let mut config = VitrinaConfig::default();
        config.apply_overrides(env(&[
            ("VITRINA_API_URL", "https://api.example.com/api"),
            ("NEXT_PUBLIC_API_URL", "https://next.example.com/api"),
        ]));
        assert_eq!(config.base_url(), "https://api.example.com/api");
    }

    #[test]
    fn test_blank_and_invalid_env_values_are_ignored() {
        let mut config = VitrinaConfig::default();
        config.apply_overrides(env(&[("VITRINA_API_URL", "  "), ("VITRINA_TIMEOUT_SECS", "soon")]));
        assert_eq!(config.base_url(), DEFAULT_API_URL);
        assert_eq!(config.api.timeout_secs, DEFAULT_TIMEOUT_SECS);
    }

    #[test]
    fn test_config_validation() {
        let mut config = VitrinaConfig::default();

        config.api.base_url = "ftp://files.example.com".into();
        assert!(matches!(config.validate(), Err(ApiError::InvalidUrl(_))));

        config.api.base_url = "not a url".into();
        assert!(config.validate().is_err());

        config.api.base_url = DEFAULT_API_URL.into();
        config.api.timeout_secs = 0;
        assert!(matches!(config.validate(), Err(ApiError::InvalidConfig(_))));

        config.api.timeout_secs = 10;
        config.store.subdomain = Some("Mi Tienda".into());
        assert!(matches!(config.validate(), Err(ApiError::Validation(_))));
    }

    #[test]
    fn test_toml_round_trip() {
        let toml_text = r#"
            [api]
            base_url = "https://api.example.com/api"

            [store]
            subdomain = "tienda"
        "#;

        let config: VitrinaConfig = toml::from_str(toml_text).unwrap();
        assert_eq!(config.api.timeout_secs, DEFAULT_TIMEOUT_SECS);
        assert_eq!(config.subdomain(), Some("tienda"));

        let written = toml::to_string_pretty(&config).unwrap();
        let reread: VitrinaConfig = toml::from_str(&written).unwrap();
        assert_eq!(reread, config);
    }

    #[test]
    fn test_save_and_load_file() {
        let path = std::env::temp_dir()
            .join(format!("vitrina-config-{}", std::process::id()))
            .join("vitrina.toml");

        let mut config = VitrinaConfig::default();
        config.store.subdomain = Some("archivo".into());
        config.save(Some(path.clone())).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        let loaded: VitrinaConfig = toml::from_str(&text).unwrap();
        assert_eq!(loaded.subdomain(), Some("archivo"));

        let _ = std::fs::remove_dir_all(path.parent().unwrap());
    }
}
