use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use url::Url;

use crate::error::ConfigError;

/// Environment variable consulted when no weather API key is configured.
pub const WEATHER_API_KEY_ENV: &str = "OPENWEATHER_API_KEY";

/// Configuration validation errors
#[derive(Debug, Clone)]
pub struct ConfigValidationError {
    pub field: String,
    pub message: String,
}

impl std::fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Result of config validation
#[derive(Debug, Clone, Default)]
pub struct ValidationResult {
    pub errors: Vec<ConfigValidationError>,
    pub warnings: Vec<ConfigValidationError>,
}

impl ValidationResult {
    /// Returns true if there are no errors (warnings are OK)
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn add_error(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors.push(ConfigValidationError {
            field: field.into(),
            message: message.into(),
        });
    }

    pub fn add_warning(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.warnings.push(ConfigValidationError {
            field: field.into(),
            message: message.into(),
        });
    }

    /// Get a user-friendly message summarizing all errors
    pub fn error_summary(&self) -> String {
        self.errors
            .iter()
            .map(|e| e.to_string())
            .collect::<Vec<_>>()
            .join("; ")
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Application configuration directory (also holds local storage)
    pub config_dir: PathBuf,

    /// City data source settings
    #[serde(default)]
    pub cities: CitiesConfig,

    /// Weather data source settings
    #[serde(default)]
    pub weather: WeatherConfig,

    /// Screen preferences
    #[serde(default)]
    pub ui: UiConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CitiesConfig {
    /// Records search endpoint of the open-data portal
    pub api_url: String,

    /// Dataset queried for city records
    pub dataset: String,

    /// Records requested per page
    pub page_size: usize,

    /// Server-side sort key
    pub sort: String,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for CitiesConfig {
    fn default() -> Self {
        Self {
            api_url: "https://public.opendatasoft.com/api/records/1.0/search/".to_string(),
            dataset: "geonames-all-cities-with-a-population-1000".to_string(),
            page_size: 20,
            sort: "name".to_string(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Unit system preference
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum UnitPreference {
    #[default]
    Metric,
    Imperial,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeatherConfig {
    /// Current-weather endpoint
    pub api_url: String,

    /// API key (falls back to OPENWEATHER_API_KEY when empty)
    #[serde(default)]
    pub api_key: String,

    /// Unit system selected when a detail screen opens
    #[serde(default)]
    pub default_units: UnitPreference,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            api_url: "https://api.openweathermap.org/data/2.5/weather".to_string(),
            api_key: String::new(),
            default_units: UnitPreference::Metric,
            timeout_secs: default_timeout_secs(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    /// Host of the external site opened by the secondary city action
    pub external_site_host: String,

    /// Number of table rows printed on the list screen
    #[serde(default = "default_visible_rows")]
    pub visible_rows: usize,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            external_site_host: "weather-website.com".to_string(),
            visible_rows: default_visible_rows(),
        }
    }
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_visible_rows() -> usize {
    20
}

impl Default for Config {
    fn default() -> Self {
        let config_dir = dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("cityweather");

        Self {
            config_dir,
            cities: CitiesConfig::default(),
            weather: WeatherConfig::default(),
            ui: UiConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from file, creating default if it doesn't exist
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;
        Self::load_from(&config_path)
    }

    /// Load configuration from an explicit path, creating it with defaults
    /// if missing.
    pub fn load_from(config_path: &Path) -> Result<Self> {
        if !config_path.exists() {
            let mut config = Self::default();
            if let Some(parent) = config_path.parent() {
                config.config_dir = parent.to_path_buf();
            }
            config.save_to(config_path)?;
            // Applied after saving so an env-sourced key never lands on disk.
            config.apply_env_overrides();
            return Ok(config);
        }

        let contents =
            std::fs::read_to_string(config_path).context("Failed to read config file")?;

        let mut config: Config =
            toml::from_str(&contents).map_err(|e| ConfigError::ParseError(e.to_string()))?;

        config.apply_env_overrides();
        Ok(config)
    }

    /// Load configuration and validate it
    ///
    /// Returns the config along with any validation warnings.
    /// Returns an error if validation fails with critical errors.
    pub fn load_validated() -> Result<(Self, ValidationResult)> {
        Self::load()?.into_validated()
    }

    /// Validate an already loaded configuration, failing on errors and
    /// logging warnings.
    pub fn into_validated(self) -> Result<(Self, ValidationResult)> {
        let validation = self.validate();

        if !validation.is_valid() {
            return Err(ConfigError::Invalid(validation.error_summary()).into());
        }

        for warning in &validation.warnings {
            tracing::warn!("Config warning: {}", warning);
        }

        Ok((self, validation))
    }

    fn apply_env_overrides(&mut self) {
        if self.weather.api_key.is_empty() {
            if let Ok(key) = std::env::var(WEATHER_API_KEY_ENV) {
                tracing::info!("Using weather API key from {}", WEATHER_API_KEY_ENV);
                self.weather.api_key = key;
            }
        }
    }

    /// Validate the configuration
    ///
    /// Returns a ValidationResult containing any errors or warnings.
    pub fn validate(&self) -> ValidationResult {
        let mut result = ValidationResult::default();

        self.validate_url(&self.cities.api_url, "cities.api_url", &mut result);
        self.validate_url(&self.weather.api_url, "weather.api_url", &mut result);

        if self.cities.page_size == 0 {
            result.add_error("cities.page_size", "Page size must be greater than 0");
        } else if self.cities.page_size > 100 {
            result.add_warning(
                "cities.page_size",
                "Page size is unusually large (>100) for the records API",
            );
        }

        if self.cities.dataset.trim().is_empty() {
            result.add_error("cities.dataset", "Dataset name must not be empty");
        }

        if self.weather.api_key.is_empty() {
            result.add_warning(
                "weather.api_key",
                format!(
                    "No weather API key configured (set it here or via {}) - weather lookups will fail",
                    WEATHER_API_KEY_ENV
                ),
            );
        }

        if self.ui.external_site_host.trim().is_empty() {
            result.add_error("ui.external_site_host", "External site host must not be empty");
        }

        if self.ui.visible_rows == 0 {
            result.add_warning("ui.visible_rows", "City table will not show any rows");
        }

        result
    }

    /// Validate a URL field
    fn validate_url(&self, url_str: &str, field_name: &str, result: &mut ValidationResult) {
        match Url::parse(url_str) {
            Ok(url) => {
                if url.scheme() != "http" && url.scheme() != "https" {
                    result.add_error(
                        field_name,
                        format!("URL must use http or https scheme, got: {}", url.scheme()),
                    );
                }

                if url.host().is_none() {
                    result.add_error(field_name, "URL must have a host");
                }
            }
            Err(e) => {
                result.add_error(field_name, format!("Invalid URL: {}", e));
            }
        }
    }

    /// Save configuration to the default location
    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_path()?;
        self.save_to(&config_path)
    }

    /// Save configuration to an explicit path
    pub fn save_to(&self, config_path: &Path) -> Result<()> {
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent).context("Failed to create config directory")?;
        }

        let contents = toml::to_string_pretty(self).context("Failed to serialize config")?;

        std::fs::write(config_path, contents).context("Failed to write config file")?;

        Ok(())
    }

    /// Path of the local key-value storage file
    pub fn local_storage_path(&self) -> PathBuf {
        self.config_dir.join("local_storage.json")
    }

    /// Get the path to the configuration file
    fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Failed to get config directory")?
            .join("cityweather");

        Ok(config_dir.join("config.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keyed_config() -> Config {
        let mut config = Config::default();
        config.weather.api_key = "test-key".to_string();
        config
    }

    #[test]
    fn test_valid_default_config() {
        let result = keyed_config().validate();
        assert!(result.is_valid(), "Default config should be valid: {:?}", result.errors);
        assert!(result.warnings.is_empty(), "{:?}", result.warnings);
    }

    #[test]
    fn test_default_page_size_is_twenty() {
        assert_eq!(Config::default().cities.page_size, 20);
        assert_eq!(Config::default().ui.external_site_host, "weather-website.com");
    }

    #[test]
    fn test_invalid_url() {
        let mut config = keyed_config();
        config.cities.api_url = "not-a-url".to_string();
        let result = config.validate();
        assert!(!result.is_valid());
        assert!(result.errors.iter().any(|e| e.field == "cities.api_url"));
    }

    #[test]
    fn test_invalid_url_scheme() {
        let mut config = keyed_config();
        config.weather.api_url = "ftp://localhost:8080".to_string();
        let result = config.validate();
        assert!(!result.is_valid());
        assert!(result.errors.iter().any(|e| e.message.contains("http or https")));
    }

    #[test]
    fn test_zero_page_size() {
        let mut config = keyed_config();
        config.cities.page_size = 0;
        let result = config.validate();
        assert!(!result.is_valid());
        assert!(result.errors.iter().any(|e| e.field == "cities.page_size"));
    }

    #[test]
    fn test_missing_api_key_is_warning() {
        let mut config = Config::default();
        config.weather.api_key.clear();
        let result = config.validate();
        assert!(result.is_valid());
        assert!(result.warnings.iter().any(|w| w.field == "weather.api_key"));
    }

    #[test]
    fn test_empty_host_is_error() {
        let mut config = keyed_config();
        config.ui.external_site_host = "  ".to_string();
        assert!(!config.validate().is_valid());
    }

    #[test]
    fn test_load_from_creates_default_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let config = Config::load_from(&path).unwrap();

        assert!(path.exists());
        assert_eq!(config.config_dir, dir.path());
        assert_eq!(config.local_storage_path(), dir.path().join("local_storage.json"));
    }

    #[test]
    fn test_save_then_load_keeps_settings() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let mut config = keyed_config();
        config.config_dir = dir.path().to_path_buf();
        config.cities.page_size = 50;
        config.weather.default_units = UnitPreference::Imperial;
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.cities.page_size, 50);
        assert_eq!(loaded.weather.default_units, UnitPreference::Imperial);
        assert_eq!(loaded.weather.api_key, "test-key");
    }

    #[test]
    fn test_missing_sections_use_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "config_dir = \"/tmp/cityweather\"\n").unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.cities.sort, "name");
        assert_eq!(loaded.ui.visible_rows, 20);
    }

    #[test]
    fn test_env_api_key_is_not_persisted() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        std::env::set_var(WEATHER_API_KEY_ENV, "rotating-key-1");
        let created = Config::load_from(&path).unwrap();
        assert_eq!(created.weather.api_key, "rotating-key-1");
        let on_disk = std::fs::read_to_string(&path).unwrap();
        assert!(!on_disk.contains("rotating-key-1"), "{}", on_disk);

        std::env::set_var(WEATHER_API_KEY_ENV, "rotating-key-2");
        let reloaded = Config::load_from(&path).unwrap();
        std::env::remove_var(WEATHER_API_KEY_ENV);

        assert_eq!(reloaded.weather.api_key, "rotating-key-2");
    }

    #[test]
    fn test_into_validated_rejects_errors() {
        let mut config = keyed_config();
        config.cities.page_size = 0;

        let err = config.into_validated().unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ConfigError>(),
            Some(ConfigError::Invalid(msg)) if msg.contains("cities.page_size")
        ));
        assert!(keyed_config().into_validated().is_ok());
    }

    #[test]
    fn test_malformed_file_is_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[cities\npage_size = ").unwrap();

        let err = Config::load_from(&path).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ConfigError>(),
            Some(ConfigError::ParseError(_))
        ));
    }

    #[test]
    fn test_validation_result_error_summary() {
        let mut result = ValidationResult::default();
        result.add_error("field1", "error1");
        result.add_error("field2", "error2");
        let summary = result.error_summary();
        assert!(summary.contains("field1"));
        assert!(summary.contains("field2"));
    }
}
