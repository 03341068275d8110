use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::time::Duration;

/// Runtime configuration for the recipe browser
#[derive(Debug, Deserialize, Clone)]
pub struct BrowserConfig {
    /// Base URL of the recipe lookup API
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout: u64,
    /// Quiet interval before a typed query is sent, in milliseconds
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
    /// Query used to load the gallery's base collection
    #[serde(default = "default_gallery_seed")]
    pub gallery_seed: String,
    /// User agent sent with every request
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout: default_timeout(),
            debounce_ms: default_debounce_ms(),
            gallery_seed: default_gallery_seed(),
            user_agent: default_user_agent(),
        }
    }
}

// Default value functions
fn default_base_url() -> String {
    "https://www.themealdb.com/api/json/v1/1".to_string()
}

fn default_timeout() -> u64 {
    30
}

fn default_debounce_ms() -> u64 {
    400
}

fn default_gallery_seed() -> String {
    "a".to_string()
}

fn default_user_agent() -> String {
    format!("mealdb-browser/{}", env!("CARGO_PKG_VERSION"))
}

impl BrowserConfig {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded with the following priority (highest to lowest):
    /// 1. Environment variables with MEALDB__ prefix
    /// 2. config.toml file in current directory
    /// 3. Default values
    ///
    /// Environment variable format: MEALDB__DEBOUNCE_MS
    pub fn load() -> Result<Self, ConfigError> {
        load_config()
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout)
    }

    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

/// Load configuration from file and environment variables
///
/// See [`BrowserConfig::load`] for the layering order.
pub fn load_config() -> Result<BrowserConfig, ConfigError> {
    let settings = Config::builder()
        // Optional config file (can be missing)
        .add_source(File::with_name("config").required(false))
        // Use double underscore for nested keys, matching the prefix separator
        .add_source(
            Environment::with_prefix("MEALDB")
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    settings.try_deserialize()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_values() {
        assert_eq!(default_base_url(), "https://www.themealdb.com/api/json/v1/1");
        assert_eq!(default_timeout(), 30);
        assert_eq!(default_debounce_ms(), 400);
        assert_eq!(default_gallery_seed(), "a");
        assert!(default_user_agent().starts_with("mealdb-browser/"));
    }

    #[test]
    fn test_durations() {
        let config = BrowserConfig::default();
        assert_eq!(config.timeout(), Duration::from_secs(30));
        assert_eq!(config.debounce(), Duration::from_millis(400));
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let settings = Config::builder()
            .add_source(File::from_str(
                "debounce_ms = 250\ngallery_seed = \"b\"",
                config::FileFormat::Toml,
            ))
            .build()
            .unwrap();
        let config: BrowserConfig = settings.try_deserialize().unwrap();

        assert_eq!(config.debounce_ms, 250);
        assert_eq!(config.gallery_seed, "b");
        assert_eq!(config.timeout, 30);
        assert_eq!(config.base_url, default_base_url());
    }
}
