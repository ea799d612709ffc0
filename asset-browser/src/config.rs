//! Configuration file loading and management
//!
//! This module handles loading and parsing the host configuration from
//! `$XDG_CONFIG_HOME/asset-browser/config.toml`. If the configuration file doesn't
//! exist, a default configuration is created with documented comments.

use anyhow::{Context, Result};
use provider_ecoplants::EcoPlantsConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Main host configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Config {
    /// Browser-wide settings
    #[serde(default)]
    pub browser: BrowserConfig,
    /// Store provider configurations
    #[serde(default)]
    pub providers: ProvidersConfig,
}

/// Browser-wide settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BrowserConfig {
    /// Log level (trace, debug, info, warn, error)
    /// Default: "info"
    pub log_level: String,
    /// Timeout applied around each provider search
    /// Default: 30
    pub search_timeout_secs: u64,
    /// Persisted settings file
    /// If None, uses XDG_DATA_HOME/asset-browser/settings.toml
    #[serde(skip_serializing_if = "Option::is_none")]
    pub settings_path: Option<PathBuf>,
}

/// Per-provider configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ProvidersConfig {
    #[serde(default)]
    pub ecoplants: EcoPlantsConfig,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            search_timeout_secs: 30,
            settings_path: None,
        }
    }
}

impl BrowserConfig {
    pub fn search_timeout(&self) -> Duration {
        Duration::from_secs(self.search_timeout_secs)
    }
}

impl Config {
    /// Load configuration from the specified path
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        config.validate()?;
        Ok(config)
    }

    /// Load configuration from the default XDG config location
    ///
    /// If the configuration file doesn't exist, creates a default configuration
    /// file with documented comments.
    pub fn load_default() -> Result<Self> {
        let config_path = Self::default_config_path()?;

        if !config_path.exists() {
            Self::create_default_file(&config_path)?;
        }

        Self::load(&config_path)
    }

    /// Returns `$XDG_CONFIG_HOME/asset-browser/config.toml`
    pub fn default_config_path() -> Result<PathBuf> {
        let dirs = directories::ProjectDirs::from("", "ecoplants", "asset-browser")
            .context("Failed to determine project directories")?;

        Ok(dirs.config_dir().join("config.toml"))
    }

    fn create_default_file(path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        fs::write(path, Self::default_config_content())
            .with_context(|| format!("Failed to write default config file: {}", path.display()))?;

        tracing::info!("Created default configuration file at: {}", path.display());
        Ok(())
    }

    /// Generate the default configuration file content with comments
    fn default_config_content() -> String {
        r#"# Asset Browser Configuration

[browser]
# Log level: trace, debug, info, warn, error
# Default: "info"
log_level = "info"

# Seconds a single provider search may take before it is abandoned
# Default: 30
search_timeout_secs = 30

# File holding persisted provider settings (enable flags)
# If not specified, defaults to $XDG_DATA_HOME/asset-browser/settings.toml
# settings_path = "/path/to/settings.toml"

[providers.ecoplants]
# Display name, also used as the asset vendor
provider_id = "EcoPlants"

# PBRMAX asset list endpoint
store_url = "https://api.prod.pbrmax.cn/en-US/asset/list"

# Base of the product page links
product_page_url = "https://pbrmax.cn/"

# Sent as the app-version header
app_version = "2.0.0"

# Directory containing logo_placeholder.png
data_dir = "data"

# Setting key that toggles the provider
enable_setting = "/exts/ecoplants.asset_provider/enable"

# Category path to PBRMAX category ID mapping. Keys are the uppercased path
# segments joined with commas; "" is used when no category is selected and
# -10000 means "no category filter". Omit the table to use the built-in one.
# [providers.ecoplants.categories]
# "" = [-10000]
# "VEHICLES" = [309, 311, 312]
# "FURNITURE,SEAT" = [196]
"#
        .to_string()
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        let valid_log_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_log_levels.contains(&self.browser.log_level.as_str()) {
            anyhow::bail!(
                "Invalid log_level: {}. Must be one of: {}",
                self.browser.log_level,
                valid_log_levels.join(", ")
            );
        }

        if self.browser.search_timeout_secs == 0 {
            anyhow::bail!("browser.search_timeout_secs must be greater than 0");
        }

        let ecoplants = &self.providers.ecoplants;
        if ecoplants.provider_id.is_empty() {
            anyhow::bail!("providers.ecoplants.provider_id must not be empty");
        }
        for (field, url) in [
            ("store_url", &ecoplants.store_url),
            ("product_page_url", &ecoplants.product_page_url),
        ] {
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                anyhow::bail!("providers.ecoplants.{}: invalid URL: {}", field, url);
            }
        }

        Ok(())
    }

    /// Get the persisted settings path
    ///
    /// Returns the configured path or the default XDG data directory path
    pub fn settings_path(&self) -> Result<PathBuf> {
        if let Some(ref path) = self.browser.settings_path {
            return Ok(path.clone());
        }

        let dirs = directories::ProjectDirs::from("", "ecoplants", "asset-browser")
            .context("Failed to determine project directories")?;

        Ok(dirs.data_dir().join("settings.toml"))
    }
}
