//! Configuration loading and types
//!
//! Configuration comes from an optional TOML file; every field has a default
//! so the scraper runs with no config file at all. Page range and the
//! download flag are runtime options supplied on the command line, not
//! configuration.

use crate::{ConfigError, ConfigResult};
use serde::Deserialize;
use std::path::Path;
use url::Url;

/// Main configuration structure for Jarhound
#[derive(Debug, Clone, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub catalog: CatalogConfig,
    #[serde(default)]
    pub http: HttpConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

/// Catalog location and pacing configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CatalogConfig {
    /// Base URL of the paginated catalog
    #[serde(rename = "base-url", default = "default_base_url")]
    pub base_url: String,

    /// Last catalog page to scrape when --end-page is not given
    #[serde(rename = "default-end-page", default = "default_end_page")]
    pub default_end_page: u32,

    /// Fixed delay between consecutive requests (milliseconds)
    #[serde(rename = "request-delay-ms", default = "default_request_delay_ms")]
    pub request_delay_ms: u64,
}

/// HTTP client configuration
#[derive(Debug, Clone, Deserialize)]
pub struct HttpConfig {
    /// User-Agent header sent with every request
    #[serde(rename = "user-agent", default = "default_user_agent")]
    pub user_agent: String,
}

/// Output paths configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Path to the SQLite database file
    #[serde(rename = "database-path", default = "default_database_path")]
    pub database_path: String,

    /// Directory where downloaded artifacts are written
    #[serde(rename = "download-dir", default = "default_download_dir")]
    pub download_dir: String,
}

fn default_base_url() -> String {
    "https://phoneky.com/games/".to_string()
}

fn default_end_page() -> u32 {
    528
}

fn default_request_delay_ms() -> u64 {
    1000
}

fn default_user_agent() -> String {
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
     (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36"
        .to_string()
}

fn default_database_path() -> String {
    "phoneky_games.db".to_string()
}

fn default_download_dir() -> String {
    "JARs".to_string()
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            default_end_page: default_end_page(),
            request_delay_ms: default_request_delay_ms(),
        }
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            user_agent: default_user_agent(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
            download_dir: default_download_dir(),
        }
    }
}

/// Loads and validates configuration from a TOML file
///
/// # Arguments
///
/// * `path` - Path to the TOML configuration file
///
/// # Returns
///
/// * `Ok(Config)` - Parsed and validated configuration
/// * `Err(ConfigError)` - Read, parse, or validation failure
pub fn load_config(path: &Path) -> ConfigResult<Config> {
    let contents = std::fs::read_to_string(path)?;
    let config: Config = toml::from_str(&contents)?;
    validate_config(&config)?;
    Ok(config)
}

/// Validates a configuration
fn validate_config(config: &Config) -> ConfigResult<()> {
    let base = Url::parse(&config.catalog.base_url)
        .map_err(|_| ConfigError::InvalidUrl(config.catalog.base_url.clone()))?;

    if base.scheme() != "http" && base.scheme() != "https" {
        return Err(ConfigError::InvalidUrl(config.catalog.base_url.clone()));
    }

    if config.catalog.default_end_page == 0 {
        return Err(ConfigError::Validation(
            "default-end-page must be at least 1".to_string(),
        ));
    }

    Ok(())
}
