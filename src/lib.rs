//! Jarhound: an incremental catalog scraper
//!
//! This crate implements a resumable scraper for a paginated mobile-games
//! catalog. It extracts structured item records page by page, optionally
//! downloads the game artifacts, and keeps a durable progress log so an
//! interrupted crawl picks up where it left off without duplicating records.

pub mod config;
pub mod scraper;
pub mod storage;

use thiserror::Error;

/// Main error type for Jarhound operations
#[derive(Debug, Error)]
pub enum JarhoundError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Storage error: {0}")]
    Storage(#[from] storage::StorageError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),

    #[error("Validation error: {0}")]
    Validation(String),
}

/// Result type alias for Jarhound operations
pub type Result<T> = std::result::Result<T, JarhoundError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use crate::config::Config;
pub use crate::scraper::{Controller, ScrapeOptions};
pub use crate::storage::{CatalogStore, ItemRecord, LogStatus, SqliteStorage};
