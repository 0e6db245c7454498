//! Storage module for persisting scraped data
//!
//! This module handles all database operations for the scraper, including:
//! - SQLite database initialization and schema management
//! - Idempotent item persistence (deduplicated by source URL)
//! - The append-only crawl log that drives resumption

mod schema;
mod sqlite;
mod traits;

pub use schema::initialize_schema;
pub use sqlite::SqliteStorage;
pub use traits::{CatalogStore, StorageError, StorageResult};

use std::path::Path;

/// Initializes or opens a storage database
pub fn open_storage(path: &Path) -> StorageResult<SqliteStorage> {
    SqliteStorage::new(path)
}

/// A fully-enriched catalog item, ready for persistence
///
/// Items are created once at extraction time and never mutated; the `url`
/// field is the unique key, so re-encountering a URL is a storage no-op.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemRecord {
    pub title: String,
    pub url: String,
    pub image_url: String,
    pub category: String,
    pub size: String,
    pub screen_size: String,
    pub game_file_url: Option<String>,
    pub local_name: Option<String>,
}

/// Outcome of a page-processing attempt, as recorded in the crawl log
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogStatus {
    Success,
    Error,
}

impl LogStatus {
    pub fn to_db_string(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Error => "error",
        }
    }

    pub fn from_db_string(s: &str) -> Option<Self> {
        match s {
            "success" => Some(Self::Success),
            "error" => Some(Self::Error),
            _ => None,
        }
    }
}
