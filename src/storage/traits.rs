//! Storage trait and error types
//!
//! This module defines the trait interface for the persistence backend and
//! its associated error types.

use crate::storage::{ItemRecord, LogStatus};
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Database error: {0}")]
    Database(String),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Trait for the catalog persistence backend
///
/// Implementations own two durable collections: the deduplicated `items`
/// table and the append-only `crawl_log`. The log is the sole source of
/// truth for crawl resumption.
pub trait CatalogStore {
    /// Commits a page's item batch together with its `success` log row
    ///
    /// All inserts plus the log row happen in a single transaction. Items
    /// whose URL already exists are silently ignored (insert-or-ignore, not
    /// update). On failure the transaction is rolled back and a separate
    /// `error` log row is committed for the page instead.
    ///
    /// # Arguments
    ///
    /// * `page_number` - The catalog page these items came from
    /// * `items` - The item batch, in original catalog order
    ///
    /// # Returns
    ///
    /// The number of rows actually inserted (conflicts excluded)
    fn commit_page(&mut self, page_number: u32, items: &[ItemRecord]) -> StorageResult<usize>;

    /// Appends one row to the crawl log
    ///
    /// The log is append-only: retries of a page produce new rows, never
    /// updates.
    fn append_log(
        &mut self,
        page_number: u32,
        status: LogStatus,
        message: &str,
    ) -> StorageResult<()>;

    /// Returns the highest page number with a `success` log row, or 0
    fn last_successful_page(&self) -> StorageResult<u32>;

    /// Counts stored items
    fn count_items(&self) -> StorageResult<u64>;

    /// Counts log rows with the given status
    fn count_log_entries(&self, status: LogStatus) -> StorageResult<u64>;

    /// Counts log rows for a specific page and status
    fn count_log_entries_for_page(
        &self,
        page_number: u32,
        status: LogStatus,
    ) -> StorageResult<u64>;

    /// Gets a stored item by its source URL
    fn get_item_by_url(&self, url: &str) -> StorageResult<Option<ItemRecord>>;
}
