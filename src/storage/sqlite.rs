//! SQLite storage implementation
//!
//! This module provides the SQLite-based implementation of the CatalogStore
//! trait. Each page commit is a short-lived transaction; no transaction is
//! held open across pages, so a killed process always leaves the resume
//! point consistent with the item rows on disk.

use crate::storage::schema::initialize_schema;
use crate::storage::traits::{CatalogStore, StorageResult};
use crate::storage::{ItemRecord, LogStatus};
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;

/// SQLite storage backend
pub struct SqliteStorage {
    conn: Connection,
}

impl SqliteStorage {
    /// Creates a new SqliteStorage instance
    ///
    /// Opens (or creates) the database file and ensures the schema exists.
    pub fn new(path: &Path) -> StorageResult<Self> {
        let conn = Connection::open(path)?;

        // Configure SQLite for better performance
        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            PRAGMA foreign_keys = ON;
            PRAGMA temp_store = MEMORY;
        ",
        )?;

        initialize_schema(&conn)?;

        Ok(Self { conn })
    }

    /// Creates an in-memory database (for testing)
    pub fn new_in_memory() -> StorageResult<Self> {
        let conn = Connection::open_in_memory()?;
        initialize_schema(&conn)?;
        Ok(Self { conn })
    }

    /// Runs the item batch and its success log row in one transaction
    fn commit_page_tx(
        conn: &mut Connection,
        page_number: u32,
        items: &[ItemRecord],
    ) -> Result<usize, rusqlite::Error> {
        let tx = conn.transaction()?;
        let mut inserted = 0;

        {
            let mut stmt = tx.prepare(
                "INSERT OR IGNORE INTO items
                 (title, url, image_url, category, size, screen_size, game_file_url, local_name)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            )?;

            for item in items {
                inserted += stmt.execute(params![
                    item.title,
                    item.url,
                    item.image_url,
                    item.category,
                    item.size,
                    item.screen_size,
                    item.game_file_url,
                    item.local_name,
                ])?;
            }
        }

        tx.execute(
            "INSERT INTO crawl_log (page_number, status, message) VALUES (?1, ?2, ?3)",
            params![
                page_number,
                LogStatus::Success.to_db_string(),
                format!("Scraped {} items", items.len()),
            ],
        )?;

        tx.commit()?;
        Ok(inserted)
    }

    fn row_to_item(row: &rusqlite::Row<'_>) -> rusqlite::Result<ItemRecord> {
        Ok(ItemRecord {
            title: row.get(0)?,
            url: row.get(1)?,
            image_url: row.get(2)?,
            category: row.get(3)?,
            size: row.get(4)?,
            screen_size: row.get(5)?,
            game_file_url: row.get(6)?,
            local_name: row.get(7)?,
        })
    }
}

impl CatalogStore for SqliteStorage {
    fn commit_page(&mut self, page_number: u32, items: &[ItemRecord]) -> StorageResult<usize> {
        match Self::commit_page_tx(&mut self.conn, page_number, items) {
            Ok(inserted) => Ok(inserted),
            Err(e) => {
                // The failed transaction rolled back on drop; the error row
                // is committed on its own so the attempt stays visible.
                let message = e.to_string();
                self.append_log(page_number, LogStatus::Error, &message)?;
                Err(e.into())
            }
        }
    }

    fn append_log(
        &mut self,
        page_number: u32,
        status: LogStatus,
        message: &str,
    ) -> StorageResult<()> {
        self.conn.execute(
            "INSERT INTO crawl_log (page_number, status, message) VALUES (?1, ?2, ?3)",
            params![page_number, status.to_db_string(), message],
        )?;
        Ok(())
    }

    fn last_successful_page(&self) -> StorageResult<u32> {
        let max: Option<u32> = self
            .conn
            .query_row(
                "SELECT MAX(page_number) FROM crawl_log WHERE status = ?1",
                params![LogStatus::Success.to_db_string()],
                |row| row.get(0),
            )
            .optional()?
            .flatten();

        Ok(max.unwrap_or(0))
    }

    fn count_items(&self) -> StorageResult<u64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM items", [], |row| row.get(0))?;
        Ok(count as u64)
    }

    fn count_log_entries(&self, status: LogStatus) -> StorageResult<u64> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM crawl_log WHERE status = ?1",
            params![status.to_db_string()],
            |row| row.get(0),
        )?;
        Ok(count as u64)
    }

    fn count_log_entries_for_page(
        &self,
        page_number: u32,
        status: LogStatus,
    ) -> StorageResult<u64> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM crawl_log WHERE page_number = ?1 AND status = ?2",
            params![page_number, status.to_db_string()],
            |row| row.get(0),
        )?;
        Ok(count as u64)
    }

    fn get_item_by_url(&self, url: &str) -> StorageResult<Option<ItemRecord>> {
        let item = self
            .conn
            .query_row(
                "SELECT title, url, image_url, category, size, screen_size, game_file_url, local_name
                 FROM items WHERE url = ?1",
                params![url],
                Self::row_to_item,
            )
            .optional()?;

        Ok(item)
    }
}
