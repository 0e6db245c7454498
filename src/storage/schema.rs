//! Database schema definitions
//!
//! This module contains the SQL schema for the Jarhound database.

/// SQL schema for the database
pub const SCHEMA_SQL: &str = r#"
-- Catalog items, deduplicated by source URL
CREATE TABLE IF NOT EXISTS items (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    title TEXT NOT NULL,
    url TEXT UNIQUE NOT NULL,
    image_url TEXT,
    category TEXT,
    size TEXT,
    screen_size TEXT,
    game_file_url TEXT,
    local_name TEXT,
    created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP
);

CREATE INDEX IF NOT EXISTS idx_items_url ON items(url);

-- Append-only log of page-processing attempts
CREATE TABLE IF NOT EXISTS crawl_log (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    page_number INTEGER,
    status TEXT,
    message TEXT,
    scraped_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP
);

CREATE INDEX IF NOT EXISTS idx_crawl_log_page ON crawl_log(page_number, status);
"#;

/// Initializes the database schema
///
/// Safe to call on every open; all statements are `IF NOT EXISTS`.
pub fn initialize_schema(conn: &rusqlite::Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(SCHEMA_SQL)?;
    Ok(())
}
