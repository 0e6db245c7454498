//! Scraper module for catalog fetching and extraction
//!
//! This module contains the core scraping logic:
//! - HTTP fetching with transport error classification
//! - List and detail page extraction
//! - Artifact downloading
//! - Page-range orchestration and resumption

mod controller;
mod download;
mod extract;
mod fetcher;

pub use controller::{resolve_start_page, scrape, Controller, ScrapeOptions};
pub use download::{artifact_filename, download_artifact, sanitize_title};
pub use extract::{
    build_artifact_url, extract_item_id, extract_screen_size, parse_catalog_page, Enrichment,
    EntryOutcome, ItemDraft, SCREEN_SIZE_UNKNOWN,
};
pub use fetcher::{build_http_client, fetch_bytes, fetch_page, FetchOutcome};
