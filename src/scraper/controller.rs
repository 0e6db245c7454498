//! Crawl controller - page-range orchestration
//!
//! The controller iterates an inclusive page range, one page at a time:
//! fetch the list page, extract entries, enrich each from its detail page,
//! optionally download the artifact, then commit the batch plus a log row.
//! Item-level failures are contained at the item boundary and page-level
//! failures at the page boundary; the run only stops when the range is
//! exhausted. Pages without a `success` log row are picked up again by the
//! next run, which is the retry mechanism.

use crate::config::Config;
use crate::scraper::download::download_artifact;
use crate::scraper::extract::{
    build_artifact_url, extract_item_id, extract_screen_size, parse_catalog_page, Enrichment,
    EntryOutcome, ItemDraft, SCREEN_SIZE_UNKNOWN,
};
use crate::scraper::fetcher::{build_http_client, fetch_page, FetchOutcome};
use crate::storage::{CatalogStore, ItemRecord, SqliteStorage, StorageResult};
use crate::JarhoundError;
use reqwest::Client;
use std::path::{Path, PathBuf};
use std::time::Duration;
use url::Url;

/// Runtime options supplied on the command line
#[derive(Debug, Clone, Default)]
pub struct ScrapeOptions {
    /// Download artifacts while scraping
    pub download: bool,
    /// Explicit start page; None resumes from the crawl log
    pub start_page: Option<u32>,
    /// Explicit end page; None uses the configured catalog upper bound
    pub end_page: Option<u32>,
}

/// Resolves the first page to process
///
/// An explicit start page wins; otherwise the resume point is one past the
/// highest page with a recorded success. Page numbers start at 1: a zero
/// would collide with the "no successes yet" sentinel in the crawl log.
pub fn resolve_start_page(
    explicit: Option<u32>,
    store: &impl CatalogStore,
) -> StorageResult<u32> {
    match explicit {
        Some(page) => Ok(page.max(1)),
        None => Ok(store.last_successful_page()? + 1),
    }
}

/// Main scraper orchestration structure
pub struct Controller {
    config: Config,
    options: ScrapeOptions,
    base_url: Url,
    download_dir: PathBuf,
    storage: SqliteStorage,
    client: Client,
}

impl Controller {
    /// Creates a new controller instance
    ///
    /// Opens the database, builds the HTTP client, and creates the download
    /// directory when downloading is enabled.
    pub fn new(config: Config, options: ScrapeOptions) -> Result<Self, JarhoundError> {
        let base_url = Url::parse(&config.catalog.base_url)?;
        let storage = SqliteStorage::new(Path::new(&config.output.database_path))?;
        let client = build_http_client(&config.http)?;

        let download_dir = PathBuf::from(&config.output.download_dir);
        if options.download {
            std::fs::create_dir_all(&download_dir)?;
        }

        Ok(Self {
            config,
            options,
            base_url,
            download_dir,
            storage,
            client,
        })
    }

    /// Runs the scrape over the resolved page range
    pub async fn run(&mut self) -> Result<(), JarhoundError> {
        let start = resolve_start_page(self.options.start_page, &self.storage)?;
        let end = self
            .options
            .end_page
            .unwrap_or(self.config.catalog.default_end_page);

        tracing::info!("Scraping pages {}..={}", start, end);

        for page in start..=end {
            self.process_page(page).await;
            self.pause().await;
        }

        tracing::info!("Page range exhausted, scrape complete");
        Ok(())
    }

    /// Processes one catalog page end to end
    ///
    /// Never returns an error: a list-fetch transport failure leaves no
    /// store record (the page is retried on a future run), and a commit
    /// failure is recorded by the store's own error log row.
    async fn process_page(&mut self, page: u32) {
        tracing::info!("Scraping page {}...", page);
        let page_url = format!("{}?page={}", self.base_url, page);

        let body = match fetch_page(&self.client, &page_url).await {
            FetchOutcome::Success { status_code, body } => {
                if !(200..300).contains(&status_code) {
                    tracing::debug!(
                        "Page {} answered HTTP {}; body handed to extraction anyway",
                        page,
                        status_code
                    );
                }
                body
            }
            FetchOutcome::TransportError { error } => {
                tracing::error!("Error on page {}: {}", page, error);
                return;
            }
        };

        let outcomes = parse_catalog_page(&body, &self.base_url);
        let mut items = Vec::new();
        let mut skipped = 0;

        for outcome in outcomes {
            match outcome {
                EntryOutcome::Parsed(draft) => {
                    let item = self.enrich_item(draft).await;
                    items.push(item);
                    self.pause().await;
                }
                EntryOutcome::Skipped { reason } => {
                    skipped += 1;
                    tracing::warn!("Page {}: skipping entry: {}", page, reason);
                }
            }
        }

        match self.storage.commit_page(page, &items) {
            Ok(inserted) => tracing::info!(
                "Page {}: {} extracted, {} skipped, {} newly stored",
                page,
                items.len(),
                skipped,
                inserted
            ),
            Err(e) => tracing::error!("Page {}: commit failed: {}", page, e),
        }
    }

    /// Enriches one list entry from its detail page, downloading if enabled
    async fn enrich_item(&self, draft: ItemDraft) -> ItemRecord {
        tracing::debug!("Getting details for: {}", draft.title);
        let enrichment = self.fetch_enrichment(&draft.url).await;

        let local_name = match (self.options.download, &enrichment.artifact_url) {
            (true, Some(artifact_url)) => {
                download_artifact(
                    &self.client,
                    artifact_url,
                    &draft.title,
                    &enrichment.screen_size,
                    &self.download_dir,
                )
                .await
            }
            _ => None,
        };

        ItemRecord {
            title: draft.title,
            url: draft.url,
            image_url: draft.image_url,
            category: draft.category,
            size: draft.size,
            screen_size: enrichment.screen_size,
            game_file_url: enrichment.artifact_url,
            local_name,
        }
    }

    /// Fetches the detail page and extracts enrichment fields
    ///
    /// Transport failure degrades to the sentinel screen size and a null
    /// artifact URL; a missing `id` query parameter only nulls the artifact
    /// URL, the screen size is still extracted.
    async fn fetch_enrichment(&self, source_url: &str) -> Enrichment {
        let parsed = match Url::parse(source_url) {
            Ok(url) => url,
            Err(_) => return Enrichment::degraded(),
        };
        let item_id = extract_item_id(&parsed);

        match fetch_page(&self.client, source_url).await {
            FetchOutcome::Success { status_code, body } => {
                if !(200..300).contains(&status_code) {
                    tracing::debug!("Detail page {} answered HTTP {}", source_url, status_code);
                }
                let screen_size = extract_screen_size(&body)
                    .unwrap_or_else(|| SCREEN_SIZE_UNKNOWN.to_string());
                let artifact_url = item_id.map(|id| build_artifact_url(&self.base_url, &id));
                Enrichment {
                    screen_size,
                    artifact_url,
                }
            }
            FetchOutcome::TransportError { error } => {
                tracing::warn!("Error getting details for {}: {}", source_url, error);
                Enrichment::degraded()
            }
        }
    }

    /// Fixed inter-request delay, the sole rate-limiting mechanism
    async fn pause(&self) {
        tokio::time::sleep(Duration::from_millis(self.config.catalog.request_delay_ms)).await;
    }
}

/// Runs a complete scrape with the given configuration and options
pub async fn scrape(config: Config, options: ScrapeOptions) -> Result<(), JarhoundError> {
    let mut controller = Controller::new(config, options)?;
    controller.run().await
}
