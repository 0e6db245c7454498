//! HTML extraction for catalog list and detail pages
//!
//! All functions here are pure over the HTML text: parsing happens inside
//! the function and nothing borrowed from the document escapes, so no
//! document state ever crosses an await point in the caller.
//!
//! List-page extraction is per-entry fault tolerant: an entry missing any
//! required sub-field is reported as a skip and never aborts the page.

use scraper::{ElementRef, Html, Selector};
use url::Url;

/// Sentinel screen size used when the detail page yields nothing
pub const SCREEN_SIZE_UNKNOWN: &str = "unknown";

/// An item as extracted from a list page, before detail enrichment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemDraft {
    pub title: String,
    /// Absolute source URL, resolved against the catalog base
    pub url: String,
    pub image_url: String,
    pub category: String,
    pub size: String,
}

/// Outcome of extracting one candidate entry node
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryOutcome {
    Parsed(ItemDraft),
    Skipped { reason: String },
}

/// Fields obtained (or degraded to) during detail enrichment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Enrichment {
    pub screen_size: String,
    pub artifact_url: Option<String>,
}

impl Enrichment {
    /// Fallback used when the detail fetch or parse fails entirely
    pub fn degraded() -> Self {
        Self {
            screen_size: SCREEN_SIZE_UNKNOWN.to_string(),
            artifact_url: None,
        }
    }
}

/// Extracts all candidate entries from a catalog list page
///
/// # Arguments
///
/// * `html` - The list-page HTML
/// * `base_url` - The catalog base URL, for resolving relative item links
///
/// # Returns
///
/// One EntryOutcome per candidate entry node, in document order. A page
/// with no entry nodes (including an error page) yields an empty vec.
pub fn parse_catalog_page(html: &str, base_url: &Url) -> Vec<EntryOutcome> {
    let document = Html::parse_document(html);

    let entry_selector = match Selector::parse("ul.prd-details li") {
        Ok(sel) => sel,
        Err(_) => return Vec::new(),
    };

    document
        .select(&entry_selector)
        .map(|entry| parse_entry(entry, base_url))
        .collect()
}

/// Extracts the required sub-fields from a single entry node
fn parse_entry(entry: ElementRef, base_url: &Url) -> EntryOutcome {
    let title = match select_text(entry, "h3.title") {
        Some(t) => t,
        None => return skip("missing title"),
    };

    let href = match select_attr(entry, "a[title]", "href") {
        Some(h) => h,
        None => return skip("missing item link"),
    };

    let image_url = match select_attr(entry, "img.photoThumb", "src") {
        Some(src) => src,
        None => return skip("missing thumbnail"),
    };

    let category = match select_text(entry, ".id-num a") {
        Some(c) => c,
        None => return skip("missing category"),
    };

    let size = match select_text(entry, ".fsize") {
        Some(s) => s,
        None => return skip("missing size label"),
    };

    let url = match base_url.join(&href) {
        Ok(u) => u.to_string(),
        Err(_) => return skip("unresolvable item link"),
    };

    EntryOutcome::Parsed(ItemDraft {
        title,
        url,
        image_url,
        category,
        size,
    })
}

fn skip(reason: &str) -> EntryOutcome {
    EntryOutcome::Skipped {
        reason: reason.to_string(),
    }
}

/// Returns the trimmed text of the first element matching `selector`
fn select_text(scope: ElementRef, selector: &str) -> Option<String> {
    let sel = Selector::parse(selector).ok()?;
    scope
        .select(&sel)
        .next()
        .map(|el| el.text().collect::<String>().trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Returns an attribute of the first element matching `selector`
fn select_attr(scope: ElementRef, selector: &str, attr: &str) -> Option<String> {
    let sel = Selector::parse(selector).ok()?;
    scope
        .select(&sel)
        .next()
        .and_then(|el| el.value().attr(attr))
        .map(|v| v.to_string())
        .filter(|s| !s.is_empty())
}

/// Extracts the screen size from a detail page
///
/// Scans the `.prd-meta` metadata block for a `<dt>` labeled "Screen" and
/// returns the text of the following `<dd>`. Returns None when the block or
/// field is missing; callers substitute the sentinel.
pub fn extract_screen_size(html: &str) -> Option<String> {
    let document = Html::parse_document(html);
    let dt_selector = Selector::parse(".prd-meta dt").ok()?;

    for dt in document.select(&dt_selector) {
        let label = dt.text().collect::<String>();
        if !label.contains("Screen") {
            continue;
        }

        return dt
            .next_siblings()
            .filter_map(ElementRef::wrap)
            .find(|el| el.value().name() == "dd")
            .map(|dd| dd.text().collect::<String>().trim().to_string())
            .filter(|s| !s.is_empty());
    }

    None
}

/// Extracts the item identifier from a source URL's `id` query parameter
pub fn extract_item_id(url: &Url) -> Option<String> {
    url.query_pairs()
        .find(|(key, _)| key == "id")
        .map(|(_, value)| value.into_owned())
        .filter(|id| !id.is_empty())
}

/// Builds the artifact download URL for an item identifier
///
/// The catalog serves downloads from a fixed endpoint parameterized by the
/// item id.
pub fn build_artifact_url(base_url: &Url, item_id: &str) -> String {
    format!("{}?p=download-item&id={}&tt=181", base_url, item_id)
}
