//! Artifact downloading
//!
//! Fetches an item's binary artifact and writes it under the download
//! directory with a filesystem-safe name derived from the item title and
//! screen size. All failures degrade to an absent local name; nothing here
//! propagates past the item boundary.

use crate::scraper::fetcher::fetch_bytes;
use reqwest::Client;
use std::path::Path;

/// File extension for downloaded artifacts
const ARTIFACT_EXT: &str = "jar";

/// Strips a title down to a filesystem-safe stem
///
/// Characters outside alphanumerics, underscore, whitespace, and hyphen are
/// removed; whitespace runs collapse to single hyphens.
pub fn sanitize_title(title: &str) -> String {
    let stripped: String = title
        .chars()
        .filter(|c| c.is_alphanumeric() || *c == '_' || *c == '-' || c.is_whitespace())
        .collect();

    stripped.split_whitespace().collect::<Vec<_>>().join("-")
}

/// Derives the artifact filename for an item
pub fn artifact_filename(title: &str, screen_size: &str) -> String {
    format!(
        "{}-{}.{}",
        sanitize_title(title),
        screen_size,
        ARTIFACT_EXT
    )
}

/// Downloads an artifact and writes it into `download_dir`
///
/// # Arguments
///
/// * `client` - The HTTP client to use
/// * `artifact_url` - The download URL
/// * `title` - The item title, used to derive the filename
/// * `screen_size` - The screen-size label appended to the filename
/// * `download_dir` - Directory the file is written into
///
/// # Returns
///
/// The filename on success, or None on any transport or filesystem error.
/// An existing file with the same derived name is overwritten silently.
pub async fn download_artifact(
    client: &Client,
    artifact_url: &str,
    title: &str,
    screen_size: &str,
    download_dir: &Path,
) -> Option<String> {
    let bytes = match fetch_bytes(client, artifact_url).await {
        Ok(bytes) => bytes,
        Err(e) => {
            tracing::warn!("Error downloading {}: {}", title, e);
            return None;
        }
    };

    let filename = artifact_filename(title, screen_size);
    let filepath = download_dir.join(&filename);

    if let Err(e) = tokio::fs::write(&filepath, &bytes).await {
        tracing::warn!("Error writing {}: {}", filepath.display(), e);
        return None;
    }

    tracing::debug!("Saved artifact {} ({} bytes)", filename, bytes.len());
    Some(filename)
}
