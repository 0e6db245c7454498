//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the scraper:
//! - Building the HTTP client with the configured User-Agent
//! - GET requests for list and detail pages
//! - Binary GET requests for artifact downloads
//! - Transport error classification
//!
//! Non-2xx responses are deliberately not treated as transport errors: the
//! body is handed to the extraction layer, which yields zero entries (or
//! missing-field skips) for an error page.

use crate::config::HttpConfig;
use reqwest::Client;
use std::time::Duration;

/// Result of a page fetch
#[derive(Debug)]
pub enum FetchOutcome {
    /// The server answered; the body may still be an error page
    Success {
        /// HTTP status code
        status_code: u16,
        /// Response body
        body: String,
    },

    /// Network-level failure (connection refused, timeout, etc.)
    TransportError {
        /// Error description
        error: String,
    },
}

/// Builds the HTTP client used for every request
pub fn build_http_client(config: &HttpConfig) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(&config.user_agent)
        .timeout(Duration::from_secs(30))
        .connect_timeout(Duration::from_secs(10))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetches a URL and returns the body as text
///
/// # Arguments
///
/// * `client` - The HTTP client to use
/// * `url` - The URL to fetch
///
/// # Returns
///
/// A FetchOutcome carrying either the body or a classified transport error
pub async fn fetch_page(client: &Client, url: &str) -> FetchOutcome {
    match client.get(url).send().await {
        Ok(response) => {
            let status_code = response.status().as_u16();
            match response.text().await {
                Ok(body) => FetchOutcome::Success { status_code, body },
                Err(e) => FetchOutcome::TransportError {
                    error: classify_error(&e),
                },
            }
        }
        Err(e) => FetchOutcome::TransportError {
            error: classify_error(&e),
        },
    }
}

/// Fetches a URL and returns the raw body bytes
///
/// Used for artifact downloads, where the body is binary content.
pub async fn fetch_bytes(client: &Client, url: &str) -> Result<Vec<u8>, reqwest::Error> {
    let response = client.get(url).send().await?;
    Ok(response.bytes().await?.to_vec())
}

/// Maps a reqwest error to a short human-readable description
fn classify_error(e: &reqwest::Error) -> String {
    if e.is_timeout() {
        "Request timeout".to_string()
    } else if e.is_connect() {
        "Connection refused".to_string()
    } else {
        e.to_string()
    }
}
