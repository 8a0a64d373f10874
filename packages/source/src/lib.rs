#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Remote dataset fetching for the fire map pipeline.
//!
//! Downloads the three upstream resources (incident CSV, ward boundary
//! `GeoJSON`, census population workbook) over HTTP with a fixed timeout.
//! There is deliberately no retry or backoff: the dashboard cannot render
//! without its data, so any fetch failure is fatal to startup.

pub mod csv_download;

pub use csv_download::download_csv;

use std::time::Duration;

/// Fixed timeout applied to every download request.
pub const FETCH_TIMEOUT: Duration = Duration::from_secs(30);

/// User agent sent with every download request.
const USER_AGENT: &str = "fire-map/1.0 (https://github.com/toronto-fire-map/fire-map)";

/// Errors that can occur while fetching remote datasets.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// An HTTP request failed or returned a non-success status.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Parsing the response body failed.
    #[error("Parse error: {0}")]
    Parse(String),

    /// CSV parsing failed.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

/// Builds the shared [`reqwest::Client`] with the fixed fetch timeout.
///
/// # Errors
///
/// Returns [`SourceError`] if the client cannot be built.
pub fn build_client() -> Result<reqwest::Client, SourceError> {
    reqwest::Client::builder()
        .user_agent(USER_AGENT)
        .timeout(FETCH_TIMEOUT)
        .build()
        .map_err(Into::into)
}

/// Downloads a resource and returns the raw response bytes.
///
/// # Errors
///
/// Returns [`SourceError`] on network failure or a non-success HTTP status.
pub async fn fetch_bytes(client: &reqwest::Client, url: &str) -> Result<Vec<u8>, SourceError> {
    let response = client.get(url).send().await?.error_for_status()?;
    let bytes = response.bytes().await?;

    log::debug!("Downloaded {} bytes from {url}", bytes.len());

    Ok(bytes.to_vec())
}

/// Downloads a resource and decodes it as UTF-8 text, replacing invalid
/// sequences rather than erroring (the boundary file host is known to serve
/// byte soup around the payload).
///
/// # Errors
///
/// Returns [`SourceError`] on network failure or a non-success HTTP status.
pub async fn fetch_text(client: &reqwest::Client, url: &str) -> Result<String, SourceError> {
    let bytes = fetch_bytes(client, url).await?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}
