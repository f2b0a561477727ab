//! Sequential batch download with progress reporting.
//!
//! Items are independent: a failing item is logged, recorded and skipped,
//! and the batch always runs to completion. There is no retry and no
//! concurrency; the caller decides what to do with [`BatchReport::failed`].

use std::path::Path;

use serde::Serialize;
use tracing::{info, instrument, warn};

use super::client::{DownloadedFile, HttpClient};
use super::constants::BATCH_COMPLETE_MESSAGE;
use super::error::DownloadError;
use crate::media::MediaReference;
use crate::site::{SiteInfo, bare_filename};

/// One file to fetch: local name plus source URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DownloadItem {
    /// Name the local file is derived from.
    pub name: String,
    /// Source URL.
    pub url: String,
}

impl DownloadItem {
    /// Creates an item.
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
        }
    }

    /// Item for any directory entry: its access URL, named after the final
    /// path segment.
    #[must_use]
    pub fn for_entry(site: &SiteInfo, path: &str) -> Self {
        Self::new(bare_filename(path), site.access_url(path))
    }
}

impl From<&MediaReference> for DownloadItem {
    fn from(reference: &MediaReference) -> Self {
        Self::new(reference.name.clone(), reference.url.clone())
    }
}

/// An item that could not be downloaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailedItem {
    /// The item as requested.
    pub item: DownloadItem,
    /// Rendered error.
    pub error: String,
}

/// Outcome of a finished batch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchReport {
    written: Vec<DownloadedFile>,
    failed: Vec<FailedItem>,
}

impl BatchReport {
    /// Files written, in item order.
    #[must_use]
    pub fn written(&self) -> &[DownloadedFile] {
        &self.written
    }

    /// Items that failed, in item order.
    #[must_use]
    pub fn failed(&self) -> &[FailedItem] {
        &self.failed
    }

    /// Number of files written.
    #[must_use]
    pub fn completed_count(&self) -> usize {
        self.written.len()
    }

    /// Number of failed items.
    #[must_use]
    pub fn failed_count(&self) -> usize {
        self.failed.len()
    }

    /// Number of items processed.
    #[must_use]
    pub fn total(&self) -> usize {
        self.written.len() + self.failed.len()
    }

    /// Total bytes written across all files.
    #[must_use]
    pub fn bytes(&self) -> u64 {
        self.written.iter().map(|file| file.bytes).sum()
    }
}

/// Percentage of `done` out of `total`, clamped to 0..=100.
fn percent(done: usize, total: usize) -> u8 {
    if total == 0 {
        return 100;
    }
    u8::try_from(done.saturating_mul(100) / total).unwrap_or(100)
}

/// Downloads `items` one after another into `output_dir`.
///
/// `progress` receives `(percent, message)` before each item and a final
/// `(100, "Download complete")`. Returning the report is the completion
/// signal; it is reached even when every item failed.
///
/// # Errors
///
/// Returns [`DownloadError::Io`] only when `output_dir` cannot be created.
/// Per-item failures are recorded in the report instead.
#[instrument(
    skip(client, items, progress),
    fields(items = items.len(), dir = %output_dir.display())
)]
pub async fn download_batch<F>(
    client: &HttpClient,
    items: &[DownloadItem],
    output_dir: &Path,
    mut progress: F,
) -> Result<BatchReport, DownloadError>
where
    F: FnMut(u8, &str),
{
    tokio::fs::create_dir_all(output_dir)
        .await
        .map_err(|e| DownloadError::io(output_dir.to_path_buf(), e))?;

    let mut report = BatchReport::default();
    let total = items.len();

    for (index, item) in items.iter().enumerate() {
        progress(percent(index, total), &format!("Downloading {}...", item.name));

        match client.download_named(&item.url, output_dir, &item.name).await {
            Ok(file) => report.written.push(file),
            Err(error) => {
                warn!(
                    name = %item.name,
                    url = %item.url,
                    error = %error,
                    "download failed; skipping item"
                );
                report.failed.push(FailedItem {
                    item: item.clone(),
                    error: error.to_string(),
                });
            }
        }
    }

    progress(100, BATCH_COMPLETE_MESSAGE);
    info!(
        completed = report.completed_count(),
        failed = report.failed_count(),
        total = report.total(),
        "batch finished"
    );
    Ok(report)
}
