//! Media download: streaming single files and sequential batches.
//!
//! # Features
//!
//! - Streaming downloads (memory-efficient for large video)
//! - Local names derived from reference names, reduced to one safe segment
//! - Configurable timeouts (30s connect, 5min total by default)
//! - Per-item failure isolation in batches, with progress callbacks
//!
//! # Example
//!
//! ```no_run
//! use vaultdl_core::download::{DownloadItem, HttpClient, download_batch};
//! use std::path::Path;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = HttpClient::new()?;
//! let items = vec![DownloadItem::new("a.png", "https://host/access/id/a.png")];
//! let report = download_batch(&client, &items, Path::new("./media"), |pct, msg| {
//!     println!("{pct:>3}% {msg}");
//! })
//! .await?;
//! println!("{} written, {} failed", report.completed_count(), report.failed_count());
//! # Ok(())
//! # }
//! ```

mod batch;
mod client;
mod constants;
mod error;
mod filename;

pub use batch::{BatchReport, DownloadItem, FailedItem, download_batch};
pub use client::{DownloadedFile, HttpClient};
pub use constants::{BATCH_COMPLETE_MESSAGE, CONNECT_TIMEOUT_SECS, READ_TIMEOUT_SECS};
pub use error::DownloadError;
pub use filename::{local_filename, output_path};

// Note: we do NOT define module-local Result aliases.
// Use `Result<T, DownloadError>` explicitly in function signatures.
