//! vaultdl core library
//!
//! Browses a published notes site, resolves the media a document embeds and
//! downloads it.
//!
//! # Architecture
//!
//! - [`site`] - landing-page resolution, directory listing, document fetch
//! - [`media`] - media reference extraction and path resolution
//! - [`download`] - streaming downloads and sequential batches
//! - [`http_client`] - shared reqwest client construction

// Clippy lints - strict for library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

use regex::Regex;

pub mod download;
pub mod http_client;
pub mod media;
pub mod site;
mod user_agent;

// Re-export commonly used types
pub use download::{BatchReport, DownloadError, DownloadItem, HttpClient, download_batch};
pub use media::{LinkSyntax, MediaReference, MediaType, extract_media, resolve_path};
pub use site::{
    Directory, DocumentTree, DocumentView, FilenameIndex, Session, SiteClient, SiteClientConfig,
    SiteError, SiteInfo, UrlScheme,
};

/// Compiles a regex literal that is known to be valid.
///
/// # Panics
///
/// Panics if `pattern` is not a valid regex; only used for static patterns.
pub(crate) fn compile_static_regex(pattern: &str) -> Regex {
    Regex::new(pattern).unwrap_or_else(|e| panic!("invalid static regex '{pattern}': {e}"))
}
