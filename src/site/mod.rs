//! Publishing-site access: parameter discovery, directory listing and
//! document retrieval.
//!
//! # Architecture
//!
//! - [`SiteClient`] - Network collaborator; owns the HTTP client and landing URL
//! - [`SiteInfo`] - Site identifier and content host discovered from the landing page
//! - [`Directory`] - Flat path → metadata snapshot with its [`FilenameIndex`]
//! - [`Session`] - Immutable `SiteInfo` + `Directory` pair threaded through later calls
//! - [`DocumentTree`] - Nested view of the directory for browsing
//!
//! # Example
//!
//! ```no_run
//! use vaultdl_core::site::{SiteClient, SiteClientConfig};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = SiteClient::new(SiteClientConfig::default())?;
//! let session = client.open_session().await?;
//! let view = client.fetch_document_media(&session, "notes/index.md").await?;
//! println!("{} media reference(s)", view.media.len());
//! # Ok(())
//! # }
//! ```

mod client;
mod directory;
mod error;
mod preview;
mod resolver;
mod tree;
mod urls;

pub use client::{
    DEFAULT_LANDING_URL, DocumentView, SITE_CONNECT_TIMEOUT_SECS, SITE_READ_TIMEOUT_SECS,
    SiteClient, SiteClientConfig,
};
pub use directory::{Directory, FilenameIndex};
pub(crate) use directory::bare_filename;
pub use error::SiteError;
pub use preview::{PreviewOptions, render_markdown};
pub use resolver::parse_site_info;
pub use tree::{DocumentTree, TreeNode, TreeNodeKind, is_previewable};
pub use urls::encode_path;

use serde::Serialize;

/// URL scheme used for directory, document and media requests.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum UrlScheme {
    /// Production content hosts.
    #[default]
    Https,
    /// Plain HTTP, for local mock servers.
    Http,
}

impl UrlScheme {
    /// Returns the scheme as it appears before `://`.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Https => "https",
            Self::Http => "http",
        }
    }
}

/// Connection parameters published by the site's landing page.
///
/// Immutable once resolved; every directory, document and media URL is
/// derived from it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SiteInfo {
    id: String,
    host: String,
    #[serde(skip)]
    scheme: UrlScheme,
}

impl SiteInfo {
    /// Creates site info for the default `https` scheme.
    #[must_use]
    pub fn new(id: impl Into<String>, host: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            host: host.into(),
            scheme: UrlScheme::Https,
        }
    }

    /// Returns a copy that builds URLs with `scheme`.
    #[must_use]
    pub fn with_scheme(mut self, scheme: UrlScheme) -> Self {
        self.scheme = scheme;
        self
    }

    /// Opaque site identifier.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Content host (may include a port).
    #[must_use]
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Scheme used for content URLs.
    #[must_use]
    pub fn scheme(&self) -> UrlScheme {
        self.scheme
    }
}

/// Resolved site parameters and the directory fetched with them.
///
/// Built once by [`SiteClient::open_session`] and only ever read afterwards,
/// so it can be shared freely between concurrent document fetches.
#[derive(Debug, Clone)]
pub struct Session {
    site: SiteInfo,
    directory: Directory,
}

impl Session {
    /// Bundles already-resolved parts into a session.
    #[must_use]
    pub fn new(site: SiteInfo, directory: Directory) -> Self {
        Self { site, directory }
    }

    /// Site parameters.
    #[must_use]
    pub fn site(&self) -> &SiteInfo {
        &self.site
    }

    /// Directory snapshot.
    #[must_use]
    pub fn directory(&self) -> &Directory {
        &self.directory
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_site_info_defaults_to_https() {
        let site = SiteInfo::new("abc", "publish.example.net");
        assert_eq!(site.scheme(), UrlScheme::Https);
        assert_eq!(site.scheme().as_str(), "https");
    }

    #[test]
    fn test_site_info_with_scheme_keeps_id_and_host() {
        let site = SiteInfo::new("abc", "127.0.0.1:8080").with_scheme(UrlScheme::Http);
        assert_eq!(site.id(), "abc");
        assert_eq!(site.host(), "127.0.0.1:8080");
        assert_eq!(site.scheme().as_str(), "http");
    }

    #[test]
    fn test_site_info_serializes_without_scheme() {
        let site = SiteInfo::new("abc", "publish.example.net");
        let json = serde_json::to_string(&site).unwrap();
        assert_eq!(json, r#"{"id":"abc","host":"publish.example.net"}"#);
    }
}
