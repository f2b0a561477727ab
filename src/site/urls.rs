//! Content URL construction.
//!
//! Paths are percent-encoded one `/`-delimited segment at a time; the
//! separators themselves are never encoded.

use super::SiteInfo;

/// Percent-encodes each segment of `path`, keeping `/` separators literal.
#[must_use]
pub fn encode_path(path: &str) -> String {
    path.split('/')
        .map(|segment| urlencoding::encode(segment).into_owned())
        .collect::<Vec<_>>()
        .join("/")
}

impl SiteInfo {
    /// Base URL of the content host, e.g. `https://publish.example.net`.
    #[must_use]
    pub fn origin(&self) -> String {
        format!("{}://{}", self.scheme().as_str(), self.host())
    }

    /// Directory listing URL: `<origin>/cache/<id>`.
    #[must_use]
    pub fn cache_url(&self) -> String {
        format!("{}/cache/{}", self.origin(), self.id())
    }

    /// Downloadable URL for a directory path: `<origin>/access/<id>/<encoded path>`.
    #[must_use]
    pub fn access_url(&self, path: &str) -> String {
        format!("{}/access/{}/{}", self.origin(), self.id(), encode_path(path))
    }
}
