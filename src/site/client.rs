//! Network collaborator for the publishing site.
//!
//! Every request is a one-shot GET; nothing is cached between calls. State
//! discovered along the way is returned to the caller as immutable values
//! ([`SiteInfo`], [`Directory`], [`Session`]) instead of being kept here.

use reqwest::Client;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info, instrument};

use super::preview::{PreviewOptions, is_markdown, render_markdown};
use super::resolver::parse_site_info;
use super::{Directory, Session, SiteError, SiteInfo, UrlScheme};
use crate::http_client::{HttpTimeouts, build_http_client};
use crate::media::{MediaReference, extract_media};
use crate::user_agent;

/// Landing page that publishes `window.siteInfo`.
pub const DEFAULT_LANDING_URL: &str = "https://haokee-note.org/%E4%B8%BB%E9%A1%B5";

/// Default connect timeout for site requests (10 seconds).
pub const SITE_CONNECT_TIMEOUT_SECS: u64 = 10;

/// Default total timeout for site requests (30 seconds).
pub const SITE_READ_TIMEOUT_SECS: u64 = 30;

/// Construction options for [`SiteClient`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteClientConfig {
    /// Landing page scanned for site parameters.
    pub landing_url: String,
    /// Scheme applied to the content host once resolved.
    pub content_scheme: UrlScheme,
    /// Connect/total timeouts for every site request.
    pub timeouts: HttpTimeouts,
}

impl Default for SiteClientConfig {
    fn default() -> Self {
        Self {
            landing_url: DEFAULT_LANDING_URL.to_string(),
            content_scheme: UrlScheme::Https,
            timeouts: HttpTimeouts::new(SITE_CONNECT_TIMEOUT_SECS, SITE_READ_TIMEOUT_SECS),
        }
    }
}

/// A fetched document and the media it references.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DocumentView {
    /// Directory path of the document.
    pub path: String,
    /// Raw document text.
    pub text: String,
    /// Resolved media references in extraction order.
    pub media: Vec<MediaReference>,
}

impl DocumentView {
    /// Rendered HTML preview for markdown documents; `None` for other
    /// document types, which are previewed as raw text.
    #[must_use]
    pub fn render_html(&self, options: PreviewOptions) -> Option<String> {
        is_markdown(&self.path).then(|| render_markdown(&self.text, options))
    }
}

/// HTTP access to one publishing site.
#[derive(Debug, Clone)]
pub struct SiteClient {
    client: Client,
    landing_url: String,
    content_scheme: UrlScheme,
}

impl SiteClient {
    /// Creates a client.
    ///
    /// # Errors
    ///
    /// Returns [`SiteError::Fetch`] when the HTTP client cannot be built.
    pub fn new(config: SiteClientConfig) -> Result<Self, SiteError> {
        let client = build_http_client("site", user_agent::site_user_agent(), config.timeouts)
            .map_err(|error| SiteError::fetch(&config.landing_url, &error.to_string()))?;
        Ok(Self {
            client,
            landing_url: config.landing_url,
            content_scheme: config.content_scheme,
        })
    }

    /// Landing page this client resolves against.
    #[must_use]
    pub fn landing_url(&self) -> &str {
        &self.landing_url
    }

    /// Fetches the landing page and extracts the site parameters.
    ///
    /// # Errors
    ///
    /// Returns [`SiteError::Resolution`] when the page is unreachable, answers
    /// with a non-2xx status, or publishes no parseable `window.siteInfo`.
    #[instrument(skip(self), fields(url = %self.landing_url))]
    pub async fn resolve_site_info(&self) -> Result<SiteInfo, SiteError> {
        let url = self.landing_url.as_str();
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|error| {
                SiteError::resolution(url, &format!("landing page unreachable: {error}"))
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(SiteError::resolution(
                url,
                &format!("landing page returned HTTP {}", status.as_u16()),
            ));
        }

        let html = response.text().await.map_err(|error| {
            SiteError::resolution(url, &format!("landing page body could not be read: {error}"))
        })?;

        let site = parse_site_info(&html)
            .ok_or_else(|| {
                SiteError::resolution(
                    url,
                    "no inline script assigns a parseable window.siteInfo object",
                )
            })?
            .with_scheme(self.content_scheme);

        info!(id = site.id(), host = site.host(), "site info resolved");
        Ok(site)
    }

    /// Fetches the flat path → metadata directory.
    ///
    /// # Errors
    ///
    /// Returns [`SiteError::Fetch`] on network failure or non-2xx status and
    /// [`SiteError::Format`] when the body is not a JSON object.
    #[instrument(skip(self, site), fields(id = site.id(), host = site.host()))]
    pub async fn fetch_directory(&self, site: &SiteInfo) -> Result<Directory, SiteError> {
        let url = site.cache_url();
        let response = self.get(&url).await?;
        let body = response
            .bytes()
            .await
            .map_err(|error| SiteError::fetch(&url, &error.to_string()))?;

        let value: Value = serde_json::from_slice(&body)
            .map_err(|error| SiteError::format(&url, &format!("body is not JSON: {error}")))?;
        let entries = match value {
            Value::Object(entries) => entries,
            other => {
                return Err(SiteError::format(
                    &url,
                    &format!(
                        "expected a JSON object of path → metadata, got {}",
                        json_kind(&other)
                    ),
                ));
            }
        };

        let directory = Directory::from_entries(entries);
        info!(
            entries = directory.len(),
            filenames = directory.filename_index().len(),
            "directory fetched"
        );
        Ok(directory)
    }

    /// Resolves the site and fetches its directory.
    ///
    /// # Errors
    ///
    /// Propagates errors from [`resolve_site_info`](Self::resolve_site_info)
    /// and [`fetch_directory`](Self::fetch_directory).
    pub async fn open_session(&self) -> Result<Session, SiteError> {
        let site = self.resolve_site_info().await?;
        let directory = self.fetch_directory(&site).await?;
        Ok(Session::new(site, directory))
    }

    /// Fetches one document's raw text.
    ///
    /// # Errors
    ///
    /// Returns [`SiteError::Fetch`] on network failure, non-2xx status, or an
    /// unreadable body.
    #[instrument(skip(self, site), fields(path = %path))]
    pub async fn fetch_document(&self, site: &SiteInfo, path: &str) -> Result<String, SiteError> {
        let url = site.access_url(path);
        let response = self.get(&url).await?;
        let text = response
            .text()
            .await
            .map_err(|error| SiteError::fetch(&url, &error.to_string()))?;
        debug!(bytes = text.len(), "document fetched");
        Ok(text)
    }

    /// Fetches a document and extracts its media references.
    ///
    /// # Errors
    ///
    /// Returns the same errors as [`fetch_document`](Self::fetch_document).
    pub async fn fetch_document_media(
        &self,
        session: &Session,
        path: &str,
    ) -> Result<DocumentView, SiteError> {
        let text = self.fetch_document(session.site(), path).await?;
        let directory = session.directory();
        let media = extract_media(directory, directory.filename_index(), session.site(), &text);
        info!(path, media = media.len(), "document media extracted");
        Ok(DocumentView {
            path: path.to_string(),
            text,
            media,
        })
    }

    async fn get(&self, url: &str) -> Result<reqwest::Response, SiteError> {
        let response = self.client.get(url).send().await.map_err(|error| {
            if error.is_timeout() {
                SiteError::fetch(url, "request timed out")
            } else {
                SiteError::fetch(url, &error.to_string())
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(SiteError::http_status(url, status.as_u16()));
        }
        Ok(response)
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
