//! Error types for site operations.
//!
//! Messages follow the What/Why/Fix pattern used across the project.

use thiserror::Error;

/// Errors raised while talking to the publishing site.
#[derive(Debug, Clone, Error)]
pub enum SiteError {
    /// Site parameters could not be discovered. Fatal to the whole session.
    #[error("could not resolve site info from '{url}': {reason}\n  Suggestion: {suggestion}")]
    Resolution {
        /// Landing page URL that was scanned.
        url: String,
        /// Why resolution failed.
        reason: String,
        /// How to fix the issue.
        suggestion: String,
    },

    /// A directory or document request failed at the network or HTTP level.
    #[error("fetch failed for '{url}': {reason}\n  Suggestion: Check network connectivity and retry")]
    Fetch {
        /// Requested URL.
        url: String,
        /// Why the fetch failed.
        reason: String,
        /// HTTP status when the server answered with a non-2xx code.
        status: Option<u16>,
    },

    /// A response arrived but did not have the expected shape.
    #[error("unexpected response format from '{url}': {reason}")]
    Format {
        /// Requested URL.
        url: String,
        /// What was wrong with the body.
        reason: String,
    },
}

impl SiteError {
    /// Creates a `Resolution` error.
    #[must_use]
    pub fn resolution(url: &str, reason: &str) -> Self {
        Self::Resolution {
            url: url.to_string(),
            reason: reason.to_string(),
            suggestion: "Check that the landing page is reachable and still publishes window.siteInfo"
                .to_string(),
        }
    }

    /// Creates a `Fetch` error for a transport failure.
    #[must_use]
    pub fn fetch(url: &str, reason: &str) -> Self {
        Self::Fetch {
            url: url.to_string(),
            reason: reason.to_string(),
            status: None,
        }
    }

    /// Creates a `Fetch` error for a non-2xx response.
    #[must_use]
    pub fn http_status(url: &str, status: u16) -> Self {
        Self::Fetch {
            url: url.to_string(),
            reason: format!("server returned HTTP {status}"),
            status: Some(status),
        }
    }

    /// Creates a `Format` error.
    #[must_use]
    pub fn format(url: &str, reason: &str) -> Self {
        Self::Format {
            url: url.to_string(),
            reason: reason.to_string(),
        }
    }

    /// HTTP status carried by a `Fetch` error, if any.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Fetch { status, .. } => *status,
            _ => None,
        }
    }
}
