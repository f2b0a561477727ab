//! Shared User-Agent strings for site and download HTTP clients.
//!
//! Publishing hosts reject requests that do not look like a browser, so both
//! clients present the same browser identity.

/// Browser User-Agent sent with every request.
pub const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
    AppleWebKit/537.36 (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36";

/// User-Agent for landing page, directory and document requests.
#[must_use]
pub(crate) fn site_user_agent() -> &'static str {
    BROWSER_USER_AGENT
}

/// User-Agent for media downloads.
#[must_use]
pub(crate) fn download_user_agent() -> &'static str {
    BROWSER_USER_AGENT
}
