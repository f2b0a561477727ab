//! Landing-page scan for the site's connection parameters.
//!
//! The landing page publishes its parameters as an inline script statement:
//!
//! ```text
//! <script>window.siteInfo={"uid":"7f88...","host":"publish-01.example.md", ...};</script>
//! ```
//!
//! This is an external contract outside our control, so the scan is kept
//! narrow: find the assignment prefix inside a `<script>` body, parse exactly
//! one JSON value after it, and stop at the first value that yields an
//! identifier and a host. Nothing here evaluates script.

use std::sync::LazyLock;

use regex::Regex;
use serde::Deserialize;
use tracing::debug;

use super::SiteInfo;
use crate::compile_static_regex;

static SCRIPT_RE: LazyLock<Regex> =
    LazyLock::new(|| compile_static_regex(r"(?is)<script\b[^>]*>(.*?)</script\s*>"));

static ASSIGNMENT_RE: LazyLock<Regex> =
    LazyLock::new(|| compile_static_regex(r"\bwindow\s*\.\s*siteInfo\s*=\s*"));

/// Shape of the published object. Older pages name the identifier `uid`.
#[derive(Debug, Deserialize)]
struct PublishedSiteInfo {
    id: Option<String>,
    uid: Option<String>,
    host: Option<String>,
}

impl PublishedSiteInfo {
    fn into_site_info(self) -> Option<SiteInfo> {
        let id = self.id.or(self.uid).filter(|value| !value.is_empty())?;
        let host = self.host.filter(|value| !value.is_empty())?;
        Some(SiteInfo::new(id, host))
    }
}

/// Extracts [`SiteInfo`] from landing-page HTML.
///
/// Returns the first `window.siteInfo = {...}` assignment found in an inline
/// script body whose JSON parses and carries a non-empty identifier and
/// host. Assignments that fail to parse are skipped.
#[must_use]
pub fn parse_site_info(html: &str) -> Option<SiteInfo> {
    for script in SCRIPT_RE.captures_iter(html) {
        let Some(body) = script.get(1) else {
            continue;
        };
        for assignment in ASSIGNMENT_RE.find_iter(body.as_str()) {
            let literal = &body.as_str()[assignment.end()..];
            // One JSON value only; whatever follows (`;`, more script) is ignored.
            let mut values = serde_json::Deserializer::from_str(literal)
                .into_iter::<PublishedSiteInfo>();
            match values.next() {
                Some(Ok(published)) => {
                    if let Some(site) = published.into_site_info() {
                        return Some(site);
                    }
                    debug!("siteInfo assignment lacks an identifier or host; continuing scan");
                }
                Some(Err(error)) => {
                    debug!(
                        error = %error,
                        "siteInfo assignment is not valid JSON; continuing scan"
                    );
                }
                None => {}
            }
        }
    }
    None
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_site_info_compact_assignment() {
        let html = r#"<html><head><script>window.siteInfo={"id":"abc123","host":"publish-01.example.md"};</script></head></html>"#;
        let site = parse_site_info(html).unwrap();
        assert_eq!(site.id(), "abc123");
        assert_eq!(site.host(), "publish-01.example.md");
    }

    #[test]
    fn test_parse_site_info_accepts_uid_field() {
        let html = r#"<script>window.siteInfo={"uid":"7f880cb3","host":"publish-01.example.md","status":"active"};</script>"#;
        let site = parse_site_info(html).unwrap();
        assert_eq!(site.id(), "7f880cb3");
    }

    #[test]
    fn test_parse_site_info_prefers_id_over_uid() {
        let html = r#"<script>window.siteInfo={"uid":"old","id":"new","host":"h.example"};</script>"#;
        assert_eq!(parse_site_info(html).unwrap().id(), "new");
    }

    #[test]
    fn test_parse_site_info_tolerates_whitespace() {
        let html = "<script type=\"text/javascript\">\n  window . siteInfo =\n    { \"id\" : \"abc\", \"host\" : \"h.example\" } ;\n</script>";
        let site = parse_site_info(html).unwrap();
        assert_eq!(site.id(), "abc");
        assert_eq!(site.host(), "h.example");
    }

    #[test]
    fn test_parse_site_info_semicolon_inside_string_value() {
        let html = r#"<script>window.siteInfo={"id":"abc","host":"h.example","title":"a; b}"};</script>"#;
        let site = parse_site_info(html).unwrap();
        assert_eq!(site.host(), "h.example");
    }

    #[test]
    fn test_parse_site_info_scans_past_unrelated_scripts() {
        let html = concat!(
            r#"<script src="/app.js"></script>"#,
            r#"<script>var x = 1;</script>"#,
            r#"<script>window.preloadPage=fetch("/x");window.siteInfo={"id":"abc","host":"h.example"};</script>"#,
        );
        assert_eq!(parse_site_info(html).unwrap().id(), "abc");
    }

    #[test]
    fn test_parse_site_info_uses_first_match_only() {
        let html = concat!(
            r#"<script>window.siteInfo={"id":"first","host":"one.example"};</script>"#,
            r#"<script>window.siteInfo={"id":"second","host":"two.example"};</script>"#,
        );
        let site = parse_site_info(html).unwrap();
        assert_eq!(site.id(), "first");
        assert_eq!(site.host(), "one.example");
    }

    #[test]
    fn test_parse_site_info_skips_malformed_assignment() {
        let html = concat!(
            r#"<script>window.siteInfo={broken;</script>"#,
            r#"<script>window.siteInfo={"id":"good","host":"h.example"};</script>"#,
        );
        assert_eq!(parse_site_info(html).unwrap().id(), "good");
    }

    #[test]
    fn test_parse_site_info_missing_host_is_not_a_match() {
        let html = r#"<script>window.siteInfo={"id":"abc"};</script>"#;
        assert!(parse_site_info(html).is_none());
    }

    #[test]
    fn test_parse_site_info_empty_id_is_not_a_match() {
        let html = r#"<script>window.siteInfo={"id":"","host":"h.example"};</script>"#;
        assert!(parse_site_info(html).is_none());
    }

    #[test]
    fn test_parse_site_info_keeps_values_verbatim() {
        let html = r#"<script>window.siteInfo={"id":" abc ","host":"h.example "};</script>"#;
        let site = parse_site_info(html).unwrap();
        assert_eq!(site.id(), " abc ");
        assert_eq!(site.host(), "h.example ");
    }

    #[test]
    fn test_parse_site_info_ignores_text_outside_scripts() {
        let html = r#"<p>window.siteInfo={"id":"abc","host":"h.example"};</p>"#;
        assert!(parse_site_info(html).is_none());
    }

    #[test]
    fn test_parse_site_info_no_scripts() {
        assert!(parse_site_info("<html><body>hello</body></html>").is_none());
    }

    #[test]
    fn test_parse_site_info_other_global_name_is_ignored() {
        let html = r#"<script>window.siteInfoExtra={"id":"abc","host":"h.example"};mywindow.siteInfo={"id":"x","host":"y"};</script>"#;
        assert!(parse_site_info(html).is_none());
    }
}
