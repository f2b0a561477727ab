//! Scanners for the two embedded-media syntaxes.
//!
//! Both patterns are single-line and shortest-match, so a stray `]]` or `)`
//! later in the document never widens an earlier match.

use std::borrow::Cow;
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;
use url::Url;

use crate::compile_static_regex;
use crate::site::bare_filename;

/// `![[inner]]`
static EMBED_RE: LazyLock<Regex> = LazyLock::new(|| compile_static_regex(r"!\[\[(.*?)\]\]"));

/// `![alt](target)`
static IMAGE_MARKUP_RE: LazyLock<Regex> =
    LazyLock::new(|| compile_static_regex(r"!\[.*?\]\((.*?)\)"));

/// Markup form a reference was written in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LinkSyntax {
    /// `![[name]]` or `![[name|alias]]`
    Embed,
    /// `![alt](target)`
    ImageMarkup,
}

/// A raw filename pulled out of markup, before resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct LinkCandidate {
    pub(crate) name: String,
    pub(crate) syntax: LinkSyntax,
}

/// Raw filenames from every `![[...]]` embed, in document order.
///
/// Alias text after the first `|` is discarded.
pub(crate) fn embed_candidates(text: &str) -> impl Iterator<Item = LinkCandidate> + '_ {
    EMBED_RE.captures_iter(text).filter_map(|caps| {
        let inner = caps.get(1)?.as_str();
        let name = inner.split_once('|').map_or(inner, |(name, _alias)| name);
        Some(LinkCandidate {
            name: name.to_string(),
            syntax: LinkSyntax::Embed,
        })
    })
}

/// Raw filenames from every site-relative `![alt](target)`, in document order.
///
/// Absolute targets are skipped. Relative targets are percent-decoded and
/// reduced to their final path segment.
pub(crate) fn image_markup_candidates(text: &str) -> impl Iterator<Item = LinkCandidate> + '_ {
    IMAGE_MARKUP_RE.captures_iter(text).filter_map(|caps| {
        let target = caps.get(1)?.as_str().trim();
        if is_absolute_target(target) {
            return None;
        }
        let decoded = percent_decode_lossy(target);
        Some(LinkCandidate {
            name: bare_filename(&decoded).to_string(),
            syntax: LinkSyntax::ImageMarkup,
        })
    })
}

/// True for targets carrying a URL scheme (`http:`, `https:`, `data:`, ...).
fn is_absolute_target(target: &str) -> bool {
    Url::parse(target).is_ok()
}

/// Decodes `%XX` escapes; text that does not decode to UTF-8 is kept raw.
fn percent_decode_lossy(target: &str) -> Cow<'_, str> {
    urlencoding::decode(target).unwrap_or(Cow::Borrowed(target))
}
