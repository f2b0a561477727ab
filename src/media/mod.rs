//! Media reference extraction and resolution.
//!
//! A document body is scanned twice: first for `![[name|alias]]` embeds,
//! then for `![alt](target)` image markup. Each raw filename is resolved
//! against the [`Directory`]: exact path first, then the [`FilenameIndex`]
//! by bare filename. Anything that does not resolve (external URLs, notes
//! that were never published, typos) is dropped without error, since
//! document bodies are untrusted content full of such references.
//!
//! Extraction is a pure function of its inputs and touches no shared state.

mod links;

pub use links::LinkSyntax;

use std::fmt;

use serde::Serialize;

use crate::site::{Directory, FilenameIndex, SiteInfo, bare_filename};
use links::{LinkCandidate, embed_candidates, image_markup_candidates};

/// Coarse media classification by file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    /// jpg, jpeg, png, gif, bmp, webp, svg
    Image,
    /// mp3, wav, ogg, m4a
    Audio,
    /// mp4, webm, mov
    Video,
    /// Anything else, including names without an extension.
    Unknown,
}

impl MediaType {
    /// Classifies `filename` by the text after its last `.`, ignoring case.
    ///
    /// No content sniffing: a mislabeled extension yields a wrong but
    /// deterministic answer.
    #[must_use]
    pub fn from_filename(filename: &str) -> Self {
        let Some((_, ext)) = bare_filename(filename).rsplit_once('.') else {
            return Self::Unknown;
        };
        match ext.to_ascii_lowercase().as_str() {
            "jpg" | "jpeg" | "png" | "gif" | "bmp" | "webp" | "svg" => Self::Image,
            "mp3" | "wav" | "ogg" | "m4a" => Self::Audio,
            "mp4" | "webm" | "mov" => Self::Video,
            _ => Self::Unknown,
        }
    }

    /// Returns the stable lowercase label.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Image => "image",
            Self::Audio => "audio",
            Self::Video => "video",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One resolved media reference found in a document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MediaReference {
    /// Filename as written in the markup (decoded for image markup).
    pub name: String,
    /// Directory path the name resolved to.
    pub path: String,
    /// Downloadable access URL for `path`.
    pub url: String,
    /// Classification of `name`.
    pub media_type: MediaType,
    /// Markup form the reference came from.
    pub syntax: LinkSyntax,
}

/// Extracts and resolves every media reference in `text`.
///
/// Embed references come first, then image markup, each in document order.
/// Unresolvable references are omitted; a document without references
/// yields an empty vector.
#[must_use]
pub fn extract_media(
    directory: &Directory,
    index: &FilenameIndex,
    site: &SiteInfo,
    text: &str,
) -> Vec<MediaReference> {
    embed_candidates(text)
        .chain(image_markup_candidates(text))
        .filter_map(|candidate| resolve_candidate(directory, index, site, candidate))
        .collect()
}

/// Resolves a raw filename to a directory path.
///
/// Exact key first (the name may already be a full path), then the bare
/// filename through the index.
#[must_use]
pub fn resolve_path<'a>(
    directory: &'a Directory,
    index: &'a FilenameIndex,
    name: &'a str,
) -> Option<&'a str> {
    if directory.contains(name) {
        return Some(name);
    }
    index.get(bare_filename(name))
}

fn resolve_candidate(
    directory: &Directory,
    index: &FilenameIndex,
    site: &SiteInfo,
    candidate: LinkCandidate,
) -> Option<MediaReference> {
    let path = resolve_path(directory, index, &candidate.name)?.to_string();
    let url = site.access_url(&path);
    let media_type = MediaType::from_filename(&candidate.name);
    Some(MediaReference {
        name: candidate.name,
        path,
        url,
        media_type,
        syntax: candidate.syntax,
    })
}
