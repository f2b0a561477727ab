//! Local filename derivation for downloaded media.
//!
//! Reference names come from untrusted document text, so the local name is
//! reduced to a single safe path segment before it touches the filesystem.

use std::path::{Component, Path, PathBuf};

use super::constants::FALLBACK_FILENAME;

/// Local filename for a reference name: its final `/` or `\` segment,
/// sanitized. Falls back to [`FALLBACK_FILENAME`] when nothing usable remains.
#[must_use]
pub fn local_filename(name: &str) -> String {
    let last = name.rsplit(['/', '\\']).next().unwrap_or(name).trim();
    let sanitized = sanitize_filename(last);
    if sanitized.trim_matches(['_', '.']).is_empty() {
        FALLBACK_FILENAME.to_string()
    } else {
        sanitized
    }
}

/// Output path for `name` inside `output_dir`.
#[must_use]
pub fn output_path(output_dir: &Path, name: &str) -> PathBuf {
    output_dir.join(local_filename(name))
}

/// Replaces characters that are invalid on common filesystems:
/// / \ : * ? " < > | and control characters.
pub(crate) fn sanitize_filename(name: &str) -> String {
    let sanitized: String = name
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();

    if sanitized.is_empty() {
        return "_".to_string();
    }

    if is_safe_filename_segment(&sanitized) {
        sanitized
    } else {
        sanitized
            .chars()
            .map(|c| if c == '.' { '_' } else { c })
            .collect()
    }
}

fn is_safe_filename_segment(name: &str) -> bool {
    !Path::new(name).components().any(|component| {
        matches!(
            component,
            Component::CurDir | Component::ParentDir | Component::RootDir | Component::Prefix(_)
        )
    })
}
