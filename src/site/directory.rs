//! Flat directory snapshot and the filename → path reverse index.

use std::collections::HashMap;

use serde_json::{Map, Value};

/// Every known path on the site mapped to opaque metadata.
///
/// Keys keep the order in which they appeared in the fetched document; the
/// [`FilenameIndex`] tie-break depends on it. Read-only after construction.
#[derive(Debug, Clone, Default)]
pub struct Directory {
    entries: Map<String, Value>,
    index: FilenameIndex,
}

impl Directory {
    /// Builds a directory (and its filename index) from a parsed JSON object.
    #[must_use]
    pub fn from_entries(entries: Map<String, Value>) -> Self {
        let index = FilenameIndex::build(entries.keys().map(String::as_str));
        Self { entries, index }
    }

    /// Builds a directory from paths alone, with `null` metadata.
    pub fn from_paths<I, S>(paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let entries = paths
            .into_iter()
            .map(|path| (path.into(), Value::Null))
            .collect::<Map<_, _>>();
        Self::from_entries(entries)
    }

    /// Returns true when `path` is an exact key.
    #[must_use]
    pub fn contains(&self, path: &str) -> bool {
        self.entries.contains_key(path)
    }

    /// Metadata stored for `path`.
    #[must_use]
    pub fn metadata(&self, path: &str) -> Option<&Value> {
        self.entries.get(path)
    }

    /// Paths in document order.
    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true when the directory has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Reverse index derived from this directory.
    #[must_use]
    pub fn filename_index(&self) -> &FilenameIndex {
        &self.index
    }
}

/// Bare filename → full path, for references that omit their folder.
///
/// When several paths share a filename only the last one (in directory
/// order) is kept. This is an accepted ambiguity, not a correct pick.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilenameIndex {
    by_name: HashMap<String, String>,
}

impl FilenameIndex {
    /// Indexes `paths` in iteration order; later paths overwrite earlier ones.
    pub fn build<'a, I>(paths: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut by_name = HashMap::new();
        for path in paths {
            by_name.insert(bare_filename(path).to_string(), path.to_string());
        }
        Self { by_name }
    }

    /// Full path recorded for `filename`.
    #[must_use]
    pub fn get(&self, filename: &str) -> Option<&str> {
        self.by_name.get(filename).map(String::as_str)
    }

    /// Number of distinct filenames.
    #[must_use]
    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    /// Returns true when nothing is indexed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }
}

/// Final `/`-delimited segment of `path`.
pub(crate) fn bare_filename(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}
