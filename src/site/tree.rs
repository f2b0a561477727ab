//! Nested browsing view over the flat directory.

use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt::Write as _;

use super::Directory;

/// Extensions whose content is fetched and shown as text.
const PREVIEWABLE_EXTENSIONS: [&str; 8] = ["md", "js", "css", "html", "json", "txt", "py", "xml"];

/// Returns true when `path` names a text document worth previewing.
#[must_use]
pub fn is_previewable(path: &str) -> bool {
    let Some((_, ext)) = path.rsplit_once('.') else {
        return false;
    };
    if ext.contains('/') {
        return false;
    }
    PREVIEWABLE_EXTENSIONS
        .iter()
        .any(|candidate| ext.eq_ignore_ascii_case(candidate))
}

fn is_markdown(name: &str) -> bool {
    name.ends_with(".md")
}

/// Sort class of a tree node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum TreeNodeKind {
    /// Node with children.
    Folder,
    /// Markdown document.
    Document,
    /// Any other file (media, attachments).
    File,
}

/// One node of the [`DocumentTree`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeNode {
    /// Final path segment.
    pub name: String,
    /// Full `/`-joined path from the root.
    pub path: String,
    /// Folder, document or file.
    pub kind: TreeNodeKind,
    /// Sorted children; empty for documents and files.
    pub children: Vec<TreeNode>,
}

/// Directory paths arranged as nested folders.
///
/// Siblings are ordered folders first, then markdown documents, then other
/// files, each group by case-insensitive name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocumentTree {
    roots: Vec<TreeNode>,
}

#[derive(Default)]
struct Builder {
    children: BTreeMap<String, Builder>,
}

impl DocumentTree {
    /// Builds the tree. With `include_media` false, only `.md` paths are kept.
    #[must_use]
    pub fn build(directory: &Directory, include_media: bool) -> Self {
        let mut root = Builder::default();
        for path in directory.paths() {
            if !include_media && !is_markdown(path) {
                continue;
            }
            let mut level = &mut root;
            for part in path.split('/') {
                level = level.children.entry(part.to_string()).or_default();
            }
        }
        Self {
            roots: finish(root, ""),
        }
    }

    /// Top-level nodes.
    #[must_use]
    pub fn roots(&self) -> &[TreeNode] {
        &self.roots
    }

    /// Returns true when no path survived filtering.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    /// Renders the tree as indented text, two spaces per level, folders
    /// suffixed with `/`.
    #[must_use]
    pub fn render(&self) -> String {
        let mut out = String::new();
        for node in &self.roots {
            render_node(node, 0, &mut out);
        }
        out
    }
}

fn finish(builder: Builder, prefix: &str) -> Vec<TreeNode> {
    let mut nodes: Vec<TreeNode> = builder
        .children
        .into_iter()
        .map(|(name, child)| {
            let path = if prefix.is_empty() {
                name.clone()
            } else {
                format!("{prefix}/{name}")
            };
            let kind = if !child.children.is_empty() {
                TreeNodeKind::Folder
            } else if is_markdown(&name) {
                TreeNodeKind::Document
            } else {
                TreeNodeKind::File
            };
            let children = finish(child, &path);
            TreeNode {
                name,
                path,
                kind,
                children,
            }
        })
        .collect();
    nodes.sort_by(compare_siblings);
    nodes
}

fn compare_siblings(lhs: &TreeNode, rhs: &TreeNode) -> Ordering {
    lhs.kind
        .cmp(&rhs.kind)
        .then_with(|| lhs.name.to_lowercase().cmp(&rhs.name.to_lowercase()))
        .then_with(|| lhs.name.cmp(&rhs.name))
}

fn render_node(node: &TreeNode, depth: usize, out: &mut String) {
    let indent = "  ".repeat(depth);
    let suffix = if node.kind == TreeNodeKind::Folder { "/" } else { "" };
    let _ = writeln!(out, "{indent}{}{suffix}", node.name);
    for child in &node.children {
        render_node(child, depth + 1, out);
    }
}
