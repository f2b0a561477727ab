//! Rendered preview of markdown documents using pulldown-cmark.

use pulldown_cmark::{Event, Options, Parser, html};

/// Markdown extensions enabled for previews.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PreviewOptions {
    /// Pipe tables
    pub tables: bool,
    /// `[^1]` footnotes
    pub footnotes: bool,
    /// `~~struck~~` text
    pub strikethrough: bool,
    /// `- [x]` task lists
    pub task_lists: bool,
    /// Render single newlines inside a paragraph as `<br />`, as note
    /// editors display them.
    pub hard_line_breaks: bool,
}

impl Default for PreviewOptions {
    fn default() -> Self {
        Self {
            tables: true,
            footnotes: true,
            strikethrough: true,
            task_lists: true,
            hard_line_breaks: true,
        }
    }
}

impl PreviewOptions {
    fn to_pulldown_options(self) -> Options {
        let mut opts = Options::empty();
        if self.tables {
            opts.insert(Options::ENABLE_TABLES);
        }
        if self.footnotes {
            opts.insert(Options::ENABLE_FOOTNOTES);
        }
        if self.strikethrough {
            opts.insert(Options::ENABLE_STRIKETHROUGH);
        }
        if self.task_lists {
            opts.insert(Options::ENABLE_TASKLISTS);
        }
        opts
    }
}

/// True when `path` names a markdown document (case-insensitive).
#[must_use]
pub(crate) fn is_markdown(path: &str) -> bool {
    path.rsplit_once('.')
        .is_some_and(|(_, ext)| ext.eq_ignore_ascii_case("md"))
}

/// Renders markdown `text` to an HTML fragment.
#[must_use]
pub fn render_markdown(text: &str, options: PreviewOptions) -> String {
    let parser = Parser::new_ext(text, options.to_pulldown_options()).map(|event| match event {
        Event::SoftBreak if options.hard_line_breaks => Event::HardBreak,
        other => other,
    });
    let mut out = String::with_capacity(text.len() * 3 / 2);
    html::push_html(&mut out, parser);
    out
}
