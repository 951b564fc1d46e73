//! Markdown preview rendering
//!
//! The preview panes show the buffer rendered to HTML. Rendering is a
//! plain function of the Markdown text; the view flags deciding when a
//! preview is shown live on [`ViewState`](crate::editor::ViewState).

use comrak::{markdown_to_html, Options};

/// Render Markdown to an HTML fragment for the preview panes.
pub fn render_to_html(markdown: &str) -> String {
    let mut options = Options::default();

    // Enable common extensions
    options.extension.strikethrough = true;
    options.extension.table = true;
    options.extension.autolink = true;
    options.extension.tasklist = true;
    options.extension.footnotes = true;

    markdown_to_html(markdown, &options)
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
