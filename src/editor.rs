//! Editor façade
//!
//! [`Editor`] ties a buffer, the options, and the view flags together
//! and exposes one method per formatting command. Formatting is a
//! silent no-op while the full preview is showing: there is no editable
//! backing text on screen at that moment.
//!
//! The view flags model what a host UI would show. Entering fullscreen
//! saves the host page's overflow style and restores it on exit; the
//! saved value lives on the view state of this editor instance.

use crate::buffer::EditorBuffer;
use crate::config::Options;
use crate::format;
use crate::format::state::{state_at, ActiveState};

/// File extensions treated as inline-displayable images by the
/// uploaded-image command.
const IMAGE_EXTENSIONS: [&str; 8] = [
    "png", "jpg", "jpeg", "gif", "svg", "apng", "avif", "webp",
];

// ─────────────────────────────────────────────────────────────────────────────
// View State
// ─────────────────────────────────────────────────────────────────────────────

/// Which panes the host UI currently shows, plus the overflow style
/// bookkeeping for fullscreen.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewState {
    /// Full preview pane replacing the editing surface.
    pub preview_full: bool,
    /// Side-by-side preview next to the editing surface.
    pub side_by_side: bool,
    /// Fullscreen editing.
    pub fullscreen: bool,
    /// The host page's current overflow style.
    pub overflow: String,
    /// Overflow style saved on entering fullscreen.
    saved_overflow: Option<String>,
}

// ─────────────────────────────────────────────────────────────────────────────
// Editor
// ─────────────────────────────────────────────────────────────────────────────

/// A Markdown formatting editor over any [`EditorBuffer`].
#[derive(Debug)]
pub struct Editor<B: EditorBuffer> {
    buffer: B,
    options: Options,
    view: ViewState,
}

impl<B: EditorBuffer> Editor<B> {
    pub fn new(buffer: B, options: Options) -> Self {
        Self {
            buffer,
            options,
            view: ViewState::default(),
        }
    }

    pub fn buffer(&self) -> &B {
        &self.buffer
    }

    pub fn buffer_mut(&mut self) -> &mut B {
        &mut self.buffer
    }

    pub fn options(&self) -> &Options {
        &self.options
    }

    pub fn options_mut(&mut self) -> &mut Options {
        &mut self.options
    }

    pub fn view(&self) -> &ViewState {
        &self.view
    }

    /// The full buffer contents, lines joined with `\n`.
    pub fn value(&self) -> String {
        let mut lines = Vec::with_capacity(self.buffer.line_count());
        for i in 0..self.buffer.line_count() {
            lines.push(self.buffer.get_line(i).unwrap_or("").to_string());
        }
        lines.join("\n")
    }

    /// The construct state at the selection start.
    pub fn state(&self) -> ActiveState {
        state_at(&self.buffer, None)
    }

    /// Whether the full preview is showing (formatting is disabled then).
    pub fn is_preview_active(&self) -> bool {
        self.view.preview_full
    }

    /// Render the current buffer contents for a preview pane.
    pub fn preview_html(&self) -> String {
        crate::preview::render_to_html(&self.value())
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Formatting Commands
    // ─────────────────────────────────────────────────────────────────────────

    pub fn toggle_bold(&mut self) {
        if self.view.preview_full {
            return;
        }
        format::inline::toggle_bold(&mut self.buffer, &self.options.block_styles.bold);
    }

    pub fn toggle_italic(&mut self) {
        if self.view.preview_full {
            return;
        }
        format::inline::toggle_italic(&mut self.buffer, &self.options.block_styles.italic);
    }

    pub fn toggle_strikethrough(&mut self) {
        if self.view.preview_full {
            return;
        }
        format::inline::toggle_strikethrough(&mut self.buffer);
    }

    pub fn toggle_code_block(&mut self) {
        if self.view.preview_full {
            return;
        }
        format::code::toggle_code_block(
            &mut self.buffer,
            &self.options.block_styles.code,
            self.options.tab_size as usize,
        );
    }

    pub fn toggle_blockquote(&mut self) {
        if self.view.preview_full {
            return;
        }
        format::line::toggle_quote(&mut self.buffer);
    }

    pub fn toggle_unordered_list(&mut self) {
        if self.view.preview_full {
            return;
        }
        format::line::toggle_unordered_list(
            &mut self.buffer,
            self.options.unordered_list_style.as_char(),
        );
    }

    pub fn toggle_ordered_list(&mut self) {
        if self.view.preview_full {
            return;
        }
        format::line::toggle_ordered_list(&mut self.buffer);
    }

    pub fn toggle_heading_smaller(&mut self) {
        if self.view.preview_full {
            return;
        }
        format::heading::toggle_heading_smaller(&mut self.buffer);
    }

    pub fn toggle_heading_bigger(&mut self) {
        if self.view.preview_full {
            return;
        }
        format::heading::toggle_heading_bigger(&mut self.buffer);
    }

    pub fn toggle_heading_level(&mut self, size: u8) {
        if self.view.preview_full {
            return;
        }
        format::heading::toggle_heading_level(&mut self.buffer, size);
    }

    pub fn clean_block(&mut self) {
        if self.view.preview_full {
            return;
        }
        format::clean::clean_block(&mut self.buffer);
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Drawing Commands
    // ─────────────────────────────────────────────────────────────────────────

    /// Insert or remove a link. With `prompt_urls` set, `url` is the
    /// prompt result; `None` means the prompt was cancelled and the
    /// command returns `false` without editing.
    pub fn draw_link(&mut self, url: Option<&str>) -> bool {
        let Some(url) = self.resolve_url(url) else {
            return false;
        };
        if self.view.preview_full {
            return true;
        }
        let template = self.options.insert_texts.link.clone();
        format::inline::toggle_link(&mut self.buffer, &template.before, &template.after, &url);
        true
    }

    /// Insert or remove an image. Same URL contract as [`draw_link`].
    ///
    /// [`draw_link`]: Editor::draw_link
    pub fn draw_image(&mut self, url: Option<&str>) -> bool {
        let Some(url) = self.resolve_url(url) else {
            return false;
        };
        if self.view.preview_full {
            return true;
        }
        let template = self.options.insert_texts.image.clone();
        format::inline::toggle_image(&mut self.buffer, &template.before, &template.after, &url);
        true
    }

    /// Insert a reference to a successfully uploaded file: an image
    /// template when the extension looks like an image, a link carrying
    /// the file name otherwise.
    pub fn draw_uploaded_image(&mut self, url: &str) {
        if self.view.preview_full {
            return;
        }
        let stat = self.state();
        let image_name = url.rsplit('/').next().unwrap_or(url).to_string();
        let ext = image_name
            .rsplit('.')
            .next()
            .unwrap_or("")
            .split('?')
            .next()
            .unwrap_or("")
            .to_lowercase();

        if IMAGE_EXTENSIONS.contains(&ext.as_str()) {
            let template = self.options.insert_texts.uploaded_image.clone();
            format::inline::wrap_selection(
                &mut self.buffer,
                stat.image,
                &template.before,
                &template.after,
                Some(url),
            );
        } else {
            let template = self.options.insert_texts.link.clone();
            let before = format!("[{}", image_name);
            format::inline::wrap_selection(
                &mut self.buffer,
                stat.link,
                &before,
                &template.after,
                Some(url),
            );
        }
    }

    pub fn draw_table(&mut self) {
        if self.view.preview_full {
            return;
        }
        let template = self.options.insert_texts.table.clone();
        format::inline::wrap_selection(
            &mut self.buffer,
            false,
            &template.before,
            &template.after,
            None,
        );
    }

    pub fn draw_horizontal_rule(&mut self) {
        if self.view.preview_full {
            return;
        }
        // The image flag guards against splitting an image span in two
        let active = self.state().image;
        let template = self.options.insert_texts.horizontal_rule.clone();
        format::inline::wrap_selection(
            &mut self.buffer,
            active,
            &template.before,
            &template.after,
            None,
        );
    }

    fn resolve_url(&self, url: Option<&str>) -> Option<String> {
        if self.options.prompt_urls {
            url.map(escape_prompt_url)
        } else {
            Some("https://".to_string())
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // View Commands
    // ─────────────────────────────────────────────────────────────────────────

    /// Toggle the full preview pane. Side-by-side closes first.
    pub fn toggle_preview(&mut self) {
        if self.view.side_by_side {
            self.toggle_side_by_side();
        }
        self.view.preview_full = !self.view.preview_full;
    }

    /// Toggle the side-by-side preview. Opening it enters fullscreen
    /// unless `side_by_side_fullscreen` is off, and hides an active full
    /// preview.
    pub fn toggle_side_by_side(&mut self) {
        if self.view.side_by_side {
            self.view.side_by_side = false;
        } else {
            if !self.view.fullscreen && self.options.side_by_side_fullscreen {
                self.toggle_full_screen();
            }
            self.view.side_by_side = true;
            self.view.preview_full = false;
        }
    }

    /// Toggle fullscreen, saving and restoring the host page's overflow
    /// style. Leaving fullscreen also closes side-by-side when that mode
    /// is tied to fullscreen.
    pub fn toggle_full_screen(&mut self) {
        self.view.fullscreen = !self.view.fullscreen;

        if self.view.fullscreen {
            self.view.saved_overflow = Some(self.view.overflow.clone());
            self.view.overflow = "hidden".to_string();
        } else {
            self.view.overflow = self.view.saved_overflow.take().unwrap_or_default();
        }

        if self.view.side_by_side && self.options.side_by_side_fullscreen {
            self.toggle_side_by_side();
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// URL Escaping
// ─────────────────────────────────────────────────────────────────────────────

/// Characters a URI leaves as-is (the `encodeURI` set).
fn is_uri_unescaped(c: char) -> bool {
    c.is_ascii_alphanumeric()
        || matches!(
            c,
            ';' | ','
                | '/'
                | '?'
                | ':'
                | '@'
                | '&'
                | '='
                | '+'
                | '$'
                | '-'
                | '_'
                | '.'
                | '!'
                | '~'
                | '*'
                | '\''
                | '('
                | ')'
                | '#'
        )
}

/// Percent-encode a prompt-supplied URL and backslash-escape the
/// characters that would otherwise terminate a Markdown `](...)` span.
pub fn escape_prompt_url(url: &str) -> String {
    let mut encoded = String::with_capacity(url.len());
    for c in url.chars() {
        if is_uri_unescaped(c) {
            encoded.push(c);
        } else {
            let mut bytes = [0u8; 4];
            for byte in c.encode_utf8(&mut bytes).bytes() {
                encoded.push_str(&format!("%{:02X}", byte));
            }
        }
    }

    let mut escaped = String::with_capacity(encoded.len());
    for c in encoded.chars() {
        if matches!(c, '\\' | '(' | ')') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::{Position, TextBuffer};

    fn editor(text: &str) -> Editor<TextBuffer> {
        Editor::new(TextBuffer::from_text(text), Options::default())
    }

    #[test]
    fn test_toggle_bold_through_editor() {
        let mut ed = editor("hello world");
        ed.buffer_mut()
            .set_selection(Position::new(0, 0), Position::new(0, 5));
        ed.toggle_bold();
        assert_eq!(ed.value(), "**hello** world");
    }

    #[test]
    fn test_formatting_is_noop_during_full_preview() {
        let mut ed = editor("hello");
        ed.buffer_mut()
            .set_selection(Position::new(0, 0), Position::new(0, 5));
        ed.toggle_preview();
        assert!(ed.is_preview_active());

        ed.toggle_bold();
        ed.toggle_blockquote();
        ed.toggle_heading_smaller();
        ed.toggle_code_block();
        ed.clean_block();
        assert_eq!(ed.value(), "hello");

        ed.toggle_preview();
        ed.toggle_bold();
        assert_eq!(ed.value(), "**hello**");
    }

    #[test]
    fn test_tab_size_controls_unindent_width() {
        let mut ed = editor("    code line");
        ed.options_mut().tab_size = 2;
        ed.buffer_mut()
            .set_selection(Position::new(0, 6), Position::new(0, 6));
        ed.toggle_code_block();
        assert_eq!(ed.value(), "  code line");

        // The default width removes a full four-space level
        let mut ed = editor("    code line");
        ed.buffer_mut()
            .set_selection(Position::new(0, 6), Position::new(0, 6));
        ed.toggle_code_block();
        assert_eq!(ed.value(), "code line");
    }

    #[test]
    fn test_draw_link_without_prompts_uses_placeholder_url() {
        let mut ed = editor("docs");
        ed.buffer_mut()
            .set_selection(Position::new(0, 0), Position::new(0, 4));
        assert!(ed.draw_link(None));
        assert_eq!(ed.value(), "[docs](https://)");
    }

    #[test]
    fn test_draw_link_cancelled_prompt_returns_false() {
        let mut ed = editor("docs");
        ed.options_mut().prompt_urls = true;
        assert!(!ed.draw_link(None));
        assert_eq!(ed.value(), "docs");
    }

    #[test]
    fn test_draw_link_with_prompt_escapes_url() {
        let mut ed = editor("docs");
        ed.options_mut().prompt_urls = true;
        ed.buffer_mut()
            .set_selection(Position::new(0, 0), Position::new(0, 4));
        assert!(ed.draw_link(Some("https://x.dev/a b(c)")));
        assert_eq!(ed.value(), "[docs](https://x.dev/a%20b\\(c\\))");
    }

    #[test]
    fn test_draw_image() {
        let mut ed = editor("alt");
        ed.buffer_mut()
            .set_selection(Position::new(0, 0), Position::new(0, 3));
        assert!(ed.draw_image(None));
        assert_eq!(ed.value(), "![alt](https://)");
    }

    #[test]
    fn test_draw_uploaded_image_with_image_extension() {
        let mut ed = editor("");
        ed.draw_uploaded_image("https://host/pics/photo.png");
        assert_eq!(ed.value(), "![](https://host/pics/photo.png)");
    }

    #[test]
    fn test_draw_uploaded_file_falls_back_to_named_link() {
        let mut ed = editor("");
        ed.draw_uploaded_image("https://host/files/report.pdf");
        assert_eq!(ed.value(), "[report.pdf](https://host/files/report.pdf)");
    }

    #[test]
    fn test_draw_table_inserts_template() {
        let mut ed = editor("");
        ed.draw_table();
        assert!(ed.value().contains("| Column 1 | Column 2 | Column 3 |"));
    }

    #[test]
    fn test_draw_horizontal_rule() {
        let mut ed = editor("");
        ed.draw_horizontal_rule();
        assert!(ed.value().contains("-----"));
    }

    #[test]
    fn test_side_by_side_implies_fullscreen_by_default() {
        let mut ed = editor("");
        ed.toggle_side_by_side();
        assert!(ed.view().side_by_side);
        assert!(ed.view().fullscreen);

        // Leaving fullscreen closes side-by-side again
        ed.toggle_full_screen();
        assert!(!ed.view().fullscreen);
        assert!(!ed.view().side_by_side);
    }

    #[test]
    fn test_side_by_side_without_fullscreen_when_configured() {
        let mut ed = editor("");
        ed.options_mut().side_by_side_fullscreen = false;
        ed.toggle_side_by_side();
        assert!(ed.view().side_by_side);
        assert!(!ed.view().fullscreen);
    }

    #[test]
    fn test_fullscreen_saves_and_restores_overflow() {
        let mut ed = editor("");
        ed.options_mut().side_by_side_fullscreen = false;
        ed.view.overflow = "scroll".to_string();

        ed.toggle_full_screen();
        assert_eq!(ed.view().overflow, "hidden");

        ed.toggle_full_screen();
        assert_eq!(ed.view().overflow, "scroll");
    }

    #[test]
    fn test_preview_closes_side_by_side() {
        let mut ed = editor("");
        ed.toggle_side_by_side();
        ed.toggle_preview();
        assert!(ed.is_preview_active());
        assert!(!ed.view().side_by_side);
    }

    #[test]
    fn test_side_by_side_closes_full_preview() {
        let mut ed = editor("");
        ed.toggle_preview();
        ed.toggle_side_by_side();
        assert!(!ed.is_preview_active());
        assert!(ed.view().side_by_side);
    }

    #[test]
    fn test_preview_html_renders_value() {
        let ed = editor("# Title");
        assert!(ed.preview_html().contains("<h1>"));
    }

    #[test]
    fn test_escape_prompt_url() {
        assert_eq!(escape_prompt_url("https://x.dev/a"), "https://x.dev/a");
        assert_eq!(escape_prompt_url("a b"), "a%20b");
        assert_eq!(escape_prompt_url("f(1)"), "f\\(1\\)");
        // Multi-byte characters percent-encode per UTF-8 byte
        assert_eq!(escape_prompt_url("é"), "%C3%A9");
    }
}
