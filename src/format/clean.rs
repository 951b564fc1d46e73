//! Clean-block: strip block-level markers from a line range

use regex::Regex;
use std::sync::OnceLock;

use crate::buffer::EditorBuffer;

use super::replace_whole_line;

fn block_prefix_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^[ ]*([# ]+|\*|-|[> ]+|[0-9]+(.|\)))[ ]*").expect("prefix pattern compiles")
    })
}

/// Strip one leading block marker run (heading hashes, a bullet, quote
/// angles, or a list numeral) from every selected line. A single pass;
/// nested constructs keep their inner markers.
pub fn clean_block<B: EditorBuffer>(buffer: &mut B) {
    let start = buffer.cursor_start();
    let end = buffer.cursor_end();

    buffer.begin_operation();
    for line in start.line..=end.line {
        let text = buffer.get_line(line).unwrap_or("").to_string();
        let cleaned = block_prefix_re().replace(&text, "").into_owned();
        replace_whole_line(buffer, line, &cleaned);
    }
    buffer.end_operation();
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::{Position, TextBuffer};

    fn clean(text: &str) -> String {
        let mut buffer = TextBuffer::from_text(text);
        let last = buffer.line_count() - 1;
        buffer.set_selection(Position::new(0, 0), Position::new(last, 0));
        clean_block(&mut buffer);
        buffer.value()
    }

    #[test]
    fn test_strips_heading_hashes() {
        assert_eq!(clean("## Title"), "Title");
        assert_eq!(clean("###### Deep"), "Deep");
    }

    #[test]
    fn test_strips_list_markers() {
        assert_eq!(clean("* item"), "item");
        assert_eq!(clean("- item"), "item");
        assert_eq!(clean("3. item"), "item");
        assert_eq!(clean("12) item"), "item");
    }

    #[test]
    fn test_strips_quote_markers() {
        assert_eq!(clean("> quoted"), "quoted");
        assert_eq!(clean("> > nested"), "nested");
    }

    #[test]
    fn test_strips_with_leading_spaces() {
        assert_eq!(clean("  * indented item"), "indented item");
    }

    #[test]
    fn test_plain_line_unchanged() {
        assert_eq!(clean("plain text"), "plain text");
    }

    #[test]
    fn test_single_pass_across_lines() {
        assert_eq!(clean("# a\n* b\n> c"), "a\nb\nc");
    }

    #[test]
    fn test_does_not_recurse_into_inline_markers() {
        assert_eq!(clean("* some **bold** text"), "some **bold** text");
    }
}
