//! Heading toggles
//!
//! Headings are a run of leading `#` characters. The directional toggles
//! step the level one at a time; the absolute toggles set or clear an
//! exact level. From a non-heading line, "smaller" jumps straight to
//! level 1 and "bigger" to level 6.

use crate::buffer::EditorBuffer;
use crate::string_utils::char_index_to_byte_index;

use super::replace_whole_line;

#[derive(Debug, Clone, Copy)]
enum HeadingMode {
    Smaller,
    Bigger,
    Absolute(usize),
}

/// Step every selected line one heading level down (toward h6).
pub fn toggle_heading_smaller<B: EditorBuffer>(buffer: &mut B) {
    toggle_heading(buffer, HeadingMode::Smaller);
}

/// Step every selected line one heading level up (toward h1).
pub fn toggle_heading_bigger<B: EditorBuffer>(buffer: &mut B) {
    toggle_heading(buffer, HeadingMode::Bigger);
}

/// Set every selected line to exactly heading level `size`, or clear the
/// heading when it already has that level.
pub fn toggle_heading_level<B: EditorBuffer>(buffer: &mut B, size: u8) {
    toggle_heading(buffer, HeadingMode::Absolute(size as usize));
}

fn toggle_heading<B: EditorBuffer>(buffer: &mut B, mode: HeadingMode) {
    let start = buffer.cursor_start();
    let end = buffer.cursor_end();

    buffer.begin_operation();
    for i in start.line..=end.line {
        let text = buffer.get_line(i).unwrap_or("").to_string();
        // None when the line is empty or consists solely of hashes;
        // both count as "not a heading" here.
        let level = text.chars().position(|c| c != '#');

        let new_text = match mode {
            HeadingMode::Smaller | HeadingMode::Bigger => {
                let bigger = matches!(mode, HeadingMode::Bigger);
                match level {
                    None | Some(0) => {
                        if bigger {
                            format!("###### {}", text)
                        } else {
                            format!("# {}", text)
                        }
                    }
                    Some(6) if !bigger => from_char(&text, 7).to_string(),
                    Some(1) if bigger => from_char(&text, 2).to_string(),
                    Some(_) => {
                        if bigger {
                            from_char(&text, 1).to_string()
                        } else {
                            format!("#{}", text)
                        }
                    }
                }
            }
            HeadingMode::Absolute(size) => match level {
                None | Some(0) => format!("{} {}", "#".repeat(size), text),
                Some(level) if level == size => from_char(&text, level + 1).to_string(),
                Some(level) => {
                    format!("{} {}", "#".repeat(size), from_char(&text, level + 1))
                }
            },
        };

        replace_whole_line(buffer, i, &new_text);
    }
    buffer.end_operation();
}

/// The tail of `text` starting at character index `n` (empty past the end).
fn from_char(text: &str, n: usize) -> &str {
    &text[char_index_to_byte_index(text, n)..]
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::{Position, TextBuffer};

    fn apply(text: &str, f: impl Fn(&mut TextBuffer)) -> String {
        let mut buffer = TextBuffer::from_text(text);
        buffer.set_selection(Position::new(0, 0), Position::new(0, 0));
        f(&mut buffer);
        buffer.value()
    }

    #[test]
    fn test_smaller_steps_toward_h6() {
        assert_eq!(apply("# Title", toggle_heading_smaller), "## Title");
        assert_eq!(apply("## Title", toggle_heading_smaller), "### Title");
    }

    #[test]
    fn test_smaller_from_plain_jumps_to_h1() {
        assert_eq!(apply("Title", toggle_heading_smaller), "# Title");
    }

    #[test]
    fn test_smaller_from_h6_clears_heading() {
        assert_eq!(apply("###### Title", toggle_heading_smaller), "Title");
    }

    #[test]
    fn test_six_smaller_presses_from_h1_clear_heading() {
        let mut buffer = TextBuffer::from_text("# Title");
        buffer.set_selection(Position::new(0, 0), Position::new(0, 0));
        for _ in 0..6 {
            toggle_heading_smaller(&mut buffer);
        }
        assert_eq!(buffer.value(), "Title");
    }

    #[test]
    fn test_bigger_steps_toward_h1() {
        assert_eq!(apply("### Title", toggle_heading_bigger), "## Title");
    }

    #[test]
    fn test_bigger_from_plain_jumps_to_h6() {
        assert_eq!(apply("Title", toggle_heading_bigger), "###### Title");
    }

    #[test]
    fn test_bigger_from_h1_clears_heading() {
        assert_eq!(apply("# Title", toggle_heading_bigger), "Title");
    }

    #[test]
    fn test_absolute_set_and_clear() {
        for size in 1..=6u8 {
            let hashes = "#".repeat(size as usize);
            let set = apply("Title", |b| toggle_heading_level(b, size));
            assert_eq!(set, format!("{} Title", hashes));

            let cleared = apply(&set, |b| toggle_heading_level(b, size));
            assert_eq!(cleared, "Title");
        }
    }

    #[test]
    fn test_absolute_replaces_existing_level() {
        assert_eq!(apply("## Title", |b| toggle_heading_level(b, 4)), "#### Title");
        assert_eq!(apply("#### Title", |b| toggle_heading_level(b, 1)), "# Title");
    }

    #[test]
    fn test_heading_applies_across_selected_lines() {
        let mut buffer = TextBuffer::from_text("a\nb");
        buffer.set_selection(Position::new(0, 0), Position::new(1, 1));
        toggle_heading_level(&mut buffer, 2);
        assert_eq!(buffer.value(), "## a\n## b");
    }

    #[test]
    fn test_heading_is_one_atomic_edit() {
        let mut buffer = TextBuffer::from_text("a\nb\nc");
        buffer.set_selection(Position::new(0, 0), Position::new(2, 0));
        let before = buffer.change_count();
        toggle_heading_bigger(&mut buffer);
        assert_eq!(buffer.change_count(), before + 1);
    }
}
