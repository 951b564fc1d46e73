//! Line-prefix toggles: blockquote, ordered list, unordered list
//!
//! Operates per line across the selected range. Toggling a construct on
//! replaces any existing list marker on the line, and the unordered
//! toggle removes an ordered marker first so the two never stack.
//! Ordered markers number from 1, advancing only on lines that actually
//! receive a marker.

use regex::Regex;
use std::sync::OnceLock;

use crate::buffer::EditorBuffer;

use super::replace_whole_line;
use super::state::state_at;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LineConstruct {
    Quote,
    UnorderedList,
    OrderedList,
}

fn list_marker_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^(\s*)(\*|-|\+|\d*\.)(\s+)").expect("list pattern compiles"))
}

fn quote_prefix_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^(\s*)>\s+").expect("quote pattern compiles"))
}

fn leading_ws_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\s*").expect("whitespace pattern compiles"))
}

fn ordered_marker_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\d+.").expect("ordered marker pattern compiles"))
}

/// Toggle a `>` blockquote prefix across the selected lines.
pub fn toggle_quote<B: EditorBuffer>(buffer: &mut B) {
    let active = state_at(buffer, None).quote;
    toggle_line(buffer, LineConstruct::Quote, active, '*');
}

/// Toggle an unordered list across the selected lines using the given
/// bullet character.
pub fn toggle_unordered_list<B: EditorBuffer>(buffer: &mut B, list_style: char) {
    let active = state_at(buffer, None).unordered_list;
    toggle_line(buffer, LineConstruct::UnorderedList, active, list_style);
}

/// Toggle an ordered list across the selected lines, numbering from 1.
pub fn toggle_ordered_list<B: EditorBuffer>(buffer: &mut B) {
    let active = state_at(buffer, None).ordered_list;
    toggle_line(buffer, LineConstruct::OrderedList, active, '*');
}

fn toggle_line<B: EditorBuffer>(
    buffer: &mut B,
    construct: LineConstruct,
    active: bool,
    list_style: char,
) {
    let start = buffer.cursor_start();
    let end = buffer.cursor_end();

    let mut counter = 1usize;
    buffer.begin_operation();
    for i in start.line..=end.line {
        let text = buffer.get_line(i).unwrap_or("").to_string();
        let new_text = if active {
            strip_re(construct).replace(&text, "$1").into_owned()
        } else {
            // An ordered marker gives way when toggling unordered on.
            let text = if construct == LineConstruct::UnorderedList {
                apply_toggle(LineConstruct::OrderedList, &text, true, counter, list_style).0
            } else {
                text
            };
            let (text, inserted) = apply_toggle(construct, &text, false, counter, list_style);
            if inserted {
                counter += 1;
            }
            text
        };
        replace_whole_line(buffer, i, &new_text);
    }
    buffer.end_operation();
}

fn strip_re(construct: LineConstruct) -> &'static Regex {
    match construct {
        LineConstruct::Quote => quote_prefix_re(),
        LineConstruct::UnorderedList | LineConstruct::OrderedList => list_marker_re(),
    }
}

fn marker_for(construct: LineConstruct, counter: usize, list_style: char) -> String {
    match construct {
        LineConstruct::Quote => ">".to_string(),
        LineConstruct::UnorderedList => list_style.to_string(),
        LineConstruct::OrderedList => format!("{}.", counter),
    }
}

/// Whether a captured marker already belongs to `construct`.
fn is_same_marker(construct: LineConstruct, captured: &str, list_style: char) -> bool {
    match construct {
        LineConstruct::Quote => captured.contains('>'),
        LineConstruct::UnorderedList => captured.contains(list_style),
        LineConstruct::OrderedList => ordered_marker_re().is_match(captured),
    }
}

/// Toggle one line on (or only strip a foreign marker when
/// `untoggle_only`). Returns the new line text and whether a marker was
/// inserted.
fn apply_toggle(
    construct: LineConstruct,
    text: &str,
    untoggle_only: bool,
    counter: usize,
    list_style: char,
) -> (String, bool) {
    let marker = marker_for(construct, counter, list_style);
    if let Some(caps) = list_marker_re().captures(text) {
        let marker = if is_same_marker(construct, &caps[2], list_style) {
            String::new()
        } else {
            marker
        };
        let inserted = !marker.is_empty();
        let stripped = leading_ws_re().replace(text, "").into_owned();
        let stripped = strip_re(construct).replace(&stripped, "$1").into_owned();
        (
            format!("{}{}{}{}", &caps[1], marker, &caps[3], stripped),
            inserted,
        )
    } else if !untoggle_only {
        (format!("{} {}", marker, text), true)
    } else {
        (text.to_string(), false)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::{Position, TextBuffer};

    fn buffer_with_selection(text: &str, anchor: (usize, usize), head: (usize, usize)) -> TextBuffer {
        let mut buffer = TextBuffer::from_text(text);
        buffer.set_selection(
            Position::new(anchor.0, anchor.1),
            Position::new(head.0, head.1),
        );
        buffer
    }

    #[test]
    fn test_quote_toggles_two_lines() {
        let mut buffer = buffer_with_selection("a\nb", (0, 0), (1, 1));
        toggle_quote(&mut buffer);
        assert_eq!(buffer.value(), "> a\n> b");
    }

    #[test]
    fn test_quote_round_trip() {
        let mut buffer = buffer_with_selection("a\nb", (0, 0), (1, 1));
        toggle_quote(&mut buffer);
        toggle_quote(&mut buffer);
        assert_eq!(buffer.value(), "a\nb");
    }

    #[test]
    fn test_unordered_list_insert_and_remove() {
        let mut buffer = buffer_with_selection("one\ntwo", (0, 0), (1, 2));
        toggle_unordered_list(&mut buffer, '*');
        assert_eq!(buffer.value(), "* one\n* two");

        toggle_unordered_list(&mut buffer, '*');
        assert_eq!(buffer.value(), "one\ntwo");
    }

    #[test]
    fn test_unordered_list_dash_style() {
        let mut buffer = buffer_with_selection("item", (0, 0), (0, 2));
        toggle_unordered_list(&mut buffer, '-');
        assert_eq!(buffer.value(), "- item");
    }

    #[test]
    fn test_ordered_list_numbers_from_one() {
        let mut buffer = buffer_with_selection("a\nb\nc", (0, 0), (2, 1));
        toggle_ordered_list(&mut buffer);
        assert_eq!(buffer.value(), "1. a\n2. b\n3. c");
    }

    #[test]
    fn test_ordered_counter_skips_already_marked_lines() {
        // The middle line already carries an ordered marker: it is
        // stripped rather than renumbered, and the counter does not
        // advance for it.
        let mut buffer = buffer_with_selection("a\n1. b\nc", (0, 0), (2, 1));
        toggle_ordered_list(&mut buffer);
        assert_eq!(buffer.value(), "1. a\n b\n2. c");
    }

    #[test]
    fn test_ordered_list_removal() {
        let mut buffer = buffer_with_selection("1. a\n2. b", (0, 3), (1, 3));
        toggle_ordered_list(&mut buffer);
        assert_eq!(buffer.value(), "a\nb");
    }

    #[test]
    fn test_unordered_wins_over_ordered() {
        let mut buffer = buffer_with_selection("1. foo", (0, 3), (0, 3));
        toggle_unordered_list(&mut buffer, '*');
        // The ordered marker is stripped first, then the bullet goes in
        // front of the leftover leading space.
        assert_eq!(buffer.value(), "*  foo");
        assert!(!buffer.value().contains("1."));
    }

    #[test]
    fn test_quote_prefixes_list_line() {
        let mut buffer = buffer_with_selection("* item", (0, 3), (0, 3));
        toggle_quote(&mut buffer);
        assert_eq!(buffer.value(), "> * item");
    }

    #[test]
    fn test_line_toggle_is_one_atomic_edit() {
        let mut buffer = buffer_with_selection("a\nb\nc", (0, 0), (2, 1));
        let before = buffer.change_count();
        toggle_quote(&mut buffer);
        assert_eq!(buffer.change_count(), before + 1);
    }

    #[test]
    fn test_quote_on_indented_line() {
        // The marker goes in front; the original indentation survives
        // after it and is swallowed again on removal.
        let mut buffer = buffer_with_selection("  a", (0, 2), (0, 2));
        toggle_quote(&mut buffer);
        assert_eq!(buffer.value(), ">   a");

        toggle_quote(&mut buffer);
        assert_eq!(buffer.value(), "a");
    }
}
