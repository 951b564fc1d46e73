//! Code toggles: inline backticks, fenced blocks, indented blocks
//!
//! A single entry point classifies the code context at the cursor line
//! and dispatches:
//!
//! * single: drop one backtick on each side of the cursor
//! * fenced with a selection: fence the selection, reusing boundary
//!   fences the selection already touches
//! * fenced without a selection: locate the enclosing block and delete
//!   both fence lines
//! * indented: find the block bounds and remove one indent level
//! * none: insert a new fenced block, or wrap the selection in backticks
//!
//! Line scans use signed indices so walking past the first line mirrors
//! the host-editor convention of clamping out-of-range coordinates.

use regex::Regex;
use std::sync::OnceLock;

use crate::buffer::{fence_open_re, EditorBuffer, Position, TokenTag};

use super::inline::wrap_selection;
use super::replace_whole_line;
use crate::string_utils::char_index_to_byte_index;

/// Which code construct surrounds a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CodeBlockKind {
    /// Inline single-backtick span
    Single,
    /// Fenced block (``` or ~~~)
    Fenced,
    /// Indentation-based block
    Indented,
}

fn blank_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\s*$").expect("blank pattern compiles"))
}

/// True when `line` is a fence marker line. Out-of-range lines are not.
fn fencing_line<B: EditorBuffer>(buffer: &B, line: isize) -> bool {
    if line < 0 {
        return false;
    }
    let line = line as usize;
    let Some(text) = buffer.get_line(line) else {
        return false;
    };
    if buffer.token_at(Position::new(line, 1)).state.fence_marker {
        return true;
    }
    fence_open_re().is_match(text)
}

/// The fence sequence of a fence line's text, if any.
fn fence_chars_of(text: &str) -> Option<String> {
    fence_open_re()
        .captures(text)
        .map(|caps| caps[1].to_string())
}

/// Classify the code construct at `line_num`. `first_ch` overrides the
/// probe column for the leading token (defaults to 1, since column 0 is
/// a cursor position rather than a character).
pub fn code_type<B: EditorBuffer>(
    buffer: &B,
    line_num: usize,
    first_ch: Option<usize>,
) -> Option<CodeBlockKind> {
    let text = buffer.get_line(line_num)?.to_string();
    let first_tok = buffer.token_at(Position::new(line_num, first_ch.unwrap_or(1)));
    let last_tok = if !text.is_empty() {
        Some(buffer.token_at(Position::new(
            line_num,
            text.chars().count().saturating_sub(1),
        )))
    } else {
        None
    };

    // The first characters of an indented block's first line are not
    // themselves marked, so the line-end token decides first.
    if last_tok
        .as_ref()
        .map_or(false, |t| t.state.indented_code)
    {
        Some(CodeBlockKind::Indented)
    } else if !first_tok.has(&TokenTag::Comment) {
        None
    } else if first_tok.state.fenced_chars.is_some()
        || last_tok
            .as_ref()
            .map_or(false, |t| t.state.fenced_chars.is_some())
        || fencing_line(buffer, line_num as isize)
    {
        Some(CodeBlockKind::Fenced)
    } else {
        Some(CodeBlockKind::Single)
    }
}

/// Toggle the code construct at the cursor. `fence_chars_to_insert` is
/// the configured fence sequence for newly created blocks; `tab_size`
/// is the configured indent width for un-indenting indented blocks.
pub fn toggle_code_block<B: EditorBuffer>(
    buffer: &mut B,
    fence_chars_to_insert: &str,
    tab_size: usize,
) {
    let cur_start = buffer.cursor_start();
    let cur_end = buffer.cursor_end();
    let probe_ch = if cur_start.ch == 0 { 1 } else { cur_start.ch };

    match code_type(buffer, cur_start.line, Some(probe_ch)) {
        Some(CodeBlockKind::Single) => toggle_single(buffer, cur_start, cur_end),
        Some(CodeBlockKind::Fenced) => {
            if cur_start != cur_end {
                fence_selection(buffer, cur_start, cur_end, fence_chars_to_insert);
            } else {
                remove_enclosing_fences(buffer, cur_start);
            }
        }
        Some(CodeBlockKind::Indented) => unindent_block(buffer, cur_start, cur_end, tab_size),
        None => {
            let no_sel_at_line_start = cur_start == cur_end && cur_start.ch == 0;
            let sel_multi = cur_start.line != cur_end.line;
            if no_sel_at_line_start || sel_multi {
                insert_fencing_at_selection(buffer, cur_start, cur_end, fence_chars_to_insert);
            } else {
                wrap_selection(buffer, false, "`", "`", None);
            }
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Single Backtick Span
// ─────────────────────────────────────────────────────────────────────────────

fn toggle_single<B: EditorBuffer>(buffer: &mut B, cur_start: Position, cur_end: Position) {
    let text = buffer.get_line(cur_start.line).unwrap_or("").to_string();
    let cut = char_index_to_byte_index(&text, cur_start.ch);
    let start = text[..cut].replacen('`', "", 1);
    let end = text[cut..].replacen('`', "", 1);
    replace_whole_line(buffer, cur_start.line, &format!("{}{}", start, end));

    buffer.set_selection(
        Position::new(cur_start.line, cur_start.ch.saturating_sub(1)),
        Position::new(cur_end.line, cur_end.ch.saturating_sub(1)),
    );
}

// ─────────────────────────────────────────────────────────────────────────────
// Fenced Blocks
// ─────────────────────────────────────────────────────────────────────────────

/// Range-replace with signed line coordinates, clamping below zero the
/// way a host editor clamps out-of-range positions.
fn replace_at_lines<B: EditorBuffer>(buffer: &mut B, text: &str, from_line: isize, to_line: isize) {
    buffer.replace_range(
        text,
        Position::new(from_line.max(0) as usize, 0),
        Position::new(to_line.max(0) as usize, 0),
    );
}

fn fence_selection<B: EditorBuffer>(
    buffer: &mut B,
    cur_start: Position,
    cur_end: Position,
    fence_chars_to_insert: &str,
) {
    // Scan upward for the enclosing fence so new fences match its style.
    let mut fence_line = cur_start.line as isize;
    while fence_line >= 0 && !fencing_line(buffer, fence_line) {
        fence_line -= 1;
    }
    let fence_chars = if fence_line >= 0 {
        let line = fence_line as usize;
        buffer
            .token_at(Position::new(line, 1))
            .state
            .fenced_chars
            .or_else(|| fence_chars_of(buffer.get_line(line).unwrap_or("")))
    } else {
        None
    }
    .unwrap_or_else(|| fence_chars_to_insert.to_string());

    // A boundary already touching a fence line gets no new fence.
    let (start_text, start_line) = if fencing_line(buffer, cur_start.line as isize) {
        (String::new(), cur_start.line as isize)
    } else if fencing_line(buffer, cur_start.line as isize - 1) {
        (String::new(), cur_start.line as isize - 1)
    } else {
        (format!("{}\n", fence_chars), cur_start.line as isize)
    };
    let (end_text, mut end_line) = if fencing_line(buffer, cur_end.line as isize) {
        let mut line = cur_end.line as isize;
        if cur_end.ch == 0 {
            line += 1;
        }
        (String::new(), line)
    } else if cur_end.ch != 0 && fencing_line(buffer, cur_end.line as isize + 1) {
        (String::new(), cur_end.line as isize + 1)
    } else {
        (format!("{}\n", fence_chars), cur_end.line as isize + 1)
    };
    if cur_end.ch == 0 {
        // Full last line selected; the boundary sits at the next line start
        end_line -= 1;
    }

    buffer.begin_operation();
    // End edit first so the start edit's line numbers stay valid
    replace_at_lines(
        buffer,
        &end_text,
        end_line,
        end_line + if end_text.is_empty() { 1 } else { 0 },
    );
    replace_at_lines(
        buffer,
        &start_text,
        start_line,
        start_line + if start_text.is_empty() { 1 } else { 0 },
    );
    buffer.end_operation();

    let offset = if start_text.is_empty() { 0 } else { 1 };
    buffer.set_selection(
        Position::new((start_line + offset).max(0) as usize, 0),
        Position::new((end_line + if start_text.is_empty() { -1 } else { 1 }).max(0) as usize, 0),
    );
}

fn remove_enclosing_fences<B: EditorBuffer>(buffer: &mut B, cur_start: Position) {
    let mut search_from = cur_start.line as isize;
    let mut block_start: Option<isize> = None;
    let mut block_end: Option<isize> = None;

    // Cursor resting on a fence line: decide from the adjacent line
    // whether it opens or closes the block.
    if fencing_line(buffer, cur_start.line as isize) {
        if code_type(buffer, cur_start.line + 1, None) == Some(CodeBlockKind::Fenced) {
            block_start = Some(cur_start.line as isize);
            search_from = cur_start.line as isize + 1;
        } else {
            block_end = Some(cur_start.line as isize);
            search_from = cur_start.line as isize - 1;
        }
    }

    let block_start = block_start.unwrap_or_else(|| {
        let mut line = search_from;
        while line >= 0 && !fencing_line(buffer, line) {
            line -= 1;
        }
        line
    });
    let block_end = block_end.unwrap_or_else(|| {
        let count = buffer.line_count() as isize;
        let mut line = search_from;
        while line < count && !fencing_line(buffer, line) {
            line += 1;
        }
        line
    });

    buffer.begin_operation();
    replace_at_lines(buffer, "", block_start, block_start + 1);
    // The first deletion shifted everything up one line
    replace_at_lines(buffer, "", block_end - 1, block_end);
    buffer.end_operation();
}

fn insert_fencing_at_selection<B: EditorBuffer>(
    buffer: &mut B,
    cur_start: Position,
    cur_end: Position,
    fence_chars: &str,
) {
    let start_line_sel = cur_start.line + 1;
    let mut end_line_sel = cur_end.line + 1;
    let sel_multi = cur_start.line != cur_end.line;
    let repl_start = format!("{}\n", fence_chars);
    let mut repl_end = format!("\n{}", fence_chars);
    if sel_multi {
        end_line_sel += 1;
    }
    // A selection ending at column 0 already owns its trailing newline
    if sel_multi && cur_end.ch == 0 {
        repl_end = format!("{}\n", fence_chars);
        end_line_sel -= 1;
    }
    wrap_selection(buffer, false, &repl_start, &repl_end, None);
    buffer.set_selection(
        Position::new(start_line_sel, 0),
        Position::new(end_line_sel, 0),
    );
}

// ─────────────────────────────────────────────────────────────────────────────
// Indented Blocks
// ─────────────────────────────────────────────────────────────────────────────

fn unindent_block<B: EditorBuffer>(
    buffer: &mut B,
    cur_start: Position,
    cur_end: Position,
    tab_size: usize,
) {
    let count = buffer.line_count() as isize;
    let has_selection = cur_start != cur_end;

    let (block_start, block_end) = if has_selection {
        let mut block_end = cur_end.line as isize;
        if cur_end.ch == 0 {
            block_end -= 1;
        }
        (cur_start.line as isize, block_end)
    } else {
        // Scan outward through blank-or-indented lines
        let mut block_start = cur_start.line as isize;
        while block_start >= 0 {
            let text = buffer.get_line(block_start as usize).unwrap_or("");
            if !blank_re().is_match(text)
                && code_type(buffer, block_start as usize, None) != Some(CodeBlockKind::Indented)
            {
                block_start += 1;
                break;
            }
            block_start -= 1;
        }
        let mut block_end = cur_start.line as isize;
        while block_end < count {
            let text = buffer.get_line(block_end as usize).unwrap_or("");
            if !blank_re().is_match(text)
                && code_type(buffer, block_end as usize, None) != Some(CodeBlockKind::Indented)
            {
                block_end -= 1;
                break;
            }
            block_end += 1;
        }
        (block_start, block_end)
    };
    let block_start = block_start.clamp(0, (count - 1).max(0)) as usize;
    let block_end = block_end.clamp(0, (count - 1).max(0)) as usize;

    // If the line after the block is itself indented, insert a blank
    // separator so it stays a code block after the un-indent.
    let next = block_end + 1;
    let next_indented = buffer.get_line(next).map(str::to_string).map_or(false, |text| {
        buffer
            .token_at(Position::new(next, text.chars().count().saturating_sub(1)))
            .state
            .indented_code
    });

    buffer.begin_operation();
    if next_indented {
        buffer.insert_at("\n", Position::new(next, 0));
    }
    for line in block_start..=block_end {
        buffer.indent_line_subtract(line, tab_size);
    }
    buffer.end_operation();
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::TextBuffer;

    fn buffer_with_selection(text: &str, anchor: (usize, usize), head: (usize, usize)) -> TextBuffer {
        let mut buffer = TextBuffer::from_text(text);
        buffer.set_selection(
            Position::new(anchor.0, anchor.1),
            Position::new(head.0, head.1),
        );
        buffer
    }

    #[test]
    fn test_code_type_classification() {
        let buffer = TextBuffer::from_text("plain\na `span` b\n```\nbody\n```\n    indented");
        assert_eq!(code_type(&buffer, 0, None), None);
        assert_eq!(code_type(&buffer, 1, Some(4)), Some(CodeBlockKind::Single));
        assert_eq!(code_type(&buffer, 2, None), Some(CodeBlockKind::Fenced));
        assert_eq!(code_type(&buffer, 3, None), Some(CodeBlockKind::Fenced));
        assert_eq!(code_type(&buffer, 5, None), Some(CodeBlockKind::Indented));
        assert_eq!(code_type(&buffer, 9, None), None);
    }

    #[test]
    fn test_single_span_removal() {
        let mut buffer = buffer_with_selection("a `code` b", (0, 4), (0, 4));
        toggle_code_block(&mut buffer, "```", 4);
        assert_eq!(buffer.value(), "a code b");
        assert_eq!(buffer.cursor_start(), Position::new(0, 3));
    }

    #[test]
    fn test_wrap_cursor_in_backticks_mid_line() {
        let mut buffer = buffer_with_selection("foo", (0, 1), (0, 1));
        toggle_code_block(&mut buffer, "```", 4);
        assert_eq!(buffer.value(), "f``oo");
        assert_eq!(buffer.cursor_start(), Position::new(0, 2));
    }

    #[test]
    fn test_wrap_selection_in_backticks() {
        let mut buffer = buffer_with_selection("call foo now", (0, 5), (0, 8));
        toggle_code_block(&mut buffer, "```", 4);
        assert_eq!(buffer.value(), "call `foo` now");
    }

    #[test]
    fn test_multiline_selection_gets_fenced() {
        let mut buffer = buffer_with_selection("a\nb\n", (0, 0), (2, 0));
        toggle_code_block(&mut buffer, "```", 4);
        assert_eq!(buffer.value(), "```\na\nb\n```\n");
        assert_eq!(buffer.cursor_start(), Position::new(1, 0));
        assert_eq!(buffer.cursor_end(), Position::new(3, 0));
    }

    #[test]
    fn test_fence_symmetry_and_removal() {
        let mut buffer = buffer_with_selection("a\nb\n", (0, 0), (2, 0));
        toggle_code_block(&mut buffer, "```", 4);
        let fenced = buffer.value();
        let lines: Vec<&str> = fenced.split('\n').collect();
        assert_eq!(lines[0], lines[3]);

        // Cursor inside the block removes exactly the two fence lines
        buffer.set_selection(Position::new(1, 0), Position::new(1, 0));
        toggle_code_block(&mut buffer, "```", 4);
        assert_eq!(buffer.value(), "a\nb\n");
    }

    #[test]
    fn test_fence_removal_is_one_atomic_edit() {
        let mut buffer = buffer_with_selection("```\ncode\n```", (1, 2), (1, 2));
        let before = buffer.change_count();
        toggle_code_block(&mut buffer, "```", 4);
        // The closing fence had no trailing newline, so its line survives
        // empty after the text is deleted
        assert_eq!(buffer.value(), "code\n");
        assert_eq!(buffer.change_count(), before + 1);
    }

    #[test]
    fn test_fence_removal_with_cursor_on_opening_fence() {
        let mut buffer = buffer_with_selection("```\ncode\n```\nafter", (0, 1), (0, 1));
        toggle_code_block(&mut buffer, "```", 4);
        assert_eq!(buffer.value(), "code\nafter");
    }

    #[test]
    fn test_fence_removal_with_cursor_on_closing_fence() {
        let mut buffer = buffer_with_selection("```\ncode\n```\nafter", (2, 1), (2, 1));
        toggle_code_block(&mut buffer, "```", 4);
        assert_eq!(buffer.value(), "code\nafter");
    }

    #[test]
    fn test_fenced_partial_selection_splits_block_with_same_style() {
        let mut buffer = buffer_with_selection("~~~~\none\ntwo\nthree\n~~~~", (2, 0), (2, 3));
        toggle_code_block(&mut buffer, "```", 4);
        // New fences copy the enclosing block's tilde style
        assert_eq!(
            buffer.value(),
            "~~~~\none\n~~~~\ntwo\n~~~~\nthree\n~~~~"
        );
        assert_eq!(buffer.cursor_start(), Position::new(3, 0));
        assert_eq!(buffer.cursor_end(), Position::new(4, 0));
    }

    #[test]
    fn test_fenced_selection_touching_both_fences_removes_them() {
        let mut buffer = buffer_with_selection("```\none\ntwo\n```", (1, 0), (2, 3));
        toggle_code_block(&mut buffer, "```", 4);
        assert_eq!(buffer.value(), "one\ntwo\n");
        assert_eq!(buffer.cursor_start(), Position::new(0, 0));
        assert_eq!(buffer.cursor_end(), Position::new(2, 0));
    }

    #[test]
    fn test_cursor_at_line_start_inserts_fenced_block() {
        let mut buffer = buffer_with_selection("foo", (0, 0), (0, 0));
        toggle_code_block(&mut buffer, "```", 4);
        assert_eq!(buffer.value(), "```\n\n```foo");
        assert_eq!(buffer.cursor_start(), Position::new(1, 0));
    }

    #[test]
    fn test_indented_block_unindent_without_selection() {
        let mut buffer = buffer_with_selection(
            "    one\n    two\n    three",
            (1, 4),
            (1, 4),
        );
        toggle_code_block(&mut buffer, "```", 4);
        assert_eq!(buffer.value(), "one\ntwo\nthree");
    }

    #[test]
    fn test_indented_block_bounded_by_plain_text() {
        let mut buffer = buffer_with_selection(
            "para\n\n    one\n    two\n\npara",
            (2, 6),
            (2, 6),
        );
        toggle_code_block(&mut buffer, "```", 4);
        assert_eq!(buffer.value(), "para\n\none\ntwo\n\npara");
    }

    #[test]
    fn test_indented_selection_inserts_separator_before_following_code() {
        let mut buffer = buffer_with_selection(
            "    a\n    b\n    c",
            (0, 0),
            (1, 5),
        );
        toggle_code_block(&mut buffer, "```", 4);
        // Lines a and b lose their indent; a blank line keeps c a block
        assert_eq!(buffer.value(), "a\nb\n\n    c");
    }

    #[test]
    fn test_fence_grammar_matches_token_scanner() {
        // The toggle's line probe and the buffer's token scanner share
        // one fence pattern; they must agree on what opens a block.
        for (text, is_fence) in [
            ("```", true),
            ("~~~", true),
            ("  ````rust", true),
            ("``", false),
            ("text ```", false),
        ] {
            let buffer = TextBuffer::from_text(text);
            assert_eq!(fencing_line(&buffer, 0), is_fence, "probe on {:?}", text);
            assert_eq!(
                buffer.token_at(Position::new(0, 1)).state.fence_marker,
                is_fence,
                "scanner on {:?}",
                text
            );
        }
    }

    #[test]
    fn test_tilde_fence_detection() {
        let buffer = TextBuffer::from_text("~~~\ncode\n~~~");
        assert_eq!(code_type(&buffer, 1, None), Some(CodeBlockKind::Fenced));
        assert!(fencing_line(&buffer, 0));
        assert!(!fencing_line(&buffer, 1));
        assert!(!fencing_line(&buffer, -1));
    }
}
