//! In-memory buffer implementation
//!
//! [`TextBuffer`] backs the engine when no host editor component is
//! present. It stores the document as a line vector, tracks one
//! selection, and counts change notifications so callers can observe
//! edit batching.

use crate::string_utils::char_index_to_byte_index;

use super::token::{classify, scan_line_contexts};
use super::{EditorBuffer, Position, Selection, Token};

/// A plain line-vector text buffer with a single selection.
#[derive(Debug, Clone)]
pub struct TextBuffer {
    lines: Vec<String>,
    selection: Selection,
    /// Emitted change notifications. Grouped edits bump this once.
    change_count: usize,
    operation_depth: usize,
}

impl TextBuffer {
    /// Build a buffer from text. An empty string yields one empty line.
    pub fn from_text(text: &str) -> Self {
        Self {
            lines: text.split('\n').map(String::from).collect(),
            selection: Selection::caret(Position::new(0, 0)),
            change_count: 0,
            operation_depth: 0,
        }
    }

    /// The full buffer contents, lines joined with `\n`.
    pub fn value(&self) -> String {
        self.lines.join("\n")
    }

    /// Number of change notifications emitted so far.
    pub fn change_count(&self) -> usize {
        self.change_count
    }

    fn notify(&mut self) {
        if self.operation_depth == 0 {
            self.change_count += 1;
        }
    }

    /// Clamp a position to the buffer. A line index past the end resolves
    /// to the end of the last line; a character offset past the line end
    /// (including the end-of-line sentinel) resolves to the line end.
    fn clamp(&self, pos: Position) -> Position {
        if pos.line >= self.lines.len() {
            let line = self.lines.len() - 1;
            return Position::new(line, self.lines[line].chars().count());
        }
        let ch = pos.ch.min(self.lines[pos.line].chars().count());
        Position::new(pos.line, ch)
    }

    /// Byte offset within a line for a (clamped) character offset.
    fn byte_at(&self, pos: Position) -> usize {
        char_index_to_byte_index(&self.lines[pos.line], pos.ch)
    }
}

impl EditorBuffer for TextBuffer {
    fn line_count(&self) -> usize {
        self.lines.len()
    }

    fn get_line(&self, line: usize) -> Option<&str> {
        self.lines.get(line).map(String::as_str)
    }

    fn token_at(&self, pos: Position) -> Token {
        let contexts = scan_line_contexts(&self.lines);
        classify(&self.lines, &contexts, pos)
    }

    fn cursor_start(&self) -> Position {
        self.selection.start()
    }

    fn cursor_end(&self) -> Position {
        self.selection.end()
    }

    fn set_selection(&mut self, anchor: Position, head: Position) {
        self.selection = Selection::new(anchor, head);
    }

    fn get_selection(&self) -> String {
        let start = self.clamp(self.selection.start());
        let end = self.clamp(self.selection.end());
        if start.line == end.line {
            let line = &self.lines[start.line];
            return line[self.byte_at(start)..self.byte_at(end)].to_string();
        }

        let mut parts = vec![self.lines[start.line][self.byte_at(start)..].to_string()];
        for line in &self.lines[start.line + 1..end.line] {
            parts.push(line.clone());
        }
        parts.push(self.lines[end.line][..self.byte_at(end)].to_string());
        parts.join("\n")
    }

    fn replace_range(&mut self, text: &str, from: Position, to: Position) {
        let (from, to) = if from <= to { (from, to) } else { (to, from) };
        let from = self.clamp(from);
        let to = self.clamp(to);

        let prefix = self.lines[from.line][..self.byte_at(from)].to_string();
        let suffix = self.lines[to.line][self.byte_at(to)..].to_string();

        let mut new_lines: Vec<String> = text.split('\n').map(String::from).collect();
        new_lines[0] = format!("{}{}", prefix, new_lines[0]);
        let last = new_lines.len() - 1;
        new_lines[last] = format!("{}{}", new_lines[last], suffix);

        self.lines.splice(from.line..=to.line, new_lines);

        // Keep the selection inside the buffer after the edit.
        let anchor = self.clamp(self.selection.anchor);
        let head = self.clamp(self.selection.head);
        self.selection = Selection::new(anchor, head);

        self.notify();
    }

    fn replace_selection(&mut self, text: &str) {
        let start = self.clamp(self.selection.start());
        let end = self.clamp(self.selection.end());
        self.replace_range(text, start, end);

        // Collapse the cursor to the end of the insertion.
        let inserted_lines = text.split('\n').count();
        let caret = if inserted_lines == 1 {
            Position::new(start.line, start.ch + text.chars().count())
        } else {
            let last_len = text
                .rsplit('\n')
                .next()
                .map(|s| s.chars().count())
                .unwrap_or(0);
            Position::new(start.line + inserted_lines - 1, last_len)
        };
        self.selection = Selection::caret(caret);
    }

    fn indent_line_subtract(&mut self, line: usize, width: usize) {
        let Some(text) = self.lines.get(line) else {
            return;
        };

        let trimmed = if let Some(rest) = text.strip_prefix('\t') {
            rest.to_string()
        } else {
            let spaces = text
                .bytes()
                .take(width)
                .take_while(|&b| b == b' ')
                .count();
            text[spaces..].to_string()
        };

        if trimmed.len() != text.len() {
            self.lines[line] = trimmed;
            self.notify();
        }
    }

    fn begin_operation(&mut self) {
        self.operation_depth += 1;
    }

    fn end_operation(&mut self) {
        debug_assert!(self.operation_depth > 0, "unbalanced end_operation");
        self.operation_depth = self.operation_depth.saturating_sub(1);
        if self.operation_depth == 0 {
            self.change_count += 1;
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
