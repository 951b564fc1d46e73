//! Text buffer collaborator surface
//!
//! The formatting engine never owns a text editor. It reads and mutates
//! the host's buffer through the [`EditorBuffer`] trait, which mirrors the
//! minimum surface a code-editor component exposes: line access, token
//! classification at a position, cursor/selection access, range
//! replacement, and an operation wrapper that batches several
//! replacements into a single change notification.
//!
//! [`TextBuffer`] is the crate's own in-memory implementation, complete
//! with a Markdown line/span classifier, used by the test suite and by
//! hosts that do not bring their own editor component.

mod text_buffer;
mod token;

pub use text_buffer::TextBuffer;
pub(crate) use token::fence_open_re;
pub use token::{Token, TokenState, TokenTag};

// ─────────────────────────────────────────────────────────────────────────────
// Positions and Selections
// ─────────────────────────────────────────────────────────────────────────────

/// Sentinel character offset meaning "end of line".
///
/// Large enough to exceed any realistic line length; implementations clamp
/// it to the actual line end when resolving a range.
pub const END_OF_LINE: usize = usize::MAX;

/// A cursor location: zero-based line and character offset.
///
/// `ch` counts characters, not bytes, and may exceed the line length
/// (see [`END_OF_LINE`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Position {
    /// Zero-based line index
    pub line: usize,
    /// Zero-based character offset within the line
    pub ch: usize,
}

impl Position {
    pub fn new(line: usize, ch: usize) -> Self {
        Self { line, ch }
    }
}

/// An ordered pair of positions. The anchor may come after the head;
/// [`Selection::start`] and [`Selection::end`] are the position-order
/// normalized endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selection {
    pub anchor: Position,
    pub head: Position,
}

impl Selection {
    pub fn new(anchor: Position, head: Position) -> Self {
        Self { anchor, head }
    }

    /// Collapsed selection (a plain cursor).
    pub fn caret(pos: Position) -> Self {
        Self {
            anchor: pos,
            head: pos,
        }
    }

    /// The earlier of the two endpoints.
    pub fn start(&self) -> Position {
        self.anchor.min(self.head)
    }

    /// The later of the two endpoints.
    pub fn end(&self) -> Position {
        self.anchor.max(self.head)
    }

    /// True when the selection is a plain cursor.
    pub fn is_empty(&self) -> bool {
        self.anchor == self.head
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// The Buffer Trait
// ─────────────────────────────────────────────────────────────────────────────

/// The surface the formatting engine consumes from a host editor buffer.
///
/// Coordinates are (line, character) pairs. Out-of-range reads return
/// `None`/empty rather than failing: a position with no backing text has
/// no classification, which the engine treats as "no active construct".
pub trait EditorBuffer {
    /// Number of lines in the buffer. An empty buffer has one empty line.
    fn line_count(&self) -> usize;

    /// Text of line `line`, without its trailing newline. `None` when the
    /// index is outside the buffer.
    fn get_line(&self, line: usize) -> Option<&str>;

    /// Token classification at a position. Positions without type
    /// information yield an empty token.
    fn token_at(&self, pos: Position) -> Token;

    /// The position-order earlier endpoint of the current selection.
    fn cursor_start(&self) -> Position;

    /// The position-order later endpoint of the current selection.
    fn cursor_end(&self) -> Position;

    /// Replace the current selection (anchor and head).
    fn set_selection(&mut self, anchor: Position, head: Position);

    /// The currently selected text, lines joined with `\n`.
    fn get_selection(&self) -> String;

    /// Replace the text between `from` and `to` with `text`. Endpoints in
    /// either order; character offsets past the line end clamp to it.
    fn replace_range(&mut self, text: &str, from: Position, to: Position);

    /// Insert `text` at a position without removing anything.
    fn insert_at(&mut self, text: &str, at: Position) {
        self.replace_range(text, at, at);
    }

    /// Replace the selected text, leaving the cursor after the insertion.
    fn replace_selection(&mut self, text: &str);

    /// Remove one unit of indentation from the start of a line. `width`
    /// is the number of leading spaces that make up one indent level; a
    /// leading tab always counts as one level on its own.
    fn indent_line_subtract(&mut self, line: usize, width: usize);

    /// Begin an edit group. Until the matching [`end_operation`], the
    /// buffer must emit no change notifications.
    ///
    /// [`end_operation`]: EditorBuffer::end_operation
    fn begin_operation(&mut self);

    /// End an edit group, emitting a single change notification for
    /// everything since [`begin_operation`].
    ///
    /// [`begin_operation`]: EditorBuffer::begin_operation
    fn end_operation(&mut self);
}
