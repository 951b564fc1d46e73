//! Markdown formatting toggles
//!
//! Each submodule covers one construct family: wrapping markers
//! ([`inline`]), line prefixes ([`line`]), heading hashes ([`heading`]),
//! the three code forms ([`code`]), and marker stripping ([`clean`]).
//! [`state`] classifies what is active at a position; the toggles read it
//! to decide between inserting and removing markers.
//!
//! Everything here operates on an [`EditorBuffer`](crate::buffer::EditorBuffer)
//! and computes edits in (line, character) coordinates. The preview no-op
//! guard lives one level up in [`Editor`](crate::editor::Editor); these
//! functions always apply.

pub mod clean;
pub mod code;
pub mod heading;
pub mod inline;
pub mod line;
pub mod state;

use crate::buffer::{EditorBuffer, Position, END_OF_LINE};

/// Replace the full contents of a line, regardless of its length.
pub(crate) fn replace_whole_line<B: EditorBuffer>(buffer: &mut B, line: usize, text: &str) {
    buffer.replace_range(
        text,
        Position::new(line, 0),
        Position::new(line, END_OF_LINE),
    );
}
