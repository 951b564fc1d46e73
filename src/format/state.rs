//! State classifier
//!
//! Maps a buffer position's token set to the set of active Markdown
//! construct flags. The toggles consult this to decide whether to insert
//! or remove markers.

use regex::Regex;
use std::sync::OnceLock;

use crate::buffer::{EditorBuffer, Position, TokenTag};

/// The Markdown constructs active at a buffer position.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActiveState {
    pub bold: bool,
    pub italic: bool,
    pub strikethrough: bool,
    pub code: bool,
    pub quote: bool,
    pub link: bool,
    pub image: bool,
    pub ordered_list: bool,
    pub unordered_list: bool,
    /// Heading level 1-6 when the position is on a heading line.
    pub heading: Option<u8>,
}

fn ordered_line_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\s*\d+\.\s").expect("ordered list pattern compiles"))
}

/// Classify the construct state at `pos`, defaulting to the selection
/// start. A position without token information yields an empty state.
pub fn state_at<B: EditorBuffer>(buffer: &B, pos: Option<Position>) -> ActiveState {
    let pos = pos.unwrap_or_else(|| buffer.cursor_start());
    let token = buffer.token_at(pos);

    let mut state = ActiveState::default();
    for tag in &token.tags {
        match tag {
            TokenTag::Strong => state.bold = true,
            TokenTag::Em => state.italic = true,
            TokenTag::Strikethrough => state.strikethrough = true,
            TokenTag::Comment => state.code = true,
            TokenTag::Atom | TokenTag::Quote => state.quote = true,
            // A link span inside an image span counts as the image only.
            TokenTag::Link => {
                if !state.image {
                    state.link = true;
                }
            }
            TokenTag::Image => state.image = true,
            TokenTag::Header(level) => state.heading = Some(*level),
            // Ordered vs unordered is resolved from the line text.
            TokenTag::ListMarker => {
                let line = buffer.get_line(pos.line).unwrap_or("");
                if ordered_line_re().is_match(line) {
                    state.ordered_list = true;
                } else {
                    state.unordered_list = true;
                }
            }
        }
    }
    state
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
