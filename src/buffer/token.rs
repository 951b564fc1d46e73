//! Token classification for the built-in text buffer
//!
//! Host editor components classify buffer positions into semantic tags
//! (strong, em, comment, quote, ...) plus nested code substate. The
//! formatting engine only ever reads that classification; this module
//! reproduces it for [`TextBuffer`](super::TextBuffer) with a two-pass
//! scan: a whole-buffer pass that tracks fenced/indented code context per
//! line, and a per-line pass that pairs inline markers around the
//! requested character offset.

use regex::Regex;
use std::sync::OnceLock;

use super::Position;

// ─────────────────────────────────────────────────────────────────────────────
// Token Types
// ─────────────────────────────────────────────────────────────────────────────

/// A semantic tag attached to a buffer position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenTag {
    /// Bold text
    Strong,
    /// Italic text
    Em,
    /// Strikethrough text
    Strikethrough,
    /// Code: inline span, fenced block, or indented block
    Comment,
    /// Block quote (some classifiers emit this tag for quoted text)
    Atom,
    /// Block quote
    Quote,
    /// Link text or URL
    Link,
    /// Image text or URL
    Image,
    /// Heading of the given level (1-6)
    Header(u8),
    /// List line; ordered vs unordered is resolved from the line text
    ListMarker,
}

/// Nested formatting substate carried alongside the tags.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TokenState {
    /// The fence marker sequence while inside a fenced code block
    /// (including its fence lines), e.g. "```" or "~~~~".
    pub fenced_chars: Option<String>,
    /// True when the position sits in an indentation-based code block.
    pub indented_code: bool,
    /// True when the line itself is a fence marker line.
    pub fence_marker: bool,
}

/// The classification of a buffer position: a set of semantic tags plus
/// code substate. Read-only input to the formatting engine.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Token {
    pub tags: Vec<TokenTag>,
    pub state: TokenState,
}

impl Token {
    /// A token with no type information.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Whether the token carries the given tag.
    pub fn has(&self, tag: &TokenTag) -> bool {
        self.tags.contains(tag)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Line Context Scan (code blocks)
// ─────────────────────────────────────────────────────────────────────────────

/// Per-line code context, computed for the whole buffer in one pass.
#[derive(Debug, Clone, Default)]
pub(crate) struct LineContext {
    /// Fence sequence when the line belongs to a fenced block
    /// (fence lines included).
    pub fenced_chars: Option<String>,
    /// True for the opening/closing fence lines themselves.
    pub fence_marker: bool,
    /// True for indentation-based code lines.
    pub indented: bool,
}

/// A fence-opening line: optional indentation, then a run of at least
/// three backticks or tildes. Shared with the code toggle so both sides
/// agree on the fence grammar.
pub(crate) fn fence_open_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\s*(`{3,}|~{3,})").expect("fence pattern compiles"))
}

fn indent_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^(?: {4}|\t)").expect("indent pattern compiles"))
}

fn blank_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\s*$").expect("blank pattern compiles"))
}

/// Scan the whole buffer, tracking fenced-block state and indented-code
/// lines. A fence closes on the next fence line using the same marker
/// character; an unclosed fence runs to the end of the buffer.
pub(crate) fn scan_line_contexts(lines: &[String]) -> Vec<LineContext> {
    let mut contexts = Vec::with_capacity(lines.len());
    let mut open_fence: Option<String> = None;

    for line in lines {
        let mut ctx = LineContext::default();

        match &open_fence {
            None => {
                if let Some(caps) = fence_open_re().captures(line) {
                    let chars = caps[1].to_string();
                    ctx.fenced_chars = Some(chars.clone());
                    ctx.fence_marker = true;
                    open_fence = Some(chars);
                } else if indent_re().is_match(line) && !blank_re().is_match(line) {
                    ctx.indented = true;
                }
            }
            Some(chars) => {
                ctx.fenced_chars = Some(chars.clone());
                let closes = fence_open_re()
                    .captures(line)
                    .map(|caps| caps[1].starts_with(chars.as_bytes()[0] as char))
                    .unwrap_or(false);
                if closes {
                    ctx.fence_marker = true;
                    open_fence = None;
                }
            }
        }

        contexts.push(ctx);
    }

    contexts
}

// ─────────────────────────────────────────────────────────────────────────────
// Position Classification
// ─────────────────────────────────────────────────────────────────────────────

fn heading_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^(#{1,6})\s").expect("heading pattern compiles"))
}

fn quote_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\s*>\s").expect("quote pattern compiles"))
}

fn list_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\s*(?:[*+-]|\d+\.)\s").expect("list pattern compiles"))
}

fn image_span_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"!\[[^\]]*\]\([^)]*\)").expect("image pattern compiles"))
}

fn link_span_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\[[^\]]*\]\([^)]*\)").expect("link pattern compiles"))
}

/// Classify `pos` against the given lines and their scanned contexts.
pub(crate) fn classify(lines: &[String], contexts: &[LineContext], pos: Position) -> Token {
    let (line, ctx) = match (lines.get(pos.line), contexts.get(pos.line)) {
        (Some(line), Some(ctx)) => (line.as_str(), ctx),
        _ => return Token::empty(),
    };

    // Code context wins over everything else.
    if let Some(chars) = &ctx.fenced_chars {
        return Token {
            tags: vec![TokenTag::Comment],
            state: TokenState {
                fenced_chars: Some(chars.clone()),
                indented_code: false,
                fence_marker: ctx.fence_marker,
            },
        };
    }
    if ctx.indented {
        return Token {
            tags: vec![TokenTag::Comment],
            state: TokenState {
                indented_code: true,
                ..TokenState::default()
            },
        };
    }

    let mut tags = Vec::new();

    // Line-level constructs apply to every position on the line.
    if let Some(caps) = heading_re().captures(line) {
        tags.push(TokenTag::Header(caps[1].len() as u8));
    }
    if quote_re().is_match(line) {
        tags.push(TokenTag::Quote);
    }
    if list_re().is_match(line) {
        tags.push(TokenTag::ListMarker);
    }

    // Inline spans around the character offset.
    tags.extend(inline_tags(line, pos.ch));

    Token {
        tags,
        state: TokenState::default(),
    }
}

/// Tags for the inline spans that contain character offset `ch`.
fn inline_tags(line: &str, ch: usize) -> Vec<TokenTag> {
    let chars: Vec<char> = line.chars().collect();
    let mut tags = Vec::new();

    // Inline code spans suppress other inline formatting.
    let code_spans = pair_single_marker(&chars, '`');
    if code_spans.iter().any(|&(o, c)| inside(ch, o, c, 1)) {
        tags.push(TokenTag::Comment);
        return tags;
    }

    // Images first: the link rule only fires when the position is not
    // already classified as an image.
    let byte_ch = crate::string_utils::char_index_to_byte_index(line, ch);
    let mut in_image = false;
    for m in image_span_re().find_iter(line) {
        if byte_ch > m.start() && byte_ch <= m.end() {
            tags.push(TokenTag::Image);
            in_image = true;
            break;
        }
    }
    if !in_image {
        for m in link_span_re().find_iter(line) {
            // Skip link-looking spans that are the tail of an image.
            if m.start() > 0 && line.as_bytes()[m.start() - 1] == b'!' {
                continue;
            }
            if byte_ch > m.start() && byte_ch <= m.end() {
                tags.push(TokenTag::Link);
                break;
            }
        }
    }

    let bold_pairs = pair_double_markers(&chars, &[('*', '*'), ('_', '_')]);
    let strike_pairs = pair_double_markers(&chars, &[('~', '~')]);

    if bold_pairs.iter().any(|&(o, c)| inside(ch, o, c, 2)) {
        tags.push(TokenTag::Strong);
    }
    if strike_pairs.iter().any(|&(o, c)| inside(ch, o, c, 2)) {
        tags.push(TokenTag::Strikethrough);
    }

    // Single * or _ markers, excluding characters consumed by bold pairs.
    let consumed: Vec<(usize, usize)> = bold_pairs
        .iter()
        .flat_map(|&(o, c)| [(o, o + 1), (c, c + 1)])
        .collect();
    let italic_pairs = pair_single_markers_excluding(&chars, &['*', '_'], &consumed);
    if italic_pairs.iter().any(|&(o, c)| inside(ch, o, c, 1)) {
        tags.push(TokenTag::Em);
    }

    tags
}

/// Whether character offset `ch` falls between a marker pair: after the
/// opening marker of length `len` starting at `open`, and no later than
/// the closing marker starting at `close`.
fn inside(ch: usize, open: usize, close: usize, len: usize) -> bool {
    ch >= open + len && ch <= close
}

/// Pair consecutive occurrences of a single-character marker.
fn pair_single_marker(chars: &[char], marker: char) -> Vec<(usize, usize)> {
    let positions: Vec<usize> = chars
        .iter()
        .enumerate()
        .filter(|(_, &c)| c == marker)
        .map(|(i, _)| i)
        .collect();
    positions.chunks(2).filter(|p| p.len() == 2).map(|p| (p[0], p[1])).collect()
}

/// Pair consecutive occurrences of two-character markers such as `**`,
/// `__`, or `~~`. Occurrences of different marker characters pair
/// independently.
fn pair_double_markers(chars: &[char], kinds: &[(char, char)]) -> Vec<(usize, usize)> {
    let mut pairs = Vec::new();
    for &(a, b) in kinds {
        let mut positions = Vec::new();
        let mut i = 0;
        while i + 1 < chars.len() {
            if chars[i] == a && chars[i + 1] == b {
                positions.push(i);
                i += 2;
            } else {
                i += 1;
            }
        }
        pairs.extend(
            positions
                .chunks(2)
                .filter(|p| p.len() == 2)
                .map(|p| (p[0], p[1])),
        );
    }
    pairs
}

/// Pair single-character markers, skipping positions already consumed by
/// a longer marker (the `**` halves when pairing `*` for italic).
fn pair_single_markers_excluding(
    chars: &[char],
    markers: &[char],
    consumed: &[(usize, usize)],
) -> Vec<(usize, usize)> {
    let mut pairs = Vec::new();
    for &marker in markers {
        let positions: Vec<usize> = chars
            .iter()
            .enumerate()
            .filter(|(i, &c)| {
                c == marker && !consumed.iter().any(|&(s, e)| *i >= s && *i < e)
            })
            .map(|(i, _)| i)
            .collect();
        pairs.extend(
            positions
                .chunks(2)
                .filter(|p| p.len() == 2)
                .map(|p| (p[0], p[1])),
        );
    }
    pairs
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
