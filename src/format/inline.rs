//! Inline wrapping-marker toggles
//!
//! Bold, italic, and strikethrough wrap a selection in marker pairs.
//! Links and images use a two-part template with a `#url#` placeholder.
//! Removal works on the current line only: the last marker before the
//! cursor and the first marker after it are stripped, and the selection
//! shifts left by the marker width.

use regex::Regex;
use std::sync::OnceLock;

use crate::buffer::EditorBuffer;
use crate::string_utils::char_index_to_byte_index;

use super::replace_whole_line;
use super::state::state_at;

// ─────────────────────────────────────────────────────────────────────────────
// Bold / Italic / Strikethrough
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy)]
enum WrapStyle {
    Bold,
    Italic,
    Strikethrough,
}

impl WrapStyle {
    /// Marker spellings recognized when removing an active construct.
    fn removal_markers(self) -> &'static [&'static str] {
        match self {
            WrapStyle::Bold => &["**", "__"],
            WrapStyle::Italic => &["*", "_"],
            // A strikethrough position can also sit in a bold span, so
            // both spellings are candidates for removal.
            WrapStyle::Strikethrough => &["**", "~~"],
        }
    }

    /// Marker spellings stripped out of the selection before wrapping.
    fn embedded_markers(self) -> &'static [&'static str] {
        match self {
            WrapStyle::Bold => &["**", "__"],
            WrapStyle::Italic => &["*", "_"],
            WrapStyle::Strikethrough => &["~~"],
        }
    }

    /// How far the selection shifts when a marker pair is removed.
    fn marker_width(self) -> usize {
        match self {
            WrapStyle::Bold | WrapStyle::Strikethrough => 2,
            WrapStyle::Italic => 1,
        }
    }
}

/// Toggle bold around the selection. `marker` is the configured bold
/// style, `**` or `__`.
pub fn toggle_bold<B: EditorBuffer>(buffer: &mut B, marker: &str) {
    let active = state_at(buffer, None).bold;
    toggle_wrap(buffer, WrapStyle::Bold, active, marker, marker);
}

/// Toggle italic around the selection. `marker` is `*` or `_`.
pub fn toggle_italic<B: EditorBuffer>(buffer: &mut B, marker: &str) {
    let active = state_at(buffer, None).italic;
    toggle_wrap(buffer, WrapStyle::Italic, active, marker, marker);
}

/// Toggle strikethrough around the selection.
pub fn toggle_strikethrough<B: EditorBuffer>(buffer: &mut B) {
    let active = state_at(buffer, None).strikethrough;
    toggle_wrap(buffer, WrapStyle::Strikethrough, active, "~~", "~~");
}

fn toggle_wrap<B: EditorBuffer>(
    buffer: &mut B,
    style: WrapStyle,
    active: bool,
    start_chars: &str,
    end_chars: &str,
) {
    let mut start_point = buffer.cursor_start();
    let mut end_point = buffer.cursor_end();

    if active {
        let text = buffer.get_line(start_point.line).unwrap_or("").to_string();
        let cut = char_index_to_byte_index(&text, start_point.ch);
        let before = remove_last_marker(&text[..cut], style.removal_markers());
        let after = remove_first_marker(&text[cut..], style.removal_markers());
        replace_whole_line(buffer, start_point.line, &format!("{}{}", before, after));

        let width = style.marker_width();
        start_point.ch = start_point.ch.saturating_sub(width);
        end_point.ch = end_point.ch.saturating_sub(width);
    } else {
        let mut text = buffer.get_selection();
        for marker in style.embedded_markers() {
            text = text.replace(marker, "");
        }
        buffer.replace_selection(&format!("{}{}{}", start_chars, text, end_chars));

        start_point.ch += start_chars.chars().count();
        end_point.ch = start_point.ch + text.chars().count();
    }

    buffer.set_selection(start_point, end_point);
}

/// Remove the last occurrence of any of `markers` from `text`.
fn remove_last_marker(text: &str, markers: &[&str]) -> String {
    let found = markers
        .iter()
        .filter_map(|m| text.rfind(m).map(|i| (i, m.len())))
        .max_by_key(|&(i, _)| i);
    match found {
        Some((i, len)) => format!("{}{}", &text[..i], &text[i + len..]),
        None => text.to_string(),
    }
}

/// Remove the first occurrence of any of `markers` from `text`.
fn remove_first_marker(text: &str, markers: &[&str]) -> String {
    let found = markers
        .iter()
        .filter_map(|m| text.find(m).map(|i| (i, m.len())))
        .min_by_key(|&(i, _)| i);
    match found {
        Some((i, len)) => format!("{}{}", &text[..i], &text[i + len..]),
        None => text.to_string(),
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Links and Images
// ─────────────────────────────────────────────────────────────────────────────

fn link_suffix_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\]\(.*?\)").expect("link suffix pattern compiles"))
}

/// Toggle a link around the selection. `before`/`after` form the
/// insertion template (normally `[` and `](#url#)`).
pub fn toggle_link<B: EditorBuffer>(buffer: &mut B, before: &str, after: &str, url: &str) {
    if !state_at(buffer, None).link {
        wrap_selection(buffer, false, before, after, Some(url));
        return;
    }
    remove_link(buffer, false, before.chars().count());
}

/// Toggle an image around the selection. Template is normally `![` and
/// `](#url#)`.
pub fn toggle_image<B: EditorBuffer>(buffer: &mut B, before: &str, after: &str, url: &str) {
    if !state_at(buffer, None).image {
        wrap_selection(buffer, false, before, after, Some(url));
        return;
    }
    remove_link(buffer, true, before.chars().count());
}

fn remove_link<B: EditorBuffer>(buffer: &mut B, image: bool, lead_in_len: usize) {
    let mut start_point = buffer.cursor_start();
    let mut end_point = buffer.cursor_end();

    let text = buffer.get_line(start_point.line).unwrap_or("").to_string();
    let cut = char_index_to_byte_index(&text, start_point.ch);
    let before = if image {
        remove_image_lead_in(&text[..cut])
    } else {
        remove_link_lead_in(&text[..cut])
    };
    let after = link_suffix_re().replace(&text[cut..], "").into_owned();
    replace_whole_line(buffer, start_point.line, &format!("{}{}", before, after));

    start_point.ch = start_point.ch.saturating_sub(lead_in_len);
    end_point.ch = end_point.ch.saturating_sub(lead_in_len);
    buffer.set_selection(start_point, end_point);
}

/// Strip the last `[` that is not part of a `![`, together with the
/// character preceding it.
fn remove_link_lead_in(text: &str) -> String {
    for (i, _) in text.match_indices('[').collect::<Vec<_>>().into_iter().rev() {
        let Some(prev) = text[..i].chars().next_back() else {
            continue;
        };
        if prev != '!' {
            let prev_start = i - prev.len_utf8();
            return format!("{}{}", &text[..prev_start], &text[i + 1..]);
        }
    }
    text.to_string()
}

/// Strip a trailing `![` lead-in.
fn remove_image_lead_in(text: &str) -> String {
    match text.strip_suffix("![") {
        Some(rest) => rest.to_string(),
        None => text.to_string(),
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Template Insertion
// ─────────────────────────────────────────────────────────────────────────────

/// Wrap the selection in a `before`/`after` pair, substituting `#url#`
/// when a URL is supplied. With `active` set, the construct is already
/// present and the line is left unchanged.
pub(crate) fn wrap_selection<B: EditorBuffer>(
    buffer: &mut B,
    active: bool,
    before: &str,
    after: &str,
    url: Option<&str>,
) {
    let mut before = before.to_string();
    let mut after = after.to_string();
    if let Some(url) = url {
        before = before.replacen("#url#", url, 1);
        after = after.replacen("#url#", url, 1);
    }

    let mut start_point = buffer.cursor_start();
    let mut end_point = buffer.cursor_end();

    if active {
        let text = buffer.get_line(start_point.line).unwrap_or("").to_string();
        replace_whole_line(buffer, start_point.line, &text);
    } else {
        let text = buffer.get_selection();
        buffer.replace_selection(&format!("{}{}{}", before, text, after));

        start_point.ch += before.chars().count();
        end_point.ch += before.chars().count();
    }
    buffer.set_selection(start_point, end_point);
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
