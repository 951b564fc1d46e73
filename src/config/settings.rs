//! Engine options
//!
//! This module defines the `Options` struct holding every recognized
//! formatting option and its default, with serde support for JSON
//! persistence. Missing fields fall back to their defaults field by
//! field; no generic merging is involved.

use serde::{Deserialize, Serialize};

// ─────────────────────────────────────────────────────────────────────────────
// Marker Styles
// ─────────────────────────────────────────────────────────────────────────────

/// Marker spellings used when a construct is toggled on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockStyles {
    /// Bold marker: `**` or `__`
    #[serde(default = "default_bold_style")]
    pub bold: String,
    /// Italic marker: `*` or `_`
    #[serde(default = "default_italic_style")]
    pub italic: String,
    /// Fence sequence for new code blocks: ``` or ~~~
    #[serde(default = "default_code_style")]
    pub code: String,
}

fn default_bold_style() -> String {
    "**".to_string()
}

fn default_italic_style() -> String {
    "*".to_string()
}

fn default_code_style() -> String {
    "```".to_string()
}

impl Default for BlockStyles {
    fn default() -> Self {
        Self {
            bold: default_bold_style(),
            italic: default_italic_style(),
            code: default_code_style(),
        }
    }
}

/// Bullet character for unordered lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum UnorderedListStyle {
    #[default]
    #[serde(rename = "*")]
    Asterisk,
    #[serde(rename = "-")]
    Dash,
    #[serde(rename = "+")]
    Plus,
}

impl UnorderedListStyle {
    pub fn as_char(self) -> char {
        match self {
            UnorderedListStyle::Asterisk => '*',
            UnorderedListStyle::Dash => '-',
            UnorderedListStyle::Plus => '+',
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Insertion Templates
// ─────────────────────────────────────────────────────────────────────────────

/// A two-part insertion template wrapped around the selection. `#url#`
/// in either part is substituted with the target URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextPair {
    pub before: String,
    pub after: String,
}

impl TextPair {
    fn new(before: &str, after: &str) -> Self {
        Self {
            before: before.to_string(),
            after: after.to_string(),
        }
    }
}

/// Templates for the drawing commands.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InsertTexts {
    #[serde(default = "default_link_text")]
    pub link: TextPair,
    #[serde(default = "default_image_text")]
    pub image: TextPair,
    #[serde(default = "default_uploaded_image_text")]
    pub uploaded_image: TextPair,
    #[serde(default = "default_horizontal_rule_text")]
    pub horizontal_rule: TextPair,
    #[serde(default = "default_table_text")]
    pub table: TextPair,
}

fn default_link_text() -> TextPair {
    TextPair::new("[", "](#url#)")
}

fn default_image_text() -> TextPair {
    TextPair::new("![", "](#url#)")
}

fn default_uploaded_image_text() -> TextPair {
    TextPair::new("![](#url#)", "")
}

fn default_horizontal_rule_text() -> TextPair {
    TextPair::new("", "\n\n-----\n\n")
}

fn default_table_text() -> TextPair {
    TextPair::new(
        "",
        "\n\n| Column 1 | Column 2 | Column 3 |\n| -------- | -------- | -------- |\n| Text     | Text     | Text     |\n\n",
    )
}

impl Default for InsertTexts {
    fn default() -> Self {
        Self {
            link: default_link_text(),
            image: default_image_text(),
            uploaded_image: default_uploaded_image_text(),
            horizontal_rule: default_horizontal_rule_text(),
            table: default_table_text(),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Options
// ─────────────────────────────────────────────────────────────────────────────

/// All user-configurable engine options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Options {
    pub block_styles: BlockStyles,
    pub insert_texts: InsertTexts,
    pub unordered_list_style: UnorderedListStyle,
    /// Whether the link/image commands require a caller-supplied URL
    /// (a cancelled prompt aborts the command).
    pub prompt_urls: bool,
    /// Spaces per indent level for indented code blocks.
    pub tab_size: u8,
    /// Whether entering side-by-side preview also enters fullscreen.
    pub side_by_side_fullscreen: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            block_styles: BlockStyles::default(),
            insert_texts: InsertTexts::default(),
            unordered_list_style: UnorderedListStyle::default(),
            prompt_urls: false,
            tab_size: 4,
            side_by_side_fullscreen: true,
        }
    }
}

impl Options {
    pub const MIN_TAB_SIZE: u8 = 1;
    pub const MAX_TAB_SIZE: u8 = 8;

    /// Clamp out-of-range values and reset unrecognized marker styles.
    pub fn sanitize(&mut self) {
        self.tab_size = self.tab_size.clamp(Self::MIN_TAB_SIZE, Self::MAX_TAB_SIZE);

        if self.block_styles.bold != "**" && self.block_styles.bold != "__" {
            self.block_styles.bold = default_bold_style();
        }
        if self.block_styles.italic != "*" && self.block_styles.italic != "_" {
            self.block_styles.italic = default_italic_style();
        }
        let code = &self.block_styles.code;
        if !code.starts_with("```") && !code.starts_with("~~~") {
            self.block_styles.code = default_code_style();
        }
    }

    /// Deserialize and sanitize in one step.
    pub fn from_json_sanitized(json: &str) -> Result<Self, serde_json::Error> {
        let mut options: Options = serde_json::from_str(json)?;
        options.sanitize();
        Ok(options)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_options() {
        let options = Options::default();
        assert_eq!(options.block_styles.bold, "**");
        assert_eq!(options.block_styles.italic, "*");
        assert_eq!(options.block_styles.code, "```");
        assert_eq!(options.unordered_list_style, UnorderedListStyle::Asterisk);
        assert!(!options.prompt_urls);
        assert_eq!(options.tab_size, 4);
        assert!(options.side_by_side_fullscreen);
    }

    #[test]
    fn test_default_insert_texts() {
        let texts = InsertTexts::default();
        assert_eq!(texts.link.before, "[");
        assert_eq!(texts.link.after, "](#url#)");
        assert_eq!(texts.image.before, "![");
        assert!(texts.horizontal_rule.after.contains("-----"));
        assert!(texts.table.after.contains("| Column 1 |"));
    }

    #[test]
    fn test_sanitize_tab_size() {
        let mut options = Options {
            tab_size: 0,
            ..Options::default()
        };
        options.sanitize();
        assert_eq!(options.tab_size, Options::MIN_TAB_SIZE);

        options.tab_size = 100;
        options.sanitize();
        assert_eq!(options.tab_size, Options::MAX_TAB_SIZE);
    }

    #[test]
    fn test_sanitize_rejects_unknown_marker_styles() {
        let mut options = Options::default();
        options.block_styles.bold = "%%".to_string();
        options.block_styles.italic = "~".to_string();
        options.block_styles.code = "''".to_string();
        options.sanitize();
        assert_eq!(options.block_styles.bold, "**");
        assert_eq!(options.block_styles.italic, "*");
        assert_eq!(options.block_styles.code, "```");
    }

    #[test]
    fn test_sanitize_keeps_valid_alternates() {
        let mut options = Options::default();
        options.block_styles.bold = "__".to_string();
        options.block_styles.italic = "_".to_string();
        options.block_styles.code = "~~~".to_string();
        options.sanitize();
        assert_eq!(options.block_styles.bold, "__");
        assert_eq!(options.block_styles.italic, "_");
        assert_eq!(options.block_styles.code, "~~~");
    }

    #[test]
    fn test_partial_json_uses_defaults_for_missing() {
        let options: Options = serde_json::from_str(r#"{"prompt_urls": true}"#).unwrap();
        assert!(options.prompt_urls);
        assert_eq!(options.tab_size, 4);
        assert_eq!(options.block_styles.bold, "**");
    }

    #[test]
    fn test_unordered_list_style_serializes_as_bullet_char() {
        let json = serde_json::to_string(&UnorderedListStyle::Dash).unwrap();
        assert_eq!(json, "\"-\"");
        let parsed: UnorderedListStyle = serde_json::from_str("\"+\"").unwrap();
        assert_eq!(parsed, UnorderedListStyle::Plus);
        assert_eq!(parsed.as_char(), '+');
    }

    #[test]
    fn test_from_json_sanitized_clamps() {
        let options = Options::from_json_sanitized(r#"{"tab_size": 99}"#).unwrap();
        assert_eq!(options.tab_size, Options::MAX_TAB_SIZE);
    }

    #[test]
    fn test_options_roundtrip() {
        let original = Options {
            prompt_urls: true,
            tab_size: 2,
            unordered_list_style: UnorderedListStyle::Dash,
            ..Options::default()
        };
        let json = serde_json::to_string_pretty(&original).unwrap();
        let loaded: Options = serde_json::from_str(&json).unwrap();
        assert_eq!(original, loaded);
    }
}
