//! Graphite - Markdown Formatting Toggle Engine
//!
//! Graphite augments a plain text buffer with Markdown-aware formatting
//! commands: bold, italic, strikethrough, links, images, headings, lists,
//! blockquotes, code (inline, fenced, and indented), and a clean-block
//! command that strips block markers.
//!
//! The engine does not own a text editor. It talks to the host editor
//! through the [`buffer::EditorBuffer`] trait: it reads line text, token
//! classifications, and cursor positions, and mutates the buffer through
//! range replacements. A concrete in-memory implementation,
//! [`buffer::TextBuffer`], is provided so the engine can be used and tested
//! without a host.
//!
//! # Example
//! ```
//! use graphite::{Editor, EditorBuffer, TextBuffer, Options, Position};
//!
//! let buffer = TextBuffer::from_text("hello world");
//! let mut editor = Editor::new(buffer, Options::default());
//! editor.buffer_mut().set_selection(Position::new(0, 0), Position::new(0, 5));
//! editor.toggle_bold();
//! assert_eq!(editor.value(), "**hello** world");
//! ```

pub mod buffer;
pub mod command;
pub mod config;
pub mod editor;
pub mod error;
pub mod format;
pub mod preview;
pub mod string_utils;

pub use buffer::{EditorBuffer, Position, Selection, TextBuffer, Token, TokenState, TokenTag, END_OF_LINE};
pub use command::Command;
pub use config::{
    load_config, save_config, BlockStyles, InsertTexts, Options, TextPair, UnorderedListStyle,
};
pub use editor::{Editor, ViewState};
pub use error::{Error, Result};
pub use format::code::{code_type, CodeBlockKind};
pub use format::state::{state_at, ActiveState};
pub use preview::render_to_html;
