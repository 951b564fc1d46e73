//! Command registry
//!
//! Every formatting and view action is a [`Command`] variant. The enum
//! carries the stable action name a host binds toolbar buttons to, a
//! human-readable title, and the default keyboard shortcut. Shortcuts
//! are stored in the platform-neutral `Cmd-` spelling and rewritten per
//! platform by [`Command::shortcut`].

use crate::buffer::EditorBuffer;
use crate::editor::Editor;

/// A formatting or view action the editor can execute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Command {
    ToggleBold,
    ToggleItalic,
    ToggleStrikethrough,
    ToggleHeadingSmaller,
    ToggleHeadingBigger,
    ToggleHeading1,
    ToggleHeading2,
    ToggleHeading3,
    ToggleHeading4,
    ToggleHeading5,
    ToggleHeading6,
    ToggleCodeBlock,
    ToggleBlockquote,
    ToggleOrderedList,
    ToggleUnorderedList,
    CleanBlock,
    DrawLink,
    DrawImage,
    DrawTable,
    DrawHorizontalRule,
    TogglePreview,
    ToggleSideBySide,
    ToggleFullScreen,
}

impl Command {
    /// Every command, in toolbar order.
    pub const ALL: [Command; 23] = [
        Command::ToggleBold,
        Command::ToggleItalic,
        Command::ToggleStrikethrough,
        Command::ToggleHeadingSmaller,
        Command::ToggleHeadingBigger,
        Command::ToggleHeading1,
        Command::ToggleHeading2,
        Command::ToggleHeading3,
        Command::ToggleHeading4,
        Command::ToggleHeading5,
        Command::ToggleHeading6,
        Command::ToggleCodeBlock,
        Command::ToggleBlockquote,
        Command::ToggleOrderedList,
        Command::ToggleUnorderedList,
        Command::CleanBlock,
        Command::DrawLink,
        Command::DrawImage,
        Command::DrawTable,
        Command::DrawHorizontalRule,
        Command::TogglePreview,
        Command::ToggleSideBySide,
        Command::ToggleFullScreen,
    ];

    /// The stable action name used in key maps and toolbar configs.
    pub fn name(self) -> &'static str {
        match self {
            Command::ToggleBold => "toggleBold",
            Command::ToggleItalic => "toggleItalic",
            Command::ToggleStrikethrough => "toggleStrikethrough",
            Command::ToggleHeadingSmaller => "toggleHeadingSmaller",
            Command::ToggleHeadingBigger => "toggleHeadingBigger",
            Command::ToggleHeading1 => "toggleHeading1",
            Command::ToggleHeading2 => "toggleHeading2",
            Command::ToggleHeading3 => "toggleHeading3",
            Command::ToggleHeading4 => "toggleHeading4",
            Command::ToggleHeading5 => "toggleHeading5",
            Command::ToggleHeading6 => "toggleHeading6",
            Command::ToggleCodeBlock => "toggleCodeBlock",
            Command::ToggleBlockquote => "toggleBlockquote",
            Command::ToggleOrderedList => "toggleOrderedList",
            Command::ToggleUnorderedList => "toggleUnorderedList",
            Command::CleanBlock => "cleanBlock",
            Command::DrawLink => "drawLink",
            Command::DrawImage => "drawImage",
            Command::DrawTable => "drawTable",
            Command::DrawHorizontalRule => "drawHorizontalRule",
            Command::TogglePreview => "togglePreview",
            Command::ToggleSideBySide => "toggleSideBySide",
            Command::ToggleFullScreen => "toggleFullScreen",
        }
    }

    /// Look a command up by its action name.
    pub fn from_name(name: &str) -> Option<Command> {
        Command::ALL.iter().copied().find(|c| c.name() == name)
    }

    /// A short human-readable title for toolbars and menus.
    pub fn title(self) -> &'static str {
        match self {
            Command::ToggleBold => "Bold",
            Command::ToggleItalic => "Italic",
            Command::ToggleStrikethrough => "Strikethrough",
            Command::ToggleHeadingSmaller => "Smaller Heading",
            Command::ToggleHeadingBigger => "Bigger Heading",
            Command::ToggleHeading1 => "Heading 1",
            Command::ToggleHeading2 => "Heading 2",
            Command::ToggleHeading3 => "Heading 3",
            Command::ToggleHeading4 => "Heading 4",
            Command::ToggleHeading5 => "Heading 5",
            Command::ToggleHeading6 => "Heading 6",
            Command::ToggleCodeBlock => "Code",
            Command::ToggleBlockquote => "Quote",
            Command::ToggleOrderedList => "Numbered List",
            Command::ToggleUnorderedList => "Generic List",
            Command::CleanBlock => "Clean Block",
            Command::DrawLink => "Create Link",
            Command::DrawImage => "Insert Image",
            Command::DrawTable => "Insert Table",
            Command::DrawHorizontalRule => "Insert Horizontal Line",
            Command::TogglePreview => "Toggle Preview",
            Command::ToggleSideBySide => "Toggle Side by Side",
            Command::ToggleFullScreen => "Toggle Fullscreen",
        }
    }

    /// The toolbar icon class for the command.
    pub fn icon(self) -> &'static str {
        match self {
            Command::ToggleBold => "fa fa-bold",
            Command::ToggleItalic => "fa fa-italic",
            Command::ToggleStrikethrough => "fa fa-strikethrough",
            Command::ToggleHeadingSmaller => "fa fa-header fa-heading header-smaller",
            Command::ToggleHeadingBigger => "fa fa-header fa-heading header-bigger",
            Command::ToggleHeading1 => "fa fa-header fa-heading header-1",
            Command::ToggleHeading2 => "fa fa-header fa-heading header-2",
            Command::ToggleHeading3 => "fa fa-header fa-heading header-3",
            Command::ToggleHeading4 => "fa fa-header fa-heading header-4",
            Command::ToggleHeading5 => "fa fa-header fa-heading header-5",
            Command::ToggleHeading6 => "fa fa-header fa-heading header-6",
            Command::ToggleCodeBlock => "fa fa-code",
            Command::ToggleBlockquote => "fa fa-quote-left",
            Command::ToggleOrderedList => "fa fa-list-ol",
            Command::ToggleUnorderedList => "fa fa-list-ul",
            Command::CleanBlock => "fa fa-eraser",
            Command::DrawLink => "fa fa-link",
            Command::DrawImage => "fa fa-image",
            Command::DrawTable => "fa fa-table",
            Command::DrawHorizontalRule => "fa fa-minus",
            Command::TogglePreview => "fa fa-eye",
            Command::ToggleSideBySide => "fa fa-columns",
            Command::ToggleFullScreen => "fa fa-arrows-alt",
        }
    }

    /// The default shortcut in `Cmd-` spelling, if the command has one.
    pub fn default_shortcut(self) -> Option<&'static str> {
        match self {
            Command::ToggleBold => Some("Cmd-B"),
            Command::ToggleItalic => Some("Cmd-I"),
            Command::ToggleHeadingSmaller => Some("Cmd-H"),
            Command::ToggleHeadingBigger => Some("Shift-Cmd-H"),
            Command::ToggleHeading1 => Some("Ctrl-Alt-1"),
            Command::ToggleHeading2 => Some("Ctrl-Alt-2"),
            Command::ToggleHeading3 => Some("Ctrl-Alt-3"),
            Command::ToggleHeading4 => Some("Ctrl-Alt-4"),
            Command::ToggleHeading5 => Some("Ctrl-Alt-5"),
            Command::ToggleHeading6 => Some("Ctrl-Alt-6"),
            Command::ToggleCodeBlock => Some("Cmd-Alt-C"),
            Command::ToggleBlockquote => Some("Cmd-'"),
            Command::ToggleOrderedList => Some("Cmd-Alt-L"),
            Command::ToggleUnorderedList => Some("Cmd-L"),
            Command::CleanBlock => Some("Cmd-E"),
            Command::DrawLink => Some("Cmd-K"),
            Command::DrawImage => Some("Cmd-Alt-I"),
            Command::TogglePreview => Some("Cmd-P"),
            Command::ToggleSideBySide => Some("F9"),
            Command::ToggleFullScreen => Some("F11"),
            Command::ToggleStrikethrough
            | Command::DrawTable
            | Command::DrawHorizontalRule => None,
        }
    }

    /// The default shortcut spelled for the given platform: `Cmd` on
    /// mac, `Ctrl` elsewhere (and vice versa for explicit `Ctrl-`
    /// bindings on mac).
    pub fn shortcut(self, is_mac: bool) -> Option<String> {
        self.default_shortcut().map(|s| fix_shortcut(s, is_mac))
    }

    /// Run this command against an editor. Returns `false` only when a
    /// URL-prompting command was cancelled.
    pub fn execute<B: EditorBuffer>(self, editor: &mut Editor<B>) -> bool {
        match self {
            Command::ToggleBold => editor.toggle_bold(),
            Command::ToggleItalic => editor.toggle_italic(),
            Command::ToggleStrikethrough => editor.toggle_strikethrough(),
            Command::ToggleHeadingSmaller => editor.toggle_heading_smaller(),
            Command::ToggleHeadingBigger => editor.toggle_heading_bigger(),
            Command::ToggleHeading1 => editor.toggle_heading_level(1),
            Command::ToggleHeading2 => editor.toggle_heading_level(2),
            Command::ToggleHeading3 => editor.toggle_heading_level(3),
            Command::ToggleHeading4 => editor.toggle_heading_level(4),
            Command::ToggleHeading5 => editor.toggle_heading_level(5),
            Command::ToggleHeading6 => editor.toggle_heading_level(6),
            Command::ToggleCodeBlock => editor.toggle_code_block(),
            Command::ToggleBlockquote => editor.toggle_blockquote(),
            Command::ToggleOrderedList => editor.toggle_ordered_list(),
            Command::ToggleUnorderedList => editor.toggle_unordered_list(),
            Command::CleanBlock => editor.clean_block(),
            Command::DrawLink => return editor.draw_link(None),
            Command::DrawImage => return editor.draw_image(None),
            Command::DrawTable => editor.draw_table(),
            Command::DrawHorizontalRule => editor.draw_horizontal_rule(),
            Command::TogglePreview => editor.toggle_preview(),
            Command::ToggleSideBySide => editor.toggle_side_by_side(),
            Command::ToggleFullScreen => editor.toggle_full_screen(),
        }
        true
    }
}

/// Rewrite a `Cmd-`/`Ctrl-` shortcut spelling for the platform.
fn fix_shortcut(shortcut: &str, is_mac: bool) -> String {
    if is_mac {
        shortcut.replace("Ctrl", "Cmd")
    } else {
        shortcut.replace("Cmd", "Ctrl")
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
