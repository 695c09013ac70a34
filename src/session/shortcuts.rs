use crate::domain::Tool;
use crate::session::messages::{EditorMsg, Key, KeyPress, Named};

/// Map a key press to an editor message
///
/// While text entry is open, keys edit the pending text and nothing else
/// is reachable.
pub fn handle_key_event(press: &KeyPress, in_text_entry: bool) -> Option<EditorMsg> {
    let modifiers = press.modifiers;

    if in_text_entry {
        return match &press.key {
            Key::Named(Named::Enter) => Some(EditorMsg::TextCommit),
            Key::Named(Named::Escape) => Some(EditorMsg::TextCancel),
            Key::Named(Named::Backspace) => Some(EditorMsg::TextBackspace),
            Key::Named(Named::Space) => Some(EditorMsg::TextInput(" ".to_string())),
            Key::Character(c) if !modifiers.control => Some(EditorMsg::TextInput(c.clone())),
            _ => None,
        };
    }

    match &press.key {
        // Undo/redo shortcuts
        Key::Character(c)
            if c.eq_ignore_ascii_case("z") && modifiers.control && !modifiers.shift =>
        {
            Some(EditorMsg::undo())
        }
        Key::Character(c)
            if (c.eq_ignore_ascii_case("y") && modifiers.control)
                || (c.eq_ignore_ascii_case("z") && modifiers.control && modifiers.shift) =>
        {
            Some(EditorMsg::redo())
        }
        Key::Named(Named::Delete | Named::Backspace) => Some(EditorMsg::DeleteSelected),
        Key::Named(Named::Escape) => Some(EditorMsg::Escape),
        // Single-letter tool shortcuts
        Key::Character(c) if !modifiers.control => {
            let mut chars = c.chars();
            match (chars.next(), chars.next()) {
                (Some(letter), None) => Tool::from_shortcut(letter).map(EditorMsg::tool),
                _ => None,
            }
        }
        _ => None,
    }
}
