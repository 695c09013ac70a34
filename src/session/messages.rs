//! Message types for an editing session
//!
//! This module contains:
//! - `EditorMsg`, the discrete editor actions (toolbar buttons and resolved
//!   keyboard shortcuts)
//! - `HostEvent`, the raw input a host shell forwards to the session
//!
//! Both deserialize from JSON so a script of events can be replayed.

use serde::{Deserialize, Serialize};

use crate::config::ShapeColor;
use crate::domain::Tool;

// ============================================================================
// Pointer Types
// ============================================================================

/// Primary-button pointer input in image coordinates
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "phase", rename_all = "snake_case")]
pub enum PointerEvent {
    /// Button pressed at position
    Down { x: f32, y: f32 },
    /// Pointer moved to position
    Move { x: f32, y: f32 },
    /// Button released at position
    Up { x: f32, y: f32 },
}

// ============================================================================
// Keyboard Types
// ============================================================================

/// Named keys the editor reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Named {
    Enter,
    Escape,
    Backspace,
    Delete,
    Space,
}

/// A pressed key
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Key {
    Named(Named),
    Character(String),
}

/// Modifier keys held during a key press
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Modifiers {
    pub control: bool,
    pub shift: bool,
}

impl Modifiers {
    pub const NONE: Modifiers = Modifiers {
        control: false,
        shift: false,
    };
    pub const CONTROL: Modifiers = Modifiers {
        control: true,
        shift: false,
    };
}

/// A key press with its modifiers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyPress {
    pub key: Key,
    #[serde(default)]
    pub modifiers: Modifiers,
}

impl KeyPress {
    pub fn named(named: Named) -> Self {
        Self {
            key: Key::Named(named),
            modifiers: Modifiers::NONE,
        }
    }

    pub fn character(c: &str, modifiers: Modifiers) -> Self {
        Self {
            key: Key::Character(c.to_string()),
            modifiers,
        }
    }
}

// ============================================================================
// Editor Messages
// ============================================================================

/// Discrete editor actions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", content = "value", rename_all = "snake_case")]
pub enum EditorMsg {
    /// Switch tool; always deselects and discards in-progress gestures
    SetTool(Tool),
    /// Change the color used for new annotations
    SetColor(ShapeColor),
    /// Change the stroke size used for new annotations
    SetSize(f32),
    /// Append text to the open text entry
    TextInput(String),
    /// Remove the last character of the open text entry
    TextBackspace,
    /// Commit the open text entry
    TextCommit,
    /// Close the open text entry without committing
    TextCancel,
    /// Abort an in-progress gesture, or deselect when idle
    Escape,
    /// Delete the selected annotation
    DeleteSelected,
    /// Undo last edit
    Undo,
    /// Redo undone edit
    Redo,
    /// Remove every annotation (already confirmed by the host)
    ClearAll,
}

impl EditorMsg {
    pub fn undo() -> Self {
        Self::Undo
    }

    pub fn redo() -> Self {
        Self::Redo
    }

    pub fn tool(tool: Tool) -> Self {
        Self::SetTool(tool)
    }
}

// ============================================================================
// Host Events
// ============================================================================

/// Input delivered by the host shell
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "event", rename_all = "snake_case")]
pub enum HostEvent {
    Pointer(PointerEvent),
    Key(KeyPress),
    /// Committed text from an input method
    Text(String),
    /// Toolbar interaction
    Toolbar(EditorMsg),
}
