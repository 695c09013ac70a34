//! Editing session management module
//!
//! This module contains:
//! - The scene (base image plus annotations) and its undo history
//! - Message types for editor interactions
//! - Keyboard shortcut mapping
//! - The `Editor` facade that routes host input to the controller

pub mod editor;
pub mod history;
pub mod messages;
pub mod scene;
pub mod shortcuts;

pub use editor::Editor;
pub use history::History;
pub use scene::Scene;
