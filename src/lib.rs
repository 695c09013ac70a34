//! Vector annotation editor for captured screenshots
//!
//! The editor layers pen, highlighter, eraser, rectangle, circle, arrow and
//! text annotations over a base image, keeps them selectable and movable
//! with snapshot undo, and flattens everything to PNG on save.

pub mod annotations;
pub mod capture;
pub mod config;
pub mod core;
pub mod domain;
pub mod error;
pub mod render;
pub mod session;

pub use crate::core::{EditorSession, FileShell, SessionShell, SessionState};
pub use error::{EditorError, Result};
