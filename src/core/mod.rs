//! Core application module
//!
//! This module contains:
//! - The editing session lifecycle (open, dispatch, save, cancel)
//! - The host shell trait and a file-backed shell

pub mod app;
pub mod shell;

pub use app::{EditorSession, SessionState};
pub use shell::{FileShell, SessionShell};
