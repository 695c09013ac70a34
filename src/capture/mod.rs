//! Captured image input
//!
//! This module holds the base screenshot type (image.rs) decoded once at the
//! start of a session.

pub mod image;
