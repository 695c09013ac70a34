//! Interactive annotation editing
//!
//! This module provides the interaction controller that maps pointer and
//! key input onto scene edits with the active tool.

pub mod controller;

pub use controller::{Draft, Gesture, InteractionController};
