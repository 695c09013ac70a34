//! Domain types with minimal dependencies
//!
//! This module contains the annotation object model, geometry helpers and
//! tool state. Hit-testing and bounds read their tolerances from
//! `crate::render::geometry` so they agree with what gets drawn; nothing
//! here rasterizes or does I/O.

pub mod annotation;
pub mod geometry;
pub mod tool;

pub use annotation::*;
pub use geometry::*;
pub use tool::*;
