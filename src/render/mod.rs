//! Annotation rendering module
//!
//! This module contains:
//! - Geometry constants shared by hit-testing and rasterization
//! - Annotation rasterization using tiny-skia
//! - Text outlines from system fonts
//! - Compositing and PNG export

pub mod compositor;
pub mod geometry;
pub mod image;
pub mod text;
