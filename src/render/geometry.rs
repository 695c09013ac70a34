//! Shared geometry constants and math for annotations
//!
//! Hit-testing, bounds and rasterization all read these values so the
//! selection outline always matches what ends up in the exported image.

use crate::domain::Point;

/// Extra tolerance in pixels added to the stroke size when hit-testing lines
pub const HIT_PADDING: f32 = 5.0;

/// Freehand stroke constants
pub mod stroke {
    /// Opacity of highlighter strokes
    pub const HIGHLIGHTER_ALPHA: f32 = 0.3;
    /// Highlighter stroke width as a multiple of the stroke size
    pub const HIGHLIGHTER_WIDTH_FACTOR: f32 = 3.0;
    /// Eraser stroke width as a multiple of the stroke size
    pub const ERASER_WIDTH_FACTOR: f32 = 2.0;
}

/// Arrow geometry constants
pub mod arrow {
    use super::Point;

    /// Length of the arrowhead sides in pixels
    pub const HEAD_LENGTH: f32 = 15.0;
    /// Arrowhead angle from shaft in radians (30 degrees)
    pub const HEAD_ANGLE: f32 = std::f32::consts::FRAC_PI_6;
    /// Extra bounds margin so the selection outline covers the head
    pub const BOUNDS_MARGIN: f32 = HEAD_LENGTH;
    /// Minimum arrow length to be committed
    pub const MIN_LENGTH: f32 = 5.0;

    /// The two back corners of the arrowhead triangle whose tip is `to`
    pub fn head_points(from: Point, to: Point) -> (Point, Point) {
        let angle = (to.y - from.y).atan2(to.x - from.x);
        let left = Point::new(
            to.x - HEAD_LENGTH * (angle - HEAD_ANGLE).cos(),
            to.y - HEAD_LENGTH * (angle - HEAD_ANGLE).sin(),
        );
        let right = Point::new(
            to.x - HEAD_LENGTH * (angle + HEAD_ANGLE).cos(),
            to.y - HEAD_LENGTH * (angle + HEAD_ANGLE).sin(),
        );
        (left, right)
    }
}

/// Rectangle and circle constants
pub mod shape {
    /// Minimum extent in pixels for a rectangle or circle to be committed
    pub const MIN_EXTENT: f32 = 1.0;
}

/// Text constants
pub mod text {
    /// Font size as a multiple of the stroke size
    pub const FONT_SIZE_FACTOR: f32 = 4.0;
    /// Estimated advance per character as a fraction of the font size
    pub const CHAR_WIDTH_FACTOR: f32 = 0.6;
}

/// Selection highlight constants
pub mod selection {
    /// Dash pattern of the selection outline
    pub const DASH: [f32; 2] = [6.0, 4.0];
    /// Width of the selection outline
    pub const WIDTH: f32 = 1.5;
    /// Selection outline color (RGBA)
    pub const COLOR: [u8; 4] = [0, 120, 215, 255];
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_head_points_for_horizontal_arrow() {
        let (left, right) = arrow::head_points(Point::new(0.0, 0.0), Point::new(100.0, 0.0));
        let back = 100.0 - arrow::HEAD_LENGTH * arrow::HEAD_ANGLE.cos();
        let half = arrow::HEAD_LENGTH * arrow::HEAD_ANGLE.sin();
        assert!((left.x - back).abs() < 1e-4);
        assert!((right.x - back).abs() < 1e-4);
        assert!((left.y - half).abs() < 1e-4);
        assert!((right.y + half).abs() < 1e-4);
    }
}
