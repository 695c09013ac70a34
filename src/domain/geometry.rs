//! Geometric types and helpers for annotation coordinates
//!
//! All coordinates are image pixels with the origin at the top-left corner.

/// A point in image coordinates
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point
    pub fn distance(self, other: Point) -> f32 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        (dx * dx + dy * dy).sqrt()
    }

    /// Return this point shifted by the given offset
    pub fn offset(self, dx: f32, dy: f32) -> Point {
        Point::new(self.x + dx, self.y + dy)
    }
}

/// Axis-aligned rectangle with non-negative extents
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    /// Create a new rectangle from its top-left corner and size
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Build the rectangle spanned by two arbitrary corners
    pub fn from_corners(a: Point, b: Point) -> Self {
        let (min_x, min_y, max_x, max_y) = normalize_rect(a.x, a.y, b.x, b.y);
        Self::new(min_x, min_y, max_x - min_x, max_y - min_y)
    }

    /// Smallest rectangle enclosing all points, or `None` for an empty slice
    pub fn enclosing(points: &[Point]) -> Option<Self> {
        let first = points.first()?;
        let (mut min_x, mut min_y, mut max_x, mut max_y) = (first.x, first.y, first.x, first.y);
        for p in &points[1..] {
            min_x = min_x.min(p.x);
            min_y = min_y.min(p.y);
            max_x = max_x.max(p.x);
            max_y = max_y.max(p.y);
        }
        Some(Self::new(min_x, min_y, max_x - min_x, max_y - min_y))
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    /// Grow the rectangle by `amount` on every side
    pub fn inflate(&self, amount: f32) -> Rect {
        Rect::new(
            self.x - amount,
            self.y - amount,
            self.width + amount * 2.0,
            self.height + amount * 2.0,
        )
    }

    /// Translate the rectangle by the given offset
    pub fn translate(&self, dx: f32, dy: f32) -> Rect {
        Rect::new(self.x + dx, self.y + dy, self.width, self.height)
    }

    /// Check if this rectangle contains a point (edges inclusive)
    pub fn contains(&self, x: f32, y: f32) -> bool {
        x >= self.x && x <= self.right() && y >= self.y && y <= self.bottom()
    }
}

/// Normalize min/max coordinates from arbitrary start/end points
#[inline]
pub fn normalize_rect(x1: f32, y1: f32, x2: f32, y2: f32) -> (f32, f32, f32, f32) {
    let (min_x, max_x) = if x1 < x2 { (x1, x2) } else { (x2, x1) };
    let (min_y, max_y) = if y1 < y2 { (y1, y2) } else { (y2, y1) };
    (min_x, min_y, max_x, max_y)
}

/// Shortest distance from `p` to the segment `a`-`b`
pub fn distance_to_segment(p: Point, a: Point, b: Point) -> f32 {
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    let len_sq = dx * dx + dy * dy;
    if len_sq == 0.0 {
        return p.distance(a);
    }
    let t = (((p.x - a.x) * dx + (p.y - a.y) * dy) / len_sq).clamp(0.0, 1.0);
    p.distance(Point::new(a.x + t * dx, a.y + t * dy))
}

/// True if `p` lies within `tolerance` of any segment of the polyline
pub fn polyline_hit(points: &[Point], p: Point, tolerance: f32) -> bool {
    match points {
        [] => false,
        [only] => only.distance(p) <= tolerance,
        _ => points
            .windows(2)
            .any(|w| distance_to_segment(p, w[0], w[1]) <= tolerance),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distance_to_segment_projects_inside() {
        let d = distance_to_segment(
            Point::new(5.0, 3.0),
            Point::new(0.0, 0.0),
            Point::new(10.0, 0.0),
        );
        assert!((d - 3.0).abs() < 1e-6);
    }

    #[test]
    fn test_distance_to_segment_clamps_to_endpoint() {
        let d = distance_to_segment(
            Point::new(13.0, 4.0),
            Point::new(0.0, 0.0),
            Point::new(10.0, 0.0),
        );
        assert!((d - 5.0).abs() < 1e-6);
    }

    #[test]
    fn test_distance_to_degenerate_segment() {
        let a = Point::new(2.0, 2.0);
        let d = distance_to_segment(Point::new(5.0, 6.0), a, a);
        assert!((d - 5.0).abs() < 1e-6);
    }

    #[test]
    fn test_rect_from_corners_normalizes() {
        let r = Rect::from_corners(Point::new(110.0, 60.0), Point::new(10.0, 10.0));
        assert_eq!(r, Rect::new(10.0, 10.0, 100.0, 50.0));
    }

    #[test]
    fn test_rect_inflate_and_contains() {
        let r = Rect::new(10.0, 10.0, 20.0, 20.0).inflate(3.0);
        assert_eq!(r, Rect::new(7.0, 7.0, 26.0, 26.0));
        assert!(r.contains(7.0, 33.0));
        assert!(!r.contains(6.9, 20.0));
    }

    #[test]
    fn test_enclosing_points() {
        let points = [
            Point::new(4.0, 9.0),
            Point::new(-2.0, 3.0),
            Point::new(7.0, 1.0),
        ];
        assert_eq!(
            Rect::enclosing(&points),
            Some(Rect::new(-2.0, 1.0, 9.0, 8.0))
        );
        assert_eq!(Rect::enclosing(&[]), None);
    }

    #[test]
    fn test_polyline_hit() {
        let line = [
            Point::new(0.0, 0.0),
            Point::new(10.0, 0.0),
            Point::new(10.0, 10.0),
        ];
        assert!(polyline_hit(&line, Point::new(12.0, 5.0), 2.0));
        assert!(!polyline_hit(&line, Point::new(5.0, 5.0), 2.0));
    }
}
