//! Annotation types for drawing on screenshots
//!
//! All annotation types store coordinates in base-image pixels. Rendering
//! lives in `crate::render::image`; everything here is pure geometry.

use std::fmt;

use super::geometry::{Point, Rect, distance_to_segment, polyline_hit};
use crate::config::ShapeColor;
use crate::render::geometry::{HIT_PADDING, arrow, shape, text};

/// Identifier of an annotation, unique within one scene
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AnnotationId(pub u64);

impl fmt::Display for AnnotationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// How a freehand path is composited
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StrokeKind {
    /// Opaque stroke
    Pen,
    /// Wide translucent stroke
    Highlighter,
    /// Clears previously drawn annotation pixels
    Eraser,
}

/// Freehand stroke made of connected points
#[derive(Debug, Clone, PartialEq)]
pub struct FreehandPath {
    pub kind: StrokeKind,
    pub points: Vec<Point>,
}

/// Outline rectangle (no fill)
#[derive(Debug, Clone, PartialEq)]
pub struct RectOutline {
    /// Corner where the drag started
    pub anchor: Point,
    /// Signed extents; negative values extend left/up from the anchor
    pub width: f32,
    pub height: f32,
}

/// Outline circle (no fill)
#[derive(Debug, Clone, PartialEq)]
pub struct CircleOutline {
    pub center: Point,
    pub radius: f32,
}

/// Straight arrow with a filled triangular head at `to`
#[derive(Debug, Clone, PartialEq)]
pub struct Arrow {
    pub from: Point,
    pub to: Point,
}

/// Single line of text; `anchor` is the left end of the baseline
#[derive(Debug, Clone, PartialEq)]
pub struct TextLabel {
    pub anchor: Point,
    pub content: String,
}

/// Geometry of an annotation
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    Freehand(FreehandPath),
    Rectangle(RectOutline),
    Circle(CircleOutline),
    Arrow(Arrow),
    Text(TextLabel),
}

/// Type tag of an annotation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnnotationKind {
    Pen,
    Highlighter,
    Eraser,
    Rectangle,
    Circle,
    Arrow,
    Text,
}

/// A committed annotation object
#[derive(Debug, Clone, PartialEq)]
pub struct Annotation {
    pub id: AnnotationId,
    pub color: ShapeColor,
    /// Stroke size chosen in the toolbar
    pub size: f32,
    pub shape: Shape,
}

impl Annotation {
    pub fn new(id: AnnotationId, color: ShapeColor, size: f32, shape: Shape) -> Self {
        Self {
            id,
            color,
            size,
            shape,
        }
    }

    pub fn kind(&self) -> AnnotationKind {
        match &self.shape {
            Shape::Freehand(path) => match path.kind {
                StrokeKind::Pen => AnnotationKind::Pen,
                StrokeKind::Highlighter => AnnotationKind::Highlighter,
                StrokeKind::Eraser => AnnotationKind::Eraser,
            },
            Shape::Rectangle(_) => AnnotationKind::Rectangle,
            Shape::Circle(_) => AnnotationKind::Circle,
            Shape::Arrow(_) => AnnotationKind::Arrow,
            Shape::Text(_) => AnnotationKind::Text,
        }
    }

    /// Font size of a text annotation derived from the stroke size
    pub fn font_size(&self) -> f32 {
        self.size * text::FONT_SIZE_FACTOR
    }

    /// Check whether a point is close enough to select this annotation
    pub fn hit_test(&self, x: f32, y: f32) -> bool {
        let p = Point::new(x, y);
        let tolerance = self.size + HIT_PADDING;
        match &self.shape {
            // Erased regions are invisible and cannot be picked
            Shape::Freehand(path) if path.kind == StrokeKind::Eraser => false,
            Shape::Freehand(path) => polyline_hit(&path.points, p, tolerance),
            Shape::Rectangle(_) | Shape::Text(_) => self.bounds().contains(x, y),
            Shape::Circle(c) => c.center.distance(p) <= c.radius + self.size,
            Shape::Arrow(a) => {
                let (left, right) = arrow::head_points(a.from, a.to);
                distance_to_segment(p, a.from, a.to) <= tolerance
                    || distance_to_segment(p, a.to, left) <= tolerance
                    || distance_to_segment(p, a.to, right) <= tolerance
            }
        }
    }

    /// Axis-aligned bounds padded by the stroke size
    pub fn bounds(&self) -> Rect {
        match &self.shape {
            Shape::Freehand(path) => Rect::enclosing(&path.points)
                .unwrap_or_default()
                .inflate(self.size),
            Shape::Rectangle(r) => {
                Rect::from_corners(r.anchor, r.anchor.offset(r.width, r.height)).inflate(self.size)
            }
            Shape::Circle(c) => Rect::new(
                c.center.x - c.radius,
                c.center.y - c.radius,
                c.radius * 2.0,
                c.radius * 2.0,
            )
            .inflate(self.size),
            Shape::Arrow(a) => {
                Rect::from_corners(a.from, a.to).inflate(self.size + arrow::BOUNDS_MARGIN)
            }
            Shape::Text(t) => {
                let font_size = self.font_size();
                let width = t.content.chars().count() as f32 * font_size * text::CHAR_WIDTH_FACTOR;
                Rect::new(t.anchor.x, t.anchor.y - font_size, width, font_size).inflate(self.size)
            }
        }
    }

    /// Shift all geometry by the given offset
    pub fn translate(&mut self, dx: f32, dy: f32) {
        match &mut self.shape {
            Shape::Freehand(path) => {
                for p in &mut path.points {
                    *p = p.offset(dx, dy);
                }
            }
            Shape::Rectangle(r) => r.anchor = r.anchor.offset(dx, dy),
            Shape::Circle(c) => c.center = c.center.offset(dx, dy),
            Shape::Arrow(a) => {
                a.from = a.from.offset(dx, dy);
                a.to = a.to.offset(dx, dy);
            }
            Shape::Text(t) => t.anchor = t.anchor.offset(dx, dy),
        }
    }
}

impl Shape {
    /// True if committing this shape would produce nothing visible
    pub fn is_degenerate(&self) -> bool {
        match self {
            Shape::Freehand(path) => match path.points.split_first() {
                Some((first, rest)) => rest.iter().all(|p| p == first),
                None => true,
            },
            Shape::Rectangle(r) => {
                r.width.abs() < shape::MIN_EXTENT && r.height.abs() < shape::MIN_EXTENT
            }
            Shape::Circle(c) => c.radius < shape::MIN_EXTENT,
            Shape::Arrow(a) => a.from.distance(a.to) < arrow::MIN_LENGTH,
            Shape::Text(t) => t.content.is_empty(),
        }
    }
}
