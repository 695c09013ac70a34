//! Image rendering for annotations using tiny-skia
//!
//! Annotations are drawn into a transparent layer pixmap. The layer is then
//! composited over the base image, which keeps eraser strokes from ever
//! touching base pixels.

use image::{Rgba, RgbaImage};
use tiny_skia::{
    BlendMode, ColorU8, FillRule, LineCap, LineJoin, Paint, PathBuilder, Pixmap, PixmapPaint,
    Stroke, StrokeDash, Transform,
};

use super::geometry::{arrow, selection, stroke};
use super::text;
use crate::config::ShapeColor;
use crate::domain::{Annotation, FreehandPath, Point, Rect, Shape, StrokeKind};

/// Convert an RgbaImage into a premultiplied pixmap
pub fn pixmap_from_rgba(img: &RgbaImage) -> Option<Pixmap> {
    let mut pixmap = Pixmap::new(img.width(), img.height())?;
    for (dst, src) in pixmap.pixels_mut().iter_mut().zip(img.pixels()) {
        let [r, g, b, a] = src.0;
        *dst = ColorU8::from_rgba(r, g, b, a).premultiply();
    }
    Some(pixmap)
}

/// Convert a premultiplied pixmap back into an RgbaImage
pub fn rgba_from_pixmap(pixmap: &Pixmap) -> RgbaImage {
    let mut img = RgbaImage::new(pixmap.width(), pixmap.height());
    for (dst, src) in img.pixels_mut().zip(pixmap.pixels()) {
        let c = src.demultiply();
        *dst = Rgba([c.red(), c.green(), c.blue(), c.alpha()]);
    }
    img
}

/// Composite `layer` over `target` at the origin
pub fn composite_layer(target: &mut Pixmap, layer: &Pixmap) {
    target.draw_pixmap(
        0,
        0,
        layer.as_ref(),
        &PixmapPaint::default(),
        Transform::identity(),
        None,
    );
}

fn solid_paint(color: ShapeColor, alpha: f32) -> Paint<'static> {
    let [r, g, b, _] = color.to_rgba_u8();
    let mut paint = Paint::default();
    paint.set_color_rgba8(r, g, b, (alpha.clamp(0.0, 1.0) * 255.0).round() as u8);
    paint.anti_alias = true;
    paint
}

fn round_stroke(width: f32) -> Stroke {
    Stroke {
        width,
        line_cap: LineCap::Round,
        line_join: LineJoin::Round,
        ..Default::default()
    }
}

/// Build a polyline path through the given points
fn build_polyline_path(points: &[Point]) -> Option<tiny_skia::Path> {
    let (first, rest) = points.split_first()?;
    let mut pb = PathBuilder::new();
    pb.move_to(first.x, first.y);
    for p in rest {
        pb.line_to(p.x, p.y);
    }
    pb.finish()
}

/// Build the closed arrowhead triangle
fn build_arrow_head_path(from: Point, to: Point) -> Option<tiny_skia::Path> {
    let (left, right) = arrow::head_points(from, to);
    let mut pb = PathBuilder::new();
    pb.move_to(to.x, to.y);
    pb.line_to(left.x, left.y);
    pb.line_to(right.x, right.y);
    pb.close();
    pb.finish()
}

fn draw_freehand(pixmap: &mut Pixmap, path: &FreehandPath, color: ShapeColor, size: f32) {
    let Some(line) = build_polyline_path(&path.points) else {
        return;
    };

    let (paint, width) = match path.kind {
        StrokeKind::Pen => (solid_paint(color, 1.0), size),
        StrokeKind::Highlighter => (
            solid_paint(color, stroke::HIGHLIGHTER_ALPHA),
            size * stroke::HIGHLIGHTER_WIDTH_FACTOR,
        ),
        StrokeKind::Eraser => {
            // Clear only affects the stroke coverage; the paint is local to
            // this call so later draws blend normally again
            let mut paint = solid_paint(color, 1.0);
            paint.blend_mode = BlendMode::Clear;
            (paint, size * stroke::ERASER_WIDTH_FACTOR)
        }
    };

    pixmap.stroke_path(
        &line,
        &paint,
        &round_stroke(width),
        Transform::identity(),
        None,
    );
}

impl Annotation {
    /// Render this annotation onto an annotation layer
    ///
    /// Drawing is idempotent for a given layer state. Eraser strokes clear
    /// layer pixels instead of painting them.
    pub fn draw(&self, pixmap: &mut Pixmap) {
        match &self.shape {
            Shape::Freehand(path) => draw_freehand(pixmap, path, self.color, self.size),
            Shape::Rectangle(r) => {
                let bounds = Rect::from_corners(r.anchor, r.anchor.offset(r.width, r.height));
                let Some(rect) =
                    tiny_skia::Rect::from_xywh(bounds.x, bounds.y, bounds.width, bounds.height)
                else {
                    return;
                };
                let path = PathBuilder::from_rect(rect);
                let stroke = Stroke {
                    width: self.size,
                    line_join: LineJoin::Miter,
                    ..Default::default()
                };
                pixmap.stroke_path(
                    &path,
                    &solid_paint(self.color, 1.0),
                    &stroke,
                    Transform::identity(),
                    None,
                );
            }
            Shape::Circle(c) => {
                let Some(path) = PathBuilder::from_circle(c.center.x, c.center.y, c.radius) else {
                    return;
                };
                let stroke = Stroke {
                    width: self.size,
                    ..Default::default()
                };
                pixmap.stroke_path(
                    &path,
                    &solid_paint(self.color, 1.0),
                    &stroke,
                    Transform::identity(),
                    None,
                );
            }
            Shape::Arrow(a) => {
                let paint = solid_paint(self.color, 1.0);
                if let Some(shaft) = build_polyline_path(&[a.from, a.to]) {
                    let stroke = Stroke {
                        width: self.size,
                        ..Default::default()
                    };
                    pixmap.stroke_path(&shaft, &paint, &stroke, Transform::identity(), None);
                }
                if let Some(head) = build_arrow_head_path(a.from, a.to) {
                    pixmap.fill_path(
                        &head,
                        &paint,
                        FillRule::Winding,
                        Transform::identity(),
                        None,
                    );
                }
            }
            Shape::Text(t) => {
                text::draw_text(
                    pixmap,
                    &t.content,
                    t.anchor,
                    self.font_size(),
                    &solid_paint(self.color, 1.0),
                );
            }
        }
    }

    /// Render an in-progress version of this annotation on the live overlay
    ///
    /// The overlay is transparent, so eraser strokes are shown as a
    /// translucent gray trail instead of clearing nothing.
    pub fn draw_preview(&self, overlay: &mut Pixmap) {
        match &self.shape {
            Shape::Freehand(path) if path.kind == StrokeKind::Eraser => {
                let Some(line) = build_polyline_path(&path.points) else {
                    return;
                };
                overlay.stroke_path(
                    &line,
                    &solid_paint(ShapeColor::from_rgb8(128, 128, 128), 0.5),
                    &round_stroke(self.size * stroke::ERASER_WIDTH_FACTOR),
                    Transform::identity(),
                    None,
                );
            }
            _ => self.draw(overlay),
        }
    }
}

/// Draw a dashed outline used to highlight the selected annotation
pub fn draw_selection_outline(pixmap: &mut Pixmap, bounds: Rect) {
    let Some(rect) = tiny_skia::Rect::from_xywh(bounds.x, bounds.y, bounds.width, bounds.height)
    else {
        return;
    };
    let path = PathBuilder::from_rect(rect);
    let [r, g, b, a] = selection::COLOR;
    let mut paint = Paint::default();
    paint.set_color_rgba8(r, g, b, a);
    paint.anti_alias = true;

    let stroke = Stroke {
        width: selection::WIDTH,
        dash: StrokeDash::new(selection::DASH.to_vec(), 0.0),
        ..Default::default()
    };
    pixmap.stroke_path(&path, &paint, &stroke, Transform::identity(), None);
}

/// Draw the text-entry caret box with the pending text
pub fn draw_text_entry(
    pixmap: &mut Pixmap,
    anchor: Point,
    content: &str,
    color: ShapeColor,
    font_size: f32,
) {
    let chars = content.chars().count().max(1) as f32;
    let width = chars * font_size * super::geometry::text::CHAR_WIDTH_FACTOR;
    draw_selection_outline(
        pixmap,
        Rect::new(anchor.x, anchor.y - font_size, width, font_size).inflate(2.0),
    );
    if !content.is_empty() {
        text::draw_text(pixmap, content, anchor, font_size, &solid_paint(color, 1.0));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{AnnotationId, Arrow, CircleOutline, RectOutline};

    fn layer() -> Pixmap {
        Pixmap::new(200, 200).unwrap()
    }

    fn alpha_at(pixmap: &Pixmap, x: u32, y: u32) -> u8 {
        pixmap.pixel(x, y).unwrap().alpha()
    }

    fn red() -> ShapeColor {
        ShapeColor::from_rgb8(255, 0, 0)
    }

    fn freehand(kind: StrokeKind, size: f32, points: &[(f32, f32)]) -> Annotation {
        Annotation::new(
            AnnotationId(1),
            red(),
            size,
            Shape::Freehand(FreehandPath {
                kind,
                points: points.iter().map(|&(x, y)| Point::new(x, y)).collect(),
            }),
        )
    }

    #[test]
    fn test_rgba_pixmap_round_trip_for_opaque_pixels() {
        let img = RgbaImage::from_fn(4, 3, |x, y| Rgba([x as u8 * 60, y as u8 * 80, 7, 255]));
        let pixmap = pixmap_from_rgba(&img).unwrap();
        assert_eq!(rgba_from_pixmap(&pixmap), img);
    }

    #[test]
    fn test_pen_draws_opaque_stroke() {
        let mut pixmap = layer();
        freehand(StrokeKind::Pen, 6.0, &[(10.0, 50.0), (190.0, 50.0)]).draw(&mut pixmap);
        let px = pixmap.pixel(100, 50).unwrap();
        assert!(px.alpha() >= 250);
        assert!(px.red() >= 250);
        assert_eq!(px.green(), 0);
        assert_eq!(alpha_at(&pixmap, 100, 80), 0);
    }

    #[test]
    fn test_highlighter_is_translucent_and_wide() {
        let mut pixmap = layer();
        freehand(StrokeKind::Highlighter, 4.0, &[(10.0, 50.0), (190.0, 50.0)])
            .draw(&mut pixmap);
        let center = alpha_at(&pixmap, 100, 50);
        assert!((70..=85).contains(&center), "alpha {center}");
        // width is 12, so 5 px off-center is still covered
        assert!(alpha_at(&pixmap, 100, 55) > 0);
    }

    #[test]
    fn test_eraser_clears_only_its_stroke() {
        let mut pixmap = layer();
        freehand(StrokeKind::Pen, 6.0, &[(10.0, 50.0), (190.0, 50.0)]).draw(&mut pixmap);
        freehand(StrokeKind::Eraser, 5.0, &[(100.0, 10.0), (100.0, 90.0)]).draw(&mut pixmap);
        assert!(alpha_at(&pixmap, 100, 50) < 3);
        assert!(alpha_at(&pixmap, 60, 50) >= 250);

        // a later pen stroke blends normally again
        freehand(StrokeKind::Pen, 6.0, &[(100.0, 40.0), (100.0, 60.0)]).draw(&mut pixmap);
        assert!(alpha_at(&pixmap, 100, 50) >= 250);
    }

    #[test]
    fn test_draw_is_idempotent() {
        let rect = Annotation::new(
            AnnotationId(2),
            red(),
            3.0,
            Shape::Rectangle(RectOutline {
                anchor: Point::new(20.0, 20.0),
                width: 100.0,
                height: 60.0,
            }),
        );
        let mut once = layer();
        rect.draw(&mut once);
        let mut twice = layer();
        rect.draw(&mut twice);
        rect.draw(&mut twice);
        // opaque edges saturate, the interior stays untouched
        assert_eq!(once.pixel(20, 50), twice.pixel(20, 50));
        assert_eq!(alpha_at(&twice, 70, 50), 0);
    }

    #[test]
    fn test_circle_and_arrow_render() {
        let mut pixmap = layer();
        Annotation::new(
            AnnotationId(3),
            red(),
            4.0,
            Shape::Circle(CircleOutline {
                center: Point::new(100.0, 100.0),
                radius: 40.0,
            }),
        )
        .draw(&mut pixmap);
        assert!(alpha_at(&pixmap, 140, 100) > 200);
        assert_eq!(alpha_at(&pixmap, 100, 100), 0);

        let mut pixmap = layer();
        Annotation::new(
            AnnotationId(4),
            red(),
            2.0,
            Shape::Arrow(Arrow {
                from: Point::new(20.0, 100.0),
                to: Point::new(180.0, 100.0),
            }),
        )
        .draw(&mut pixmap);
        // inside the filled head, off the shaft
        assert!(alpha_at(&pixmap, 174, 101) > 200);
        assert_eq!(alpha_at(&pixmap, 100, 110), 0);
    }

    #[test]
    fn test_eraser_preview_is_visible_on_overlay() {
        let mut overlay = layer();
        freehand(StrokeKind::Eraser, 5.0, &[(100.0, 10.0), (100.0, 90.0)])
            .draw_preview(&mut overlay);
        assert!(alpha_at(&overlay, 100, 50) > 0);
    }

    #[test]
    fn test_selection_outline_leaves_interior_clear() {
        let mut pixmap = layer();
        draw_selection_outline(&mut pixmap, Rect::new(20.0, 20.0, 100.0, 100.0));
        assert_eq!(alpha_at(&pixmap, 70, 70), 0);
    }
}
