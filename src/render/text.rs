//! Text rasterization through system fonts
//!
//! A sans-serif face is looked up once with fontdb. Glyph outlines from
//! rusttype are converted into tiny-skia paths and filled, so text blends
//! exactly like every other annotation.

use std::sync::OnceLock;

use fontdb::{Database, Family, Query, Stretch, Style, Weight};
use rusttype::{Font, OutlineBuilder, Scale, point as rt_point};
use tiny_skia::{FillRule, Paint, PathBuilder, Pixmap, Transform};

use crate::domain::Point;

/// Default font for text annotations, `None` if the system has no usable face
pub fn default_font() -> Option<&'static Font<'static>> {
    static FONT: OnceLock<Option<Font<'static>>> = OnceLock::new();
    FONT.get_or_init(|| {
        let font = load_system_font(&[Family::SansSerif, Family::Serif, Family::Monospace]);
        if font.is_none() {
            log::warn!("No system font found, text annotations will not be rendered");
        }
        font
    })
    .as_ref()
}

fn load_system_font(families: &[Family<'_>]) -> Option<Font<'static>> {
    let mut db = Database::new();
    db.load_system_fonts();

    for family in families {
        let query = Query {
            families: std::slice::from_ref(family),
            weight: Weight::NORMAL,
            stretch: Stretch::Normal,
            style: Style::Normal,
        };
        let Some(id) = db.query(&query) else {
            continue;
        };
        let font = db
            .with_face_data(id, |data, index| {
                Font::try_from_vec_and_index(data.to_vec(), index)
            })
            .flatten();
        if let Some(font) = font {
            log::debug!("Loaded text font for family {:?}", family);
            return Some(font);
        }
    }
    None
}

/// Collects glyph outlines into a tiny-skia path, offset by the glyph origin
struct GlyphPathBuilder {
    builder: PathBuilder,
    dx: f32,
    dy: f32,
}

impl OutlineBuilder for GlyphPathBuilder {
    fn move_to(&mut self, x: f32, y: f32) {
        self.builder.move_to(x + self.dx, y + self.dy);
    }

    fn line_to(&mut self, x: f32, y: f32) {
        self.builder.line_to(x + self.dx, y + self.dy);
    }

    fn quad_to(&mut self, x1: f32, y1: f32, x: f32, y: f32) {
        self.builder
            .quad_to(x1 + self.dx, y1 + self.dy, x + self.dx, y + self.dy);
    }

    fn curve_to(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, x: f32, y: f32) {
        self.builder.cubic_to(
            x1 + self.dx,
            y1 + self.dy,
            x2 + self.dx,
            y2 + self.dy,
            x + self.dx,
            y + self.dy,
        );
    }

    fn close(&mut self) {
        self.builder.close();
    }
}

/// Build the outline of `content` with its baseline starting at `anchor`
pub fn text_path(
    font: &Font<'_>,
    content: &str,
    anchor: Point,
    font_size: f32,
) -> Option<tiny_skia::Path> {
    let scale = Scale::uniform(font_size);
    let mut sink = GlyphPathBuilder {
        builder: PathBuilder::new(),
        dx: 0.0,
        dy: 0.0,
    };

    for glyph in font.layout(content, scale, rt_point(anchor.x, anchor.y)) {
        let position = glyph.position();
        sink.dx = position.x;
        sink.dy = position.y;
        glyph.unpositioned().build_outline(&mut sink);
    }

    sink.builder.finish()
}

/// Fill `content` onto the pixmap, returning false if nothing could be drawn
pub fn draw_text(
    pixmap: &mut Pixmap,
    content: &str,
    anchor: Point,
    font_size: f32,
    paint: &Paint<'_>,
) -> bool {
    let Some(font) = default_font() else {
        return false;
    };
    let Some(path) = text_path(font, content, anchor, font_size) else {
        return false;
    };
    pixmap.fill_path(&path, paint, FillRule::Winding, Transform::identity(), None);
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_path_sits_on_baseline() {
        // Font availability depends on the machine running the tests
        let Some(font) = default_font() else {
            return;
        };
        let path = text_path(font, "Hg", Point::new(10.0, 50.0), 20.0).unwrap();
        let bounds = path.bounds();
        assert!(bounds.left() >= 9.0);
        assert!(bounds.top() < 50.0);
        assert!(bounds.bottom() <= 60.0);
    }

    #[test]
    fn test_whitespace_has_no_outline() {
        let Some(font) = default_font() else {
            return;
        };
        assert!(text_path(font, "   ", Point::new(0.0, 20.0), 12.0).is_none());
    }
}
