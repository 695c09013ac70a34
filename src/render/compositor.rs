//! Flattening annotations onto the base image and PNG encoding

use std::io;

use image::RgbaImage;
use tiny_skia::Pixmap;

use super::image::{composite_layer, pixmap_from_rgba, rgba_from_pixmap};
use crate::domain::Annotation;

/// Draw all annotations bottom-to-top into a fresh transparent layer
pub fn annotation_layer(width: u32, height: u32, annotations: &[Annotation]) -> Option<Pixmap> {
    let mut layer = Pixmap::new(width, height)?;
    for annotation in annotations {
        annotation.draw(&mut layer);
    }
    Some(layer)
}

/// Render base image plus annotations into `surface`
///
/// `surface` must have the base image's dimensions, otherwise nothing is drawn.
pub fn render_onto(surface: &mut Pixmap, base: &RgbaImage, annotations: &[Annotation]) {
    if (surface.width(), surface.height()) != base.dimensions() {
        log::warn!(
            "Render surface is {}x{} but base image is {}x{}",
            surface.width(),
            surface.height(),
            base.width(),
            base.height()
        );
        return;
    }
    if let Some(base_pixmap) = pixmap_from_rgba(base) {
        surface.data_mut().copy_from_slice(base_pixmap.data());
    }
    if annotations.is_empty() {
        return;
    }
    if let Some(layer) = annotation_layer(base.width(), base.height(), annotations) {
        composite_layer(surface, &layer);
    }
}

/// Produce the final composite image
///
/// With no annotations the base image is returned untouched, so a cleared
/// scene exports exactly the loaded pixels.
pub fn flatten(base: &RgbaImage, annotations: &[Annotation]) -> RgbaImage {
    if annotations.is_empty() {
        return base.clone();
    }
    let Some(mut surface) = pixmap_from_rgba(base) else {
        return base.clone();
    };
    if let Some(layer) = annotation_layer(base.width(), base.height(), annotations) {
        composite_layer(&mut surface, &layer);
    }
    rgba_from_pixmap(&surface)
}

fn write_png<W: io::Write>(w: W, image: &RgbaImage) -> Result<(), png::EncodingError> {
    let mut encoder = png::Encoder::new(w, image.width(), image.height());
    encoder.set_color(png::ColorType::Rgba);
    encoder.set_depth(png::BitDepth::Eight);
    let mut writer = encoder.write_header()?;
    writer.write_image_data(image.as_raw())
}

/// Encode an image as RGBA8 PNG bytes
pub fn encode_png(image: &RgbaImage) -> Result<Vec<u8>, png::EncodingError> {
    let mut buffer = Vec::new();
    write_png(&mut buffer, image)?;
    Ok(buffer)
}
