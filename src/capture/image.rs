//! Base image type for an editing session

use std::path::{Path, PathBuf};
use std::sync::Arc;

use image::RgbaImage;

use crate::error::{EditorError, Result};

/// The immutable captured screenshot that annotations are layered over
///
/// Cloning is cheap; the pixel buffer is shared and never mutated.
#[derive(Clone, Debug, PartialEq)]
pub struct BaseImage {
    rgba: Arc<RgbaImage>,
}

impl BaseImage {
    pub fn new(rgba: RgbaImage) -> Self {
        Self {
            rgba: Arc::new(rgba),
        }
    }

    /// Decode an image file into RGBA pixels
    pub fn load(path: &Path) -> Result<Self> {
        let rgba = image::open(path)
            .map_err(|source| EditorError::Load {
                path: path.to_path_buf(),
                source,
            })?
            .to_rgba8();
        if rgba.width() == 0 || rgba.height() == 0 {
            return Err(EditorError::EmptyImage {
                path: path.to_path_buf(),
            });
        }
        log::debug!(
            "BaseImage loaded: {}x{} pixels from {}",
            rgba.width(),
            rgba.height(),
            path.display()
        );
        Ok(Self::new(rgba))
    }

    /// Decode on the blocking pool so the caller's event loop stays free
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        tokio::task::spawn_blocking(move || Self::load(&path)).await?
    }

    pub fn rgba(&self) -> &RgbaImage {
        &self.rgba
    }

    /// Get the width of the image
    pub fn width(&self) -> u32 {
        self.rgba.width()
    }

    /// Get the height of the image
    pub fn height(&self) -> u32 {
        self.rgba.height()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    #[test]
    fn test_load_png() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("shot.png");
        RgbaImage::from_pixel(8, 5, Rgba([1, 2, 3, 255]))
            .save(&path)
            .unwrap();

        let base = BaseImage::load(&path).unwrap();
        assert_eq!((base.width(), base.height()), (8, 5));
        assert_eq!(base.rgba().get_pixel(0, 0), &Rgba([1, 2, 3, 255]));
    }

    #[test]
    fn test_missing_file_is_load_failure() {
        let dir = tempfile::tempdir().unwrap();
        let err = BaseImage::load(&dir.path().join("missing.png")).unwrap_err();
        assert!(matches!(err, EditorError::Load { .. }));
    }

    #[test]
    fn test_garbage_file_is_load_failure() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.png");
        std::fs::write(&path, b"definitely not a png").unwrap();
        assert!(matches!(
            BaseImage::load(&path),
            Err(EditorError::Load { .. })
        ));
    }

    #[tokio::test]
    async fn test_open_decodes_off_thread() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("shot.png");
        RgbaImage::from_pixel(3, 3, Rgba([9, 9, 9, 255]))
            .save(&path)
            .unwrap();
        let base = BaseImage::open(&path).await.unwrap();
        assert_eq!(base.width(), 3);
    }
}
