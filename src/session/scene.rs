//! The editable document: base image plus ordered annotations

use image::RgbaImage;
use tiny_skia::Pixmap;

use crate::capture::image::BaseImage;
use crate::domain::{Annotation, AnnotationId};
use crate::render::compositor;

/// Base image with annotations layered in z-order (last is topmost)
#[derive(Clone, Debug)]
pub struct Scene {
    base: BaseImage,
    objects: Vec<Annotation>,
    selected: Option<AnnotationId>,
    next_id: u64,
}

impl Scene {
    /// Start a scene over a decoded base image with no annotations
    pub fn load(base: BaseImage) -> Self {
        log::debug!("Scene loaded over {}x{} base image", base.width(), base.height());
        Self {
            base,
            objects: Vec::new(),
            selected: None,
            next_id: 1,
        }
    }

    pub fn base(&self) -> &BaseImage {
        &self.base
    }

    pub fn width(&self) -> u32 {
        self.base.width()
    }

    pub fn height(&self) -> u32 {
        self.base.height()
    }

    /// Hand out an id that has never been used in this scene
    pub fn allocate_id(&mut self) -> AnnotationId {
        let id = AnnotationId(self.next_id);
        self.next_id += 1;
        id
    }

    pub fn objects(&self) -> &[Annotation] {
        &self.objects
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn object(&self, id: AnnotationId) -> Option<&Annotation> {
        self.objects.iter().find(|a| a.id == id)
    }

    pub fn object_mut(&mut self, id: AnnotationId) -> Option<&mut Annotation> {
        self.objects.iter_mut().find(|a| a.id == id)
    }

    /// Append an annotation on top of all others
    ///
    /// Returns false and leaves the scene untouched if the id is already
    /// present.
    pub fn add_object(&mut self, annotation: Annotation) -> bool {
        if self.object(annotation.id).is_some() {
            log::warn!("Rejecting annotation with duplicate id {}", annotation.id);
            return false;
        }
        // Keep the allocator ahead of ids minted elsewhere
        self.next_id = self.next_id.max(annotation.id.0 + 1);
        self.objects.push(annotation);
        true
    }

    /// Remove an annotation, clearing the selection if it pointed at it
    pub fn remove_object(&mut self, id: AnnotationId) -> Option<Annotation> {
        let index = self.objects.iter().position(|a| a.id == id)?;
        if self.selected == Some(id) {
            self.selected = None;
        }
        Some(self.objects.remove(index))
    }

    /// Topmost annotation under the point, if any
    pub fn hit_test_topmost(&self, x: f32, y: f32) -> Option<&Annotation> {
        self.objects.iter().rev().find(|a| a.hit_test(x, y))
    }

    pub fn selected(&self) -> Option<AnnotationId> {
        self.selected
    }

    pub fn selected_object(&self) -> Option<&Annotation> {
        self.selected.and_then(|id| self.object(id))
    }

    /// Select an annotation; unknown ids clear the selection
    pub fn select(&mut self, id: AnnotationId) {
        self.selected = self.object(id).map(|a| a.id);
    }

    pub fn clear_selection(&mut self) {
        self.selected = None;
    }

    /// Replace the whole annotation list (history restore)
    pub fn replace_objects(&mut self, objects: Vec<Annotation>) {
        self.objects = objects;
        self.selected = None;
    }

    /// Remove every annotation
    pub fn clear(&mut self) {
        self.objects.clear();
        self.selected = None;
    }

    /// Draw the base image and every annotation onto `surface`
    pub fn render(&self, surface: &mut Pixmap) {
        compositor::render_onto(surface, self.base.rgba(), &self.objects);
    }

    /// Composite image as it would be exported
    pub fn flatten(&self) -> RgbaImage {
        compositor::flatten(self.base.rgba(), &self.objects)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ShapeColor;
    use crate::domain::{Point, RectOutline, Shape};
    use image::Rgba;

    fn scene() -> Scene {
        Scene::load(BaseImage::new(RgbaImage::from_pixel(
            200,
            200,
            Rgba([255, 255, 255, 255]),
        )))
    }

    fn rect(scene: &mut Scene, x: f32, y: f32) -> AnnotationId {
        let id = scene.allocate_id();
        let annotation = Annotation::new(
            id,
            ShapeColor::default(),
            2.0,
            Shape::Rectangle(RectOutline {
                anchor: Point::new(x, y),
                width: 50.0,
                height: 50.0,
            }),
        );
        assert!(scene.add_object(annotation));
        id
    }

    #[test]
    fn test_topmost_wins_hit_test() {
        let mut scene = scene();
        let below = rect(&mut scene, 10.0, 10.0);
        let above = rect(&mut scene, 30.0, 30.0);
        assert_eq!(scene.hit_test_topmost(40.0, 40.0).map(|a| a.id), Some(above));
        assert_eq!(scene.hit_test_topmost(15.0, 15.0).map(|a| a.id), Some(below));
        assert!(scene.hit_test_topmost(150.0, 150.0).is_none());
    }

    #[test]
    fn test_remove_unknown_id_is_noop() {
        let mut scene = scene();
        rect(&mut scene, 10.0, 10.0);
        assert!(scene.remove_object(AnnotationId(999)).is_none());
        assert_eq!(scene.len(), 1);
    }

    #[test]
    fn test_remove_clears_matching_selection() {
        let mut scene = scene();
        let a = rect(&mut scene, 10.0, 10.0);
        let b = rect(&mut scene, 100.0, 100.0);
        scene.select(a);
        scene.remove_object(b);
        assert_eq!(scene.selected(), Some(a));
        scene.remove_object(a);
        assert_eq!(scene.selected(), None);
    }

    #[test]
    fn test_duplicate_id_rejected() {
        let mut scene = scene();
        let id = rect(&mut scene, 10.0, 10.0);
        let dup = scene.object(id).cloned().unwrap();
        assert!(!scene.add_object(dup));
        assert_eq!(scene.len(), 1);
    }

    #[test]
    fn test_ids_never_reused_after_clear() {
        let mut scene = scene();
        let first = rect(&mut scene, 10.0, 10.0);
        scene.clear();
        let second = rect(&mut scene, 10.0, 10.0);
        assert_ne!(first, second);
    }

    #[test]
    fn test_select_unknown_clears() {
        let mut scene = scene();
        let id = rect(&mut scene, 10.0, 10.0);
        scene.select(id);
        scene.select(AnnotationId(42));
        assert_eq!(scene.selected(), None);
    }

    #[test]
    fn test_clear_then_flatten_matches_base() {
        let mut scene = scene();
        rect(&mut scene, 10.0, 10.0);
        assert_ne!(&scene.flatten(), scene.base().rgba());
        scene.clear();
        assert_eq!(&scene.flatten(), scene.base().rgba());
    }
}
