//! Snapshot-based undo/redo over a scene's annotation list

use std::collections::VecDeque;

use super::scene::Scene;
use crate::domain::Annotation;

/// Number of snapshots kept when not configured otherwise
pub const DEFAULT_CAPACITY: usize = 20;

/// Bounded stack of annotation-list snapshots
///
/// The top entry always mirrors the scene's current committed state. The
/// bottom entry is the floor that undo cannot go below.
#[derive(Clone, Debug)]
pub struct History {
    entries: VecDeque<Vec<Annotation>>,
    redo: Vec<Vec<Annotation>>,
    capacity: usize,
}

impl History {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: VecDeque::with_capacity(capacity),
            redo: Vec::new(),
            capacity,
        }
    }

    /// History seeded with the scene's current state as the floor
    pub fn starting_at(scene: &Scene, capacity: usize) -> Self {
        let mut history = Self::new(capacity);
        history.snapshot(scene);
        history
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn can_undo(&self) -> bool {
        self.entries.len() > 1
    }

    pub fn can_redo(&self) -> bool {
        !self.redo.is_empty()
    }

    /// Record the scene's current annotation list
    pub fn snapshot(&mut self, scene: &Scene) {
        self.entries.push_back(scene.objects().to_vec());
        while self.entries.len() > self.capacity {
            self.entries.pop_front();
        }
        self.redo.clear();
        log::debug!("History snapshot, {} entries", self.entries.len());
    }

    /// Restore the previous snapshot; returns false at the floor
    pub fn undo(&mut self, scene: &mut Scene) -> bool {
        if !self.can_undo() {
            log::debug!("Undo ignored, already at the oldest state");
            return false;
        }
        if let Some(current) = self.entries.pop_back() {
            self.redo.push(current);
        }
        if let Some(previous) = self.entries.back() {
            scene.replace_objects(previous.clone());
        }
        true
    }

    /// Re-apply the most recently undone snapshot
    pub fn redo(&mut self, scene: &mut Scene) -> bool {
        let Some(next) = self.redo.pop() else {
            log::debug!("Redo ignored, nothing was undone");
            return false;
        };
        scene.replace_objects(next.clone());
        self.entries.push_back(next);
        while self.entries.len() > self.capacity {
            self.entries.pop_front();
        }
        true
    }

    /// Drop all history and start over from the scene's current state
    pub fn reset(&mut self, scene: &Scene) {
        self.entries.clear();
        self.redo.clear();
        self.snapshot(scene);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capture::image::BaseImage;
    use crate::config::ShapeColor;
    use crate::domain::{CircleOutline, Point, Shape};
    use image::{Rgba, RgbaImage};

    fn scene() -> Scene {
        Scene::load(BaseImage::new(RgbaImage::from_pixel(
            64,
            64,
            Rgba([0, 0, 0, 255]),
        )))
    }

    fn commit_circle(scene: &mut Scene, history: &mut History, x: f32) {
        let id = scene.allocate_id();
        scene.add_object(Annotation::new(
            id,
            ShapeColor::default(),
            2.0,
            Shape::Circle(CircleOutline {
                center: Point::new(x, 10.0),
                radius: 5.0,
            }),
        ));
        history.snapshot(scene);
    }

    #[test]
    fn test_undo_walks_back_to_floor() {
        let mut scene = scene();
        let mut history = History::starting_at(&scene, DEFAULT_CAPACITY);
        for i in 0..5 {
            commit_circle(&mut scene, &mut history, i as f32);
        }
        let after_first = scene.objects()[..1].to_vec();

        for _ in 0..4 {
            assert!(history.undo(&mut scene));
        }
        assert_eq!(scene.objects(), after_first.as_slice());
        assert!(history.undo(&mut scene));
        assert!(scene.is_empty());
        assert!(!history.undo(&mut scene));
        assert!(scene.is_empty());
    }

    #[test]
    fn test_capacity_evicts_oldest() {
        let mut scene = scene();
        let mut history = History::starting_at(&scene, DEFAULT_CAPACITY);
        for i in 0..25 {
            commit_circle(&mut scene, &mut history, i as f32);
        }
        assert_eq!(history.len(), DEFAULT_CAPACITY);

        let mut undos = 0;
        while history.undo(&mut scene) {
            undos += 1;
        }
        assert_eq!(undos, DEFAULT_CAPACITY - 1);
        // the floor is now the state after the sixth commit
        assert_eq!(scene.len(), 6);
    }

    #[test]
    fn test_undo_clears_selection() {
        let mut scene = scene();
        let mut history = History::starting_at(&scene, DEFAULT_CAPACITY);
        commit_circle(&mut scene, &mut history, 1.0);
        commit_circle(&mut scene, &mut history, 2.0);
        let id = scene.objects()[0].id;
        scene.select(id);
        history.undo(&mut scene);
        assert_eq!(scene.selected(), None);
    }

    #[test]
    fn test_redo_after_undo_and_invalidated_by_commit() {
        let mut scene = scene();
        let mut history = History::starting_at(&scene, DEFAULT_CAPACITY);
        commit_circle(&mut scene, &mut history, 1.0);
        commit_circle(&mut scene, &mut history, 2.0);
        let full = scene.objects().to_vec();

        history.undo(&mut scene);
        assert_eq!(scene.len(), 1);
        assert!(history.redo(&mut scene));
        assert_eq!(scene.objects(), full.as_slice());
        assert!(!history.redo(&mut scene));

        history.undo(&mut scene);
        commit_circle(&mut scene, &mut history, 3.0);
        assert!(!history.can_redo());
    }

    #[test]
    fn test_reset_leaves_single_entry() {
        let mut scene = scene();
        let mut history = History::starting_at(&scene, DEFAULT_CAPACITY);
        commit_circle(&mut scene, &mut history, 1.0);
        scene.clear();
        history.reset(&scene);
        assert_eq!(history.len(), 1);
        assert!(!history.undo(&mut scene));
        assert!(scene.is_empty());
    }
}
