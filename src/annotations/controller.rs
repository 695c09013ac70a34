//! Pointer and keyboard state machine that turns input into scene edits
//!
//! Every discrete edit (commit, move, delete) pushes exactly one history
//! snapshot. In-progress gestures live only here and never touch the scene
//! until they commit, except drags which move the object live.

use tiny_skia::{Color, Pixmap};

use crate::config::ShapeColor;
use crate::domain::{
    Annotation, AnnotationId, Arrow, CircleOutline, FreehandPath, Point, RectOutline, Shape,
    StrokeKind, TextLabel, Tool, ToolState,
};
use crate::render::geometry::text::FONT_SIZE_FACTOR;
use crate::render::image::{draw_selection_outline, draw_text_entry};
use crate::session::history::History;
use crate::session::scene::Scene;

/// Id used for previews; never stored in a scene
const PREVIEW_ID: AnnotationId = AnnotationId(0);

/// Object being drawn but not yet committed
#[derive(Debug, Clone, PartialEq)]
pub enum Draft {
    /// Freehand point accumulation
    Path { kind: StrokeKind, points: Vec<Point> },
    /// Rectangle, circle or arrow dragged out from an anchor
    Shape {
        tool: Tool,
        anchor: Point,
        current: Point,
    },
}

impl Draft {
    fn start(tool: Tool, at: Point) -> Option<Self> {
        if tool.is_shape() {
            return Some(Draft::Shape {
                tool,
                anchor: at,
                current: at,
            });
        }
        if !tool.is_freehand() {
            return None;
        }
        let kind = match tool {
            Tool::Highlighter => StrokeKind::Highlighter,
            Tool::Eraser => StrokeKind::Eraser,
            _ => StrokeKind::Pen,
        };
        Some(Draft::Path {
            kind,
            points: vec![at],
        })
    }

    fn extend(&mut self, to: Point) {
        match self {
            Draft::Path { points, .. } => {
                if points.last() != Some(&to) {
                    points.push(to);
                }
            }
            Draft::Shape { current, .. } => *current = to,
        }
    }

    /// Geometry this draft would commit as
    fn shape(&self) -> Option<Shape> {
        match self {
            Draft::Path { kind, points } => Some(Shape::Freehand(FreehandPath {
                kind: *kind,
                points: points.clone(),
            })),
            Draft::Shape {
                tool,
                anchor,
                current,
            } => match tool {
                Tool::Rectangle => Some(Shape::Rectangle(RectOutline {
                    anchor: *anchor,
                    width: current.x - anchor.x,
                    height: current.y - anchor.y,
                })),
                Tool::Circle => Some(Shape::Circle(CircleOutline {
                    center: *anchor,
                    radius: anchor.distance(*current),
                })),
                Tool::Arrow => Some(Shape::Arrow(Arrow {
                    from: *anchor,
                    to: *current,
                })),
                _ => None,
            },
        }
    }
}

/// Controller state
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Gesture {
    #[default]
    Idle,
    Drawing(Draft),
    /// Selected object follows the pointer
    Dragging {
        id: AnnotationId,
        origin: Point,
        last: Point,
    },
    /// Text capture open at a baseline anchor
    TextEntry { anchor: Point, buffer: String },
}

/// Routes pointer and key input to the scene according to the active tool
#[derive(Debug, Clone, Default)]
pub struct InteractionController {
    tools: ToolState,
    gesture: Gesture,
}

impl InteractionController {
    pub fn new(tools: ToolState) -> Self {
        Self {
            tools,
            gesture: Gesture::Idle,
        }
    }

    pub fn tools(&self) -> &ToolState {
        &self.tools
    }

    pub fn gesture(&self) -> &Gesture {
        &self.gesture
    }

    pub fn is_idle(&self) -> bool {
        matches!(self.gesture, Gesture::Idle)
    }

    pub fn is_text_entry(&self) -> bool {
        matches!(self.gesture, Gesture::TextEntry { .. })
    }

    // ========================================================================
    // Pointer input
    // ========================================================================

    pub fn pointer_down(&mut self, scene: &mut Scene, at: Point) {
        match &mut self.gesture {
            Gesture::TextEntry { anchor, buffer } => {
                log::debug!("Text entry moved to ({}, {})", at.x, at.y);
                *anchor = at;
                buffer.clear();
                return;
            }
            Gesture::Idle => {}
            // A second press without a release is ignored
            Gesture::Drawing(_) | Gesture::Dragging { .. } => return,
        }

        match self.tools.tool() {
            Tool::Select => match scene.hit_test_topmost(at.x, at.y).map(|a| a.id) {
                Some(id) => {
                    scene.select(id);
                    log::debug!("Selected annotation {id}");
                    self.gesture = Gesture::Dragging {
                        id,
                        origin: at,
                        last: at,
                    };
                }
                None => scene.clear_selection(),
            },
            Tool::Text => {
                self.gesture = Gesture::TextEntry {
                    anchor: at,
                    buffer: String::new(),
                };
            }
            tool => {
                if let Some(draft) = Draft::start(tool, at) {
                    self.gesture = Gesture::Drawing(draft);
                }
            }
        }
    }

    pub fn pointer_move(&mut self, scene: &mut Scene, at: Point) {
        match &mut self.gesture {
            Gesture::Drawing(draft) => draft.extend(at),
            Gesture::Dragging { id, last, .. } => {
                let (dx, dy) = (at.x - last.x, at.y - last.y);
                if let Some(object) = scene.object_mut(*id) {
                    object.translate(dx, dy);
                }
                *last = at;
            }
            Gesture::Idle | Gesture::TextEntry { .. } => {}
        }
    }

    pub fn pointer_up(&mut self, scene: &mut Scene, history: &mut History, at: Point) {
        match std::mem::take(&mut self.gesture) {
            Gesture::Drawing(mut draft) => {
                draft.extend(at);
                self.commit(scene, history, draft.shape());
            }
            Gesture::Dragging { id, origin, last } => {
                if let Some(object) = scene.object_mut(id) {
                    object.translate(at.x - last.x, at.y - last.y);
                }
                if at != origin {
                    log::debug!("Moved annotation {id}");
                    history.snapshot(scene);
                }
            }
            other => self.gesture = other,
        }
    }

    fn commit(&mut self, scene: &mut Scene, history: &mut History, shape: Option<Shape>) {
        let Some(shape) = shape else {
            return;
        };
        if shape.is_degenerate() {
            log::debug!("Discarding degenerate gesture");
            return;
        }
        let id = scene.allocate_id();
        let annotation = Annotation::new(id, self.tools.color(), self.tools.size(), shape);
        log::debug!("Committed {:?} annotation {id}", annotation.kind());
        if scene.add_object(annotation) {
            history.snapshot(scene);
        }
    }

    // ========================================================================
    // Tool state
    // ========================================================================

    /// Switch tool, dropping any selection and unfinished gesture
    pub fn set_tool(&mut self, scene: &mut Scene, tool: Tool) {
        self.discard_gesture(scene);
        scene.clear_selection();
        self.tools.set_tool(tool);
        log::debug!("Tool set to {tool:?}");
    }

    pub fn set_color(&mut self, color: ShapeColor) {
        self.tools.set_color(color);
    }

    pub fn set_size(&mut self, size: f32) {
        self.tools.set_size(size);
    }

    // ========================================================================
    // Text entry
    // ========================================================================

    pub fn text_input(&mut self, text: &str) {
        if let Gesture::TextEntry { buffer, .. } = &mut self.gesture {
            buffer.extend(text.chars().filter(|c| !c.is_control()));
        }
    }

    pub fn text_backspace(&mut self) {
        if let Gesture::TextEntry { buffer, .. } = &mut self.gesture {
            buffer.pop();
        }
    }

    /// Commit the pending text at its anchor; empty text just closes
    pub fn text_commit(&mut self, scene: &mut Scene, history: &mut History) {
        if !self.is_text_entry() {
            return;
        }
        if let Gesture::TextEntry { anchor, buffer } = std::mem::take(&mut self.gesture) {
            let shape = Shape::Text(TextLabel {
                anchor,
                content: buffer,
            });
            self.commit(scene, history, Some(shape));
        }
    }

    pub fn text_cancel(&mut self) {
        if self.is_text_entry() {
            log::debug!("Text entry cancelled");
            self.gesture = Gesture::Idle;
        }
    }

    // ========================================================================
    // Selection and history
    // ========================================================================

    /// Delete the selected object; returns false if nothing was removed
    pub fn delete_selected(&mut self, scene: &mut Scene, history: &mut History) -> bool {
        if !self.is_idle() {
            return false;
        }
        let Some(id) = scene.selected() else {
            log::debug!("Delete ignored, nothing selected");
            return false;
        };
        if scene.remove_object(id).is_none() {
            return false;
        }
        log::debug!("Deleted annotation {id}");
        history.snapshot(scene);
        true
    }

    /// Abort the current gesture, or deselect when there is none
    pub fn escape(&mut self, scene: &mut Scene) {
        if self.is_idle() {
            scene.clear_selection();
        } else {
            self.discard_gesture(scene);
        }
    }

    pub fn undo(&mut self, scene: &mut Scene, history: &mut History) -> bool {
        self.discard_gesture(scene);
        history.undo(scene)
    }

    pub fn redo(&mut self, scene: &mut Scene, history: &mut History) -> bool {
        self.discard_gesture(scene);
        history.redo(scene)
    }

    /// Remove every object and restart history from the empty scene
    pub fn clear_all(&mut self, scene: &mut Scene, history: &mut History) {
        self.discard_gesture(scene);
        scene.clear();
        history.reset(scene);
        log::debug!("Cleared all annotations");
    }

    /// Return the scene to its last committed state before it is read out
    ///
    /// Drafts and pending text are dropped and an unfinished drag is moved
    /// back to where it started.
    pub fn settle(&mut self, scene: &mut Scene) {
        if !self.is_idle() {
            log::debug!("Discarding unfinished gesture before export");
        }
        self.discard_gesture(scene);
    }

    /// Drop the in-progress gesture; an unfinished drag is moved back
    fn discard_gesture(&mut self, scene: &mut Scene) {
        if let Gesture::Dragging { id, origin, last } = std::mem::take(&mut self.gesture) {
            if let Some(object) = scene.object_mut(id) {
                object.translate(origin.x - last.x, origin.y - last.y);
            }
        }
    }

    // ========================================================================
    // Live preview
    // ========================================================================

    /// The uncommitted object as it would be drawn right now
    pub fn preview(&self) -> Option<Annotation> {
        let Gesture::Drawing(draft) = &self.gesture else {
            return None;
        };
        let shape = draft.shape()?;
        Some(Annotation::new(
            PREVIEW_ID,
            self.tools.color(),
            self.tools.size(),
            shape,
        ))
    }

    /// Repaint the transparent overlay drawn above the scene
    pub fn draw_overlay(&self, scene: &Scene, overlay: &mut Pixmap) {
        overlay.fill(Color::TRANSPARENT);
        if let Some(preview) = self.preview() {
            preview.draw_preview(overlay);
        }
        if let Some(selected) = scene.selected_object() {
            draw_selection_outline(overlay, selected.bounds());
        }
        if let Gesture::TextEntry { anchor, buffer } = &self.gesture {
            draw_text_entry(
                overlay,
                *anchor,
                buffer,
                self.tools.color(),
                self.tools.size() * FONT_SIZE_FACTOR,
            );
        }
    }
}
