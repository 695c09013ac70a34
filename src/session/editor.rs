//! Editor facade tying the scene, history and controller together

use image::RgbaImage;
use tiny_skia::Pixmap;

use super::history::History;
use super::messages::{EditorMsg, HostEvent, PointerEvent};
use super::scene::Scene;
use super::shortcuts::handle_key_event;
use crate::annotations::InteractionController;
use crate::capture::image::BaseImage;
use crate::config::EditorConfig;
use crate::domain::{Point, ToolState};

/// Editable document plus the state needed to edit it
#[derive(Debug, Clone)]
pub struct Editor {
    scene: Scene,
    history: History,
    controller: InteractionController,
}

impl Editor {
    pub fn new(base: BaseImage, config: &EditorConfig) -> Self {
        let scene = Scene::load(base);
        let history = History::starting_at(&scene, config.history_capacity);
        Self {
            scene,
            history,
            controller: InteractionController::new(ToolState::new(config)),
        }
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn controller(&self) -> &InteractionController {
        &self.controller
    }

    /// Apply a discrete editor action
    pub fn update(&mut self, msg: EditorMsg) {
        let Self {
            scene,
            history,
            controller,
        } = self;
        match msg {
            EditorMsg::SetTool(tool) => controller.set_tool(scene, tool),
            EditorMsg::SetColor(color) => controller.set_color(color),
            EditorMsg::SetSize(size) => controller.set_size(size),
            EditorMsg::TextInput(text) => controller.text_input(&text),
            EditorMsg::TextBackspace => controller.text_backspace(),
            EditorMsg::TextCommit => controller.text_commit(scene, history),
            EditorMsg::TextCancel => controller.text_cancel(),
            EditorMsg::Escape => controller.escape(scene),
            EditorMsg::DeleteSelected => {
                controller.delete_selected(scene, history);
            }
            EditorMsg::Undo => {
                controller.undo(scene, history);
            }
            EditorMsg::Redo => {
                controller.redo(scene, history);
            }
            EditorMsg::ClearAll => controller.clear_all(scene, history),
        }
    }

    /// Route raw host input
    pub fn handle(&mut self, event: HostEvent) {
        match event {
            HostEvent::Pointer(pointer) => self.handle_pointer(pointer),
            HostEvent::Key(press) => {
                if let Some(msg) = handle_key_event(&press, self.controller.is_text_entry()) {
                    self.update(msg);
                }
            }
            HostEvent::Text(text) => {
                if self.controller.is_text_entry() {
                    self.update(EditorMsg::TextInput(text));
                }
            }
            HostEvent::Toolbar(msg) => self.update(msg),
        }
    }

    fn handle_pointer(&mut self, event: PointerEvent) {
        match event {
            PointerEvent::Down { x, y } => {
                self.controller.pointer_down(&mut self.scene, Point::new(x, y))
            }
            PointerEvent::Move { x, y } => {
                self.controller.pointer_move(&mut self.scene, Point::new(x, y))
            }
            PointerEvent::Up { x, y } => self.controller.pointer_up(
                &mut self.scene,
                &mut self.history,
                Point::new(x, y),
            ),
        }
    }

    /// Abandon any unfinished gesture so the scene holds only committed edits
    pub fn settle(&mut self) {
        self.controller.settle(&mut self.scene);
    }

    /// Draw base image and committed annotations
    pub fn render(&self, surface: &mut Pixmap) {
        self.scene.render(surface);
    }

    /// Draw previews, selection outline and text entry on the overlay
    pub fn draw_overlay(&self, overlay: &mut Pixmap) {
        self.controller.draw_overlay(&self.scene, overlay);
    }

    /// Committed scene flattened for export
    pub fn flatten(&self) -> RgbaImage {
        self.scene.flatten()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Tool;
    use crate::session::messages::{KeyPress, Modifiers, Named};
    use image::Rgba;

    fn editor() -> Editor {
        let base = BaseImage::new(RgbaImage::from_pixel(200, 100, Rgba([10, 20, 30, 255])));
        Editor::new(base, &EditorConfig::default())
    }

    fn pointer(editor: &mut Editor, events: &[PointerEvent]) {
        for event in events {
            editor.handle(HostEvent::Pointer(*event));
        }
    }

    #[test]
    fn test_keyboard_drives_text_entry() {
        let mut editor = editor();
        editor.handle(HostEvent::Key(KeyPress::character("t", Modifiers::NONE)));
        assert_eq!(editor.controller().tools().tool(), Tool::Text);

        pointer(&mut editor, &[PointerEvent::Down { x: 10.0, y: 50.0 }]);
        // "v" is text here, not the select tool
        editor.handle(HostEvent::Key(KeyPress::character("v", Modifiers::NONE)));
        editor.handle(HostEvent::Text("ia".into()));
        editor.handle(HostEvent::Key(KeyPress::named(Named::Enter)));

        assert_eq!(editor.controller().tools().tool(), Tool::Text);
        assert_eq!(editor.scene().len(), 1);
    }

    #[test]
    fn test_text_outside_entry_is_ignored() {
        let mut editor = editor();
        editor.handle(HostEvent::Text("stray".into()));
        assert!(editor.scene().is_empty());
    }

    #[test]
    fn test_toolbar_and_shortcut_undo() {
        let mut editor = editor();
        pointer(
            &mut editor,
            &[
                PointerEvent::Down { x: 10.0, y: 10.0 },
                PointerEvent::Move { x: 40.0, y: 40.0 },
                PointerEvent::Up { x: 40.0, y: 40.0 },
            ],
        );
        assert_eq!(editor.scene().len(), 1);
        editor.handle(HostEvent::Key(KeyPress::character("z", Modifiers::CONTROL)));
        assert!(editor.scene().is_empty());
        editor.handle(HostEvent::Toolbar(EditorMsg::Redo));
        assert_eq!(editor.scene().len(), 1);
    }

    #[test]
    fn test_history_capacity_from_config() {
        let config = EditorConfig {
            history_capacity: 3,
            ..EditorConfig::default()
        };
        let base = BaseImage::new(RgbaImage::new(50, 50));
        let editor = Editor::new(base, &config);
        assert_eq!(editor.history().capacity(), 3);
    }
}
