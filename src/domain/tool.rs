//! Active tool, color and stroke size

use serde::{Deserialize, Serialize};

use crate::config::{EditorConfig, ShapeColor};

/// Annotation tool selectable from the toolbar
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tool {
    #[default]
    Pen,
    Highlighter,
    Eraser,
    Rectangle,
    Circle,
    Arrow,
    Text,
    Select,
}

impl Tool {
    /// All tools in toolbar order
    pub const ALL: [Tool; 8] = [
        Tool::Pen,
        Tool::Highlighter,
        Tool::Eraser,
        Tool::Rectangle,
        Tool::Circle,
        Tool::Arrow,
        Tool::Text,
        Tool::Select,
    ];

    /// Tools that accumulate a freehand point list
    pub fn is_freehand(self) -> bool {
        matches!(self, Tool::Pen | Tool::Highlighter | Tool::Eraser)
    }

    /// Tools that drag out a shape from an anchor point
    pub fn is_shape(self) -> bool {
        matches!(self, Tool::Rectangle | Tool::Circle | Tool::Arrow)
    }

    /// Single-letter keyboard shortcut
    pub fn shortcut(self) -> char {
        match self {
            Tool::Pen => 'p',
            Tool::Highlighter => 'h',
            Tool::Eraser => 'e',
            Tool::Rectangle => 'r',
            Tool::Circle => 'c',
            Tool::Arrow => 'a',
            Tool::Text => 't',
            Tool::Select => 'v',
        }
    }

    pub fn from_shortcut(c: char) -> Option<Tool> {
        Tool::ALL.into_iter().find(|t| t.shortcut() == c)
    }
}

/// Tool selection state read on every pointer event
#[derive(Debug, Clone, PartialEq)]
pub struct ToolState {
    tool: Tool,
    color: ShapeColor,
    size: f32,
    min_size: f32,
    max_size: f32,
}

impl ToolState {
    pub fn new(config: &EditorConfig) -> Self {
        let config = config.clone().sanitized();
        Self {
            tool: config.default_tool,
            color: config.default_color,
            size: config.default_stroke_size,
            min_size: config.min_stroke_size,
            max_size: config.max_stroke_size,
        }
    }

    pub fn tool(&self) -> Tool {
        self.tool
    }

    pub fn color(&self) -> ShapeColor {
        self.color
    }

    pub fn size(&self) -> f32 {
        self.size
    }

    pub fn set_tool(&mut self, tool: Tool) {
        self.tool = tool;
    }

    pub fn set_color(&mut self, color: ShapeColor) {
        self.color = color;
    }

    /// Set the stroke size, clamped to the configured range
    pub fn set_size(&mut self, size: f32) {
        if size.is_nan() {
            return;
        }
        self.size = size.clamp(self.min_size, self.max_size);
    }
}

impl Default for ToolState {
    fn default() -> Self {
        Self::new(&EditorConfig::default())
    }
}
