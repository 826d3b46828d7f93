use serde::{Deserialize, Serialize};

use crate::stroke::{PenConfig, ShapeKind};

/// The active tool selected in the toolbar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Tool {
    Pen,
    Highlighter,
    Line,
    Rectangle,
    Circle,
    Triangle,
    Pentagon,
    Hexagon,
    Text,
    Lasso,
    Eraser,
    EraserPlus,
}

impl Tool {
    pub const ALL: [Tool; 12] = [
        Tool::Pen,
        Tool::Highlighter,
        Tool::Line,
        Tool::Rectangle,
        Tool::Circle,
        Tool::Triangle,
        Tool::Pentagon,
        Tool::Hexagon,
        Tool::Text,
        Tool::Lasso,
        Tool::Eraser,
        Tool::EraserPlus,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Tool::Pen => "Pen",
            Tool::Highlighter => "Highlighter",
            Tool::Line => "Line",
            Tool::Rectangle => "Rectangle",
            Tool::Circle => "Circle",
            Tool::Triangle => "Triangle",
            Tool::Pentagon => "Pentagon",
            Tool::Hexagon => "Hexagon",
            Tool::Text => "Text",
            Tool::Lasso => "Lasso",
            Tool::Eraser => "Eraser",
            Tool::EraserPlus => "Smart Eraser",
        }
    }

    /// The shape this tool draws, if it is a two-point shape tool.
    pub fn shape_kind(self) -> Option<ShapeKind> {
        match self {
            Tool::Line => Some(ShapeKind::Line),
            Tool::Rectangle => Some(ShapeKind::Rectangle),
            Tool::Circle => Some(ShapeKind::Circle),
            Tool::Triangle => Some(ShapeKind::Triangle),
            Tool::Pentagon => Some(ShapeKind::Pentagon),
            Tool::Hexagon => Some(ShapeKind::Hexagon),
            _ => None,
        }
    }
}

/// Per-tool settings owned by the toolbar and read by the canvas controller.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolSettings {
    pub pen: PenConfig,
    pub eraser_size: f32,
    pub highlighter_size: f32,
}

impl Default for ToolSettings {
    fn default() -> Self {
        Self {
            pen: PenConfig::default(),
            eraser_size: 20.0,
            highlighter_size: 20.0,
        }
    }
}
