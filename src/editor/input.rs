//! Editor input and output values

use serde::{Serialize, Deserialize};

use crate::canvas::CanvasLayer;
use crate::math::Vec2;
use crate::raster::Color;

/// Canvas painting tools
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Tool {
    /// Freehand brush (size 1 = pencil), jitter-corrected on release
    #[default]
    Brush,
    /// Flood fill, repeated every frame while held
    Bucket,
    /// Picks the committed colour under the pointer
    Dropper,
    /// Hand-drawn looking straight line from press to release
    Line,
}

impl Tool {
    pub const ALL: [Tool; 4] = [Tool::Brush, Tool::Bucket, Tool::Dropper, Tool::Line];

    pub fn label(&self) -> &'static str {
        match self {
            Tool::Brush => "Brush (B)",
            Tool::Bucket => "Bucket (F)",
            Tool::Dropper => "Dropper (I)",
            Tool::Line => "Line (L)",
        }
    }

    /// Whether strokes of this tool go through the sub-tile overlay
    pub fn uses_tiles(&self) -> bool {
        matches!(self, Tool::Brush)
    }

    /// Whether this tool uses brush size
    pub fn uses_brush_size(&self) -> bool {
        matches!(self, Tool::Brush | Tool::Line)
    }
}

/// Which pointer button a stroke was started with
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerButton {
    /// Paints the primary colour
    Primary,
    /// Paints the secondary colour
    Secondary,
}

/// Pointer input in world coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    PointerDown { position: Vec2, button: PointerButton },
    /// Pointer held; sent every frame, moved or not
    PointerDrag { position: Vec2 },
    PointerUp { position: Vec2 },
}

/// Things the editor reports back to the host
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EditorEvent {
    PrimaryColorChanged(Color),
    SecondaryColorChanged(Color),
    /// A stroke changed `pixels` cells and was pushed onto the undo stack
    StrokeCommitted { layer: CanvasLayer, pixels: usize },
    Undone(CanvasLayer),
    Redone(CanvasLayer),
}

/// State of the stroke between pointer-down and pointer-up
#[derive(Debug, Clone, PartialEq)]
pub struct Stroke {
    pub tool: Tool,
    pub button: PointerButton,
    pub layer: CanvasLayer,
    pub color: Color,
    pub start: Vec2,
    pub last: Vec2,
    /// Every distinct pointer position, in order
    pub raw: Vec<Vec2>,
}

impl Stroke {
    pub fn new(tool: Tool, button: PointerButton, layer: CanvasLayer, color: Color, start: Vec2) -> Self {
        Self {
            tool,
            button,
            layer,
            color,
            start,
            last: start,
            raw: vec![start],
        }
    }

    /// Record a new pointer position. Returns the previous one when the
    /// pointer actually moved.
    pub fn advance(&mut self, position: Vec2) -> Option<Vec2> {
        if position == self.last {
            return None;
        }
        let previous = self.last;
        self.last = position;
        self.raw.push(position);
        Some(previous)
    }
}
