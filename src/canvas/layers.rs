//! The three art layers of a level

use serde::{Serialize, Deserialize};
use tracing::info;

use super::constants::{MAX_LEVEL_BLOCKS, PIXELS_PER_UNIT};
use super::Canvas;
use crate::math::Vec2;
use crate::raster::Color;
use crate::undo::DeltaTarget;

/// Which level canvas a stroke targets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum CanvasLayer {
    /// Opaque backdrop, cleared to white
    #[default]
    Background,
    /// Transparent shadow pass between background and objects
    Shadow,
    /// Transparent layer drawn over level objects
    Foreground,
}

impl CanvasLayer {
    /// Storage and draw order
    pub const ALL: [CanvasLayer; 3] = [
        CanvasLayer::Background,
        CanvasLayer::Shadow,
        CanvasLayer::Foreground,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            CanvasLayer::Background => "Background",
            CanvasLayer::Shadow => "Shadow",
            CanvasLayer::Foreground => "Foreground",
        }
    }

    /// Color a fresh canvas of this layer is cleared to
    pub fn clear_color(&self) -> Color {
        match self {
            CanvasLayer::Background => Color::WHITE,
            CanvasLayer::Shadow | CanvasLayer::Foreground => Color::TRANSPARENT,
        }
    }
}

/// Background, shadow and foreground canvases of one level
#[derive(Debug, Clone, Default)]
pub struct LevelCanvases {
    pub background: Canvas,
    pub shadow: Canvas,
    pub foreground: Canvas,
}

impl LevelCanvases {
    /// Three uninitialized canvases
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_layers(background: Canvas, shadow: Canvas, foreground: Canvas) -> Self {
        Self { background, shadow, foreground }
    }

    /// Size all three canvases to `blocks_wide` x `blocks_high` level blocks
    /// (clamped to 1..=MAX_LEVEL_BLOCKS), centred on `center`
    pub fn initialize(&mut self, blocks_wide: usize, blocks_high: usize, center: Vec2) {
        let w = blocks_wide.clamp(1, MAX_LEVEL_BLOCKS);
        let h = blocks_high.clamp(1, MAX_LEVEL_BLOCKS);
        info!(blocks_wide = w, blocks_high = h, "initializing level canvases");
        for layer in CanvasLayer::ALL {
            let canvas = self.get_mut(layer);
            canvas.initialize(w as f32, h as f32, w * PIXELS_PER_UNIT, h * PIXELS_PER_UNIT);
            canvas.clear(layer.clear_color());
            canvas.set_position(center);
        }
    }

    /// True once every layer has pixels
    pub fn is_initialized(&self) -> bool {
        CanvasLayer::ALL.iter().all(|&l| self.get(l).is_initialized())
    }

    pub fn get(&self, layer: CanvasLayer) -> &Canvas {
        match layer {
            CanvasLayer::Background => &self.background,
            CanvasLayer::Shadow => &self.shadow,
            CanvasLayer::Foreground => &self.foreground,
        }
    }

    pub fn get_mut(&mut self, layer: CanvasLayer) -> &mut Canvas {
        match layer {
            CanvasLayer::Background => &mut self.background,
            CanvasLayer::Shadow => &mut self.shadow,
            CanvasLayer::Foreground => &mut self.foreground,
        }
    }

    /// Layers in draw order
    pub fn iter(&self) -> impl Iterator<Item = (CanvasLayer, &Canvas)> {
        CanvasLayer::ALL.into_iter().map(move |l| (l, self.get(l)))
    }
}

impl DeltaTarget for LevelCanvases {
    fn canvas_for(&mut self, layer: CanvasLayer) -> Option<&mut Canvas> {
        let canvas = self.get_mut(layer);
        canvas.is_initialized().then_some(canvas)
    }
}
