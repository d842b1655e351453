//! Tile-backed paint canvases
//!
//! A `Canvas` is a pixel grid stretched over a rectangle of world space. It
//! owns its committed pixels, the sub-tile overlay used while a brush stroke
//! is in flight, and (between `begin_drawing` and `end_drawing`) a working
//! copy that receives every write of the current stroke.
//!
//! ## Lifecycle
//!
//! ```text
//! new() --initialize()--> [Idle] --begin_drawing()--> [Drawing]
//!                           ^                            |
//!                           +------end_drawing()---------+
//! ```
//!
//! Every public operation ignores coordinates that land off the canvas, and
//! operations on an uninitialized canvas do nothing.

mod constants;
mod display;
mod engine;
mod layers;
mod tiles;
mod transform;

pub use constants::*;
pub use display::{DisplaySink, RecordingDisplay};
pub use layers::{CanvasLayer, LevelCanvases};
pub use tiles::{SubTile, SubTileManager};
pub use transform::{grid_cell, CanvasTransform};

use tracing::{debug, warn};

use crate::math::Vec2;
use crate::raster::{Color, DirtyRect, PixelBuffer};

/// In-flight stroke state
#[derive(Debug, Clone)]
struct DrawSession {
    /// Committed pixels plus every write of this stroke
    working: PixelBuffer,
    /// Route writes to the sub-tile overlay instead of full uploads
    tiled: bool,
    /// Bounding box of cells written this stroke
    touched: Option<DirtyRect>,
}

/// A paintable level-art canvas
#[derive(Debug, Clone)]
pub struct Canvas {
    transform: CanvasTransform,
    /// Committed pixels (what the eyedropper and undo see)
    pixels: PixelBuffer,
    initialized: bool,
    visible: bool,
    tiles: SubTileManager,
    session: Option<DrawSession>,
    /// Full-canvas upload requested for the next `present`
    needs_upload: bool,
}

impl Default for Canvas {
    fn default() -> Self {
        Self::new()
    }
}

impl Canvas {
    /// Create an uninitialized canvas
    pub fn new() -> Self {
        Self {
            transform: CanvasTransform::default(),
            pixels: PixelBuffer::default(),
            initialized: false,
            visible: true,
            tiles: SubTileManager::new(),
            session: None,
            needs_upload: false,
        }
    }

    /// Allocate a transparent `pixel_width` x `pixel_height` grid spanning
    /// `width` x `height` world units
    /// A non-finite or non-positive world size leaves the canvas unchanged.
    pub fn initialize(&mut self, width: f32, height: f32, pixel_width: usize, pixel_height: usize) {
        let size = Vec2::new(width, height);
        if !CanvasTransform::new(self.transform.position, size).is_valid() {
            warn!(width, height, "refusing to initialize canvas with a degenerate size");
            return;
        }
        debug!(width, height, pixel_width, pixel_height, "initializing canvas");
        self.transform.size = size;
        self.pixels = PixelBuffer::new(pixel_width, pixel_height);
        self.initialized = true;
        self.session = None;
        self.tiles.sync(pixel_width, pixel_height);
        self.needs_upload = true;
    }

    /// Initialized canvas sized in level blocks (`PIXELS_PER_UNIT` pixels each)
    pub fn with_blocks(blocks_wide: usize, blocks_high: usize, clear_color: Color) -> Self {
        let mut canvas = Self::new();
        canvas.initialize(
            blocks_wide as f32,
            blocks_high as f32,
            blocks_wide * PIXELS_PER_UNIT,
            blocks_high * PIXELS_PER_UNIT,
        );
        canvas.clear(clear_color);
        canvas
    }

    /// World map canvas preset
    pub fn world_map() -> Self {
        let mut canvas = Self::new();
        canvas.initialize(MAP_WORLD_WIDTH, MAP_WORLD_HEIGHT, MAP_PIXEL_WIDTH, MAP_PIXEL_HEIGHT);
        canvas.clear(MAP_CLEAR_COLOR);
        canvas
    }

    /// Build an initialized canvas around existing pixels (used when loading)
    pub fn from_pixels(transform: CanvasTransform, pixels: PixelBuffer) -> Self {
        let mut canvas = Self::new();
        canvas.tiles.sync(pixels.width(), pixels.height());
        canvas.transform = transform;
        canvas.pixels = pixels;
        canvas.initialized = true;
        canvas.needs_upload = true;
        canvas
    }

    /// Reset every committed cell. Refused while a stroke is open, since the
    /// stroke's diff could not record it.
    pub fn clear(&mut self, color: Color) {
        if !self.initialized {
            return;
        }
        if self.session.is_some() {
            warn!("clear called with a stroke open; ignoring");
            return;
        }
        self.pixels.clear(color);
        self.needs_upload = true;
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    pub fn transform(&self) -> &CanvasTransform {
        &self.transform
    }

    pub fn set_position(&mut self, position: Vec2) {
        self.transform.position = position;
    }

    /// World-space size
    pub fn scale(&self) -> Vec2 {
        self.transform.size
    }

    pub fn pixel_width(&self) -> usize {
        self.pixels.width()
    }

    pub fn pixel_height(&self) -> usize {
        self.pixels.height()
    }

    /// Committed pixels
    pub fn pixels(&self) -> &PixelBuffer {
        &self.pixels
    }

    pub fn tiles(&self) -> &SubTileManager {
        &self.tiles
    }

    /// Rebuild the sub-tile grid if the canvas size changed since the last
    /// call. Hosts call this once per update.
    pub fn sync_tiles(&mut self) -> bool {
        if !self.initialized {
            return false;
        }
        self.tiles.sync(self.pixels.width(), self.pixels.height())
    }

    /// Whether the next `present` uploads the whole canvas
    pub fn needs_upload(&self) -> bool {
        self.needs_upload
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_is_uninitialized() {
        let mut canvas = Canvas::new();
        assert!(!canvas.is_initialized());
        canvas.clear(Color::RED);
        assert!(canvas.pixels().is_empty());
        assert!(!canvas.sync_tiles());
    }

    #[test]
    fn test_with_blocks() {
        let canvas = Canvas::with_blocks(3, 2, Color::WHITE);
        assert!(canvas.is_initialized());
        assert_eq!(canvas.pixel_width(), 3 * PIXELS_PER_UNIT);
        assert_eq!(canvas.pixel_height(), 2 * PIXELS_PER_UNIT);
        assert_eq!(canvas.scale(), Vec2::new(3.0, 2.0));
        assert_eq!(canvas.tiles().dimensions(), (3, 2));
        assert!(canvas.pixels().pixels().iter().all(|&c| c == Color::WHITE));
    }

    #[test]
    fn test_world_map_preset() {
        let canvas = Canvas::world_map();
        assert_eq!(canvas.pixel_width(), MAP_PIXEL_WIDTH);
        assert_eq!(canvas.pixels().get(0, 0), MAP_CLEAR_COLOR);
    }

    #[test]
    fn test_reinitialize_replaces_grid() {
        let mut canvas = Canvas::with_blocks(2, 2, Color::RED);
        canvas.initialize(1.0, 1.0, 16, 16);
        assert_eq!(canvas.pixel_width(), 16);
        assert_eq!(canvas.pixels().get(0, 0), Color::TRANSPARENT);
        assert_eq!(canvas.tiles().dimensions(), (1, 1));
    }

    #[test]
    fn test_degenerate_size_stays_uninitialized() {
        let mut canvas = Canvas::new();
        canvas.initialize(0.0, 1.0, 16, 16);
        assert!(!canvas.is_initialized());
        canvas.initialize(f32::NAN, 1.0, 16, 16);
        assert!(!canvas.is_initialized());
        canvas.initialize(1.0, f32::INFINITY, 16, 16);
        assert!(!canvas.is_initialized());
        canvas.initialize(1.0, 1.0, 16, 16);
        assert!(canvas.is_initialized());
    }

    #[test]
    fn test_clear_refused_during_stroke() {
        let mut canvas = Canvas::with_blocks(1, 1, Color::WHITE);
        canvas.begin_drawing(false);
        canvas.clear(Color::RED);
        assert!(canvas.end_drawing().is_empty());
        assert!(canvas.pixels().pixels().iter().all(|&c| c == Color::WHITE));

        canvas.clear(Color::RED);
        assert!(canvas.pixels().pixels().iter().all(|&c| c == Color::RED));
    }
}
