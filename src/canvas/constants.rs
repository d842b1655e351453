//! Canvas constants
//!
//! Grid resolution and level-size limits.

use crate::raster::Color;

/// Pixels per world unit. One world unit is one level block.
pub const PIXELS_PER_UNIT: usize = 16;

/// Edge length of a sub-tile in pixels (one block)
pub const TILE_SIZE: usize = PIXELS_PER_UNIT;

/// Largest level canvas, in blocks
pub const MAX_LEVEL_BLOCKS: usize = 50;

/// World-space length of one pixel step, used by the imperfect line tool
pub const PIXEL_STEP: f32 = 1.0 / PIXELS_PER_UNIT as f32;

/// World map canvas: 1920x1080 reference scaled down 10x in world space
pub const MAP_WORLD_WIDTH: f32 = 1920.0 / 10.0;
pub const MAP_WORLD_HEIGHT: f32 = 1080.0 / 10.0;

/// World map canvas: 2x texture resolution of the reference size
pub const MAP_PIXEL_WIDTH: usize = 1920 * 2;
pub const MAP_PIXEL_HEIGHT: usize = 1080 * 2;

/// Grass green the map canvas is cleared to
pub const MAP_CLEAR_COLOR: Color = Color::new(138, 165, 112);
