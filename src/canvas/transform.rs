//! World-space placement of a canvas and world-to-grid mapping

use serde::{Serialize, Deserialize};

use crate::math::Vec2;
use crate::raster::GridPoint;

/// Where a canvas sits in the world and how large it is
///
/// The canvas is centred on `position` and spans `size` world units, so its
/// corners are `position +/- size / 2`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CanvasTransform {
    pub position: Vec2,
    pub size: Vec2,
}

impl Default for CanvasTransform {
    fn default() -> Self {
        Self {
            position: Vec2::ZERO,
            size: Vec2::new(1.0, 1.0),
        }
    }
}

impl CanvasTransform {
    pub fn new(position: Vec2, size: Vec2) -> Self {
        Self { position, size }
    }

    /// Lower-left corner relative to `position`
    pub fn bottom_left(&self) -> Vec2 {
        self.size.scale(-0.5)
    }

    /// Upper-right corner relative to `position`
    pub fn top_right(&self) -> Vec2 {
        self.size.scale(0.5)
    }

    /// Normalised [0, 1] coordinates of a world point (may fall outside)
    pub fn normalize(&self, world: Vec2) -> Vec2 {
        let bl = self.bottom_left();
        let tr = self.top_right();
        let local = world - self.position;
        Vec2::new(
            (local.x - bl.x) / (tr.x - bl.x),
            (local.y - bl.y) / (tr.y - bl.y),
        )
    }

    /// Continuous grid coordinates of a world point: cell `(x, y)` covers
    /// `[x, x + 1) x [y, y + 1)`. Not finite for a degenerate transform.
    pub fn world_to_grid_space(&self, world: Vec2, pixel_width: usize, pixel_height: usize) -> Vec2 {
        let n = self.normalize(world);
        Vec2::new(n.x * pixel_width as f32, n.y * pixel_height as f32)
    }

    /// Grid cell under a world point for a canvas of the given pixel size.
    /// Off-canvas points yield off-grid cells; callers drop them.
    pub fn world_to_grid(&self, world: Vec2, pixel_width: usize, pixel_height: usize) -> GridPoint {
        grid_cell(self.world_to_grid_space(world, pixel_width, pixel_height))
    }

    /// Whether the transform maps world space onto a grid at all
    pub fn is_valid(&self) -> bool {
        self.position.x.is_finite()
            && self.position.y.is_finite()
            && self.size.x.is_finite()
            && self.size.y.is_finite()
            && self.size.x > 0.0
            && self.size.y > 0.0
    }

    /// World position of a cell's centre
    pub fn grid_to_world(&self, cell: GridPoint, pixel_width: usize, pixel_height: usize) -> Vec2 {
        let bl = self.bottom_left();
        let fx = (cell.x as f32 + 0.5) / pixel_width.max(1) as f32;
        let fy = (cell.y as f32 + 0.5) / pixel_height.max(1) as f32;
        self.position + bl + Vec2::new(fx * self.size.x, fy * self.size.y)
    }
}

/// Cell containing a continuous grid coordinate
pub fn grid_cell(p: Vec2) -> GridPoint {
    GridPoint::new(floor_to_i32(p.x), floor_to_i32(p.y))
}

/// Floor with saturation; NaN (zero-size canvas) maps to an off-grid cell
fn floor_to_i32(v: f32) -> i32 {
    if v.is_nan() {
        return i32::MIN;
    }
    v.floor() as i32
}
