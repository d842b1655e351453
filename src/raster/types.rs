//! Core raster value types: colors, color deltas, grid cells and regions

use serde::{Serialize, Deserialize};

// =============================================================================
// Color
// =============================================================================

/// 8-bit RGBA color, the single pixel representation used by canvases,
/// undo deltas and persisted images
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const TRANSPARENT: Color = Color { r: 0, g: 0, b: 0, a: 0 };
    pub const BLACK: Color = Color { r: 0, g: 0, b: 0, a: 255 };
    pub const WHITE: Color = Color { r: 255, g: 255, b: 255, a: 255 };
    pub const RED: Color = Color { r: 255, g: 0, b: 0, a: 255 };
    pub const GREEN: Color = Color { r: 0, g: 255, b: 0, a: 255 };
    pub const BLUE: Color = Color { r: 0, g: 0, b: 255, a: 255 };

    /// Opaque color
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub fn from_bytes(bytes: [u8; 4]) -> Self {
        Self { r: bytes[0], g: bytes[1], b: bytes[2], a: bytes[3] }
    }

    pub fn to_bytes(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }

    /// Apply a delta (wrapping per channel)
    pub fn add_delta(self, delta: ColorDelta) -> Self {
        Self {
            r: self.r.wrapping_add(delta.r),
            g: self.g.wrapping_add(delta.g),
            b: self.b.wrapping_add(delta.b),
            a: self.a.wrapping_add(delta.a),
        }
    }

    /// Remove a delta (wrapping per channel)
    pub fn sub_delta(self, delta: ColorDelta) -> Self {
        Self {
            r: self.r.wrapping_sub(delta.r),
            g: self.g.wrapping_sub(delta.g),
            b: self.b.wrapping_sub(delta.b),
            a: self.a.wrapping_sub(delta.a),
        }
    }
}

/// Per-channel difference `new - old`, modulo 256
///
/// Wrapping arithmetic keeps `old + (new - old) == new` exact for every byte
/// value, so undo and redo are lossless inverses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ColorDelta {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl ColorDelta {
    pub fn between(old: Color, new: Color) -> Self {
        Self {
            r: new.r.wrapping_sub(old.r),
            g: new.g.wrapping_sub(old.g),
            b: new.b.wrapping_sub(old.b),
            a: new.a.wrapping_sub(old.a),
        }
    }

    pub fn is_zero(self) -> bool {
        self == ColorDelta::default()
    }
}

// =============================================================================
// Grid coordinates
// =============================================================================

/// Integer cell coordinate on a canvas grid (may lie off-canvas)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct GridPoint {
    pub x: i32,
    pub y: i32,
}

impl GridPoint {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Shifted cell; saturates at the `i32` range
    pub fn offset(self, dx: i32, dy: i32) -> Self {
        Self { x: self.x.saturating_add(dx), y: self.y.saturating_add(dy) }
    }

    /// 4-connected neighbours: left, right, up, down
    pub fn neighbors4(self) -> [GridPoint; 4] {
        [
            self.offset(-1, 0),
            self.offset(1, 0),
            self.offset(0, 1),
            self.offset(0, -1),
        ]
    }
}

/// Inclusive bounding box of touched cells
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DirtyRect {
    pub min_x: usize,
    pub min_y: usize,
    pub max_x: usize,
    pub max_y: usize,
}

impl DirtyRect {
    pub fn from_cell(x: usize, y: usize) -> Self {
        Self { min_x: x, min_y: y, max_x: x, max_y: y }
    }

    pub fn include(&mut self, x: usize, y: usize) {
        self.min_x = self.min_x.min(x);
        self.min_y = self.min_y.min(y);
        self.max_x = self.max_x.max(x);
        self.max_y = self.max_y.max(y);
    }

    pub fn contains(&self, x: usize, y: usize) -> bool {
        x >= self.min_x && x <= self.max_x && y >= self.min_y && y <= self.max_y
    }
}

/// Grow an optional rect to cover a cell
pub fn expand_dirty(rect: &mut Option<DirtyRect>, x: usize, y: usize) {
    match rect {
        Some(r) => r.include(x, y),
        None => *rect = Some(DirtyRect::from_cell(x, y)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_delta_is_exact_inverse() {
        let old = Color::rgba(250, 3, 128, 0);
        let new = Color::rgba(2, 255, 127, 255);
        let delta = ColorDelta::between(old, new);
        assert_eq!(old.add_delta(delta), new);
        assert_eq!(new.sub_delta(delta), old);
    }

    #[test]
    fn test_zero_delta() {
        assert!(ColorDelta::between(Color::RED, Color::RED).is_zero());
        assert!(!ColorDelta::between(Color::RED, Color::BLUE).is_zero());
    }

    #[test]
    fn test_offset_saturates() {
        let edge = GridPoint::new(i32::MIN, i32::MAX);
        assert_eq!(edge.offset(-1, 1), edge);
        assert_eq!(edge.neighbors4()[1], GridPoint::new(i32::MIN + 1, i32::MAX));
    }

    #[test]
    fn test_dirty_rect_growth() {
        let mut rect = None;
        expand_dirty(&mut rect, 4, 2);
        expand_dirty(&mut rect, 1, 7);
        let r = rect.unwrap();
        assert_eq!((r.min_x, r.min_y, r.max_x, r.max_y), (1, 2, 4, 7));
        assert!(r.contains(3, 5));
        assert!(!r.contains(0, 5));
    }
}
