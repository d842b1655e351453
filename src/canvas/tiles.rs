//! Sub-tile overlay for partial redraw during brush strokes
//!
//! While a brush stroke is in progress, freshly painted cells are mirrored into
//! small fixed-size tiles. Only tiles that received writes are uploaded, so
//! the cost of a frame is bounded by the area the stroke touched rather than
//! the size of the canvas.

use tracing::debug;

use super::constants::TILE_SIZE;
use super::display::DisplaySink;
use crate::raster::Color;

/// One `TILE_SIZE` x `TILE_SIZE` overlay region
#[derive(Debug, Clone)]
pub struct SubTile {
    pixels: Vec<Color>,
    /// Holds stroke pixels since the last clear
    dirty: bool,
    /// Holds changes not yet uploaded
    pending: bool,
}

impl Default for SubTile {
    fn default() -> Self {
        Self::new()
    }
}

impl SubTile {
    pub fn new() -> Self {
        Self {
            pixels: vec![Color::TRANSPARENT; TILE_SIZE * TILE_SIZE],
            dirty: false,
            pending: false,
        }
    }

    /// Buffer a write at tile-local coordinates
    pub fn set_pixel(&mut self, x: usize, y: usize, color: Color) {
        if x >= TILE_SIZE || y >= TILE_SIZE {
            return;
        }
        self.pixels[x + y * TILE_SIZE] = color;
        self.dirty = true;
        self.pending = true;
    }

    pub fn get_pixel(&self, x: usize, y: usize) -> Color {
        if x >= TILE_SIZE || y >= TILE_SIZE {
            return Color::TRANSPARENT;
        }
        self.pixels[x + y * TILE_SIZE]
    }

    /// Reset to transparent. The cleared tile is re-uploaded on the next apply.
    pub fn clear(&mut self) {
        if self.dirty {
            for pixel in &mut self.pixels {
                *pixel = Color::TRANSPARENT;
            }
            self.dirty = false;
            self.pending = true;
        }
    }

    /// Upload buffered pixels if anything changed since the last apply.
    /// Returns whether an upload happened.
    pub fn apply(&mut self, tile_x: usize, tile_y: usize, sink: &mut dyn DisplaySink) -> bool {
        if !self.pending {
            return false;
        }
        sink.upload_tile_region(tile_x, tile_y, &self.pixels);
        self.pending = false;
        true
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }
}

/// Tile grid covering one canvas
#[derive(Debug, Clone, Default)]
pub struct SubTileManager {
    tiles_wide: usize,
    tiles_high: usize,
    tiles: Vec<SubTile>,
}

impl SubTileManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Grid dimensions for a canvas of the given pixel size
    pub fn grid_for(pixel_width: usize, pixel_height: usize) -> (usize, usize) {
        (pixel_width / TILE_SIZE, pixel_height / TILE_SIZE)
    }

    /// Reallocate when the canvas tile grid changed size. Returns true if the
    /// tiles were rebuilt.
    pub fn sync(&mut self, pixel_width: usize, pixel_height: usize) -> bool {
        let (w, h) = Self::grid_for(pixel_width, pixel_height);
        if w == self.tiles_wide && h == self.tiles_high {
            return false;
        }
        debug!(tiles_wide = w, tiles_high = h, "reallocating canvas sub-tiles");
        self.tiles_wide = w;
        self.tiles_high = h;
        self.tiles = vec![SubTile::new(); w * h];
        true
    }

    pub fn dimensions(&self) -> (usize, usize) {
        (self.tiles_wide, self.tiles_high)
    }

    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    pub fn tile(&self, tile_x: usize, tile_y: usize) -> Option<&SubTile> {
        if tile_x >= self.tiles_wide || tile_y >= self.tiles_high {
            return None;
        }
        self.tiles.get(tile_x + tile_y * self.tiles_wide)
    }

    /// Start a stroke with every tile clean
    pub fn begin_transaction(&mut self) {
        self.clear();
    }

    /// Route a canvas-global cell write to its tile. Cells outside the tile
    /// grid (including the ragged edge of non-multiple canvases) are dropped.
    pub fn set_pixel(&mut self, x: usize, y: usize, color: Color) {
        let (tile_x, tile_y) = (x / TILE_SIZE, y / TILE_SIZE);
        if tile_x >= self.tiles_wide || tile_y >= self.tiles_high {
            return;
        }
        let index = tile_x + tile_y * self.tiles_wide;
        self.tiles[index].set_pixel(x % TILE_SIZE, y % TILE_SIZE, color);
    }

    /// Clear every tile that holds stroke pixels
    pub fn clear(&mut self) {
        for tile in &mut self.tiles {
            tile.clear();
        }
    }

    /// Upload every pending tile. Returns the number of uploads.
    pub fn apply(&mut self, sink: &mut dyn DisplaySink) -> usize {
        let wide = self.tiles_wide.max(1);
        let mut uploaded = 0;
        for (i, tile) in self.tiles.iter_mut().enumerate() {
            if tile.apply(i % wide, i / wide, sink) {
                uploaded += 1;
            }
        }
        uploaded
    }

    /// Tiles holding stroke pixels, as (tile_x, tile_y)
    pub fn dirty_tiles(&self) -> Vec<(usize, usize)> {
        let wide = self.tiles_wide.max(1);
        self.tiles
            .iter()
            .enumerate()
            .filter(|(_, t)| t.is_dirty())
            .map(|(i, _)| (i % wide, i / wide))
            .collect()
    }
}
