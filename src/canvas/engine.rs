//! Drawing transactions on a canvas
//!
//! All writes of a stroke go to a working copy taken at `begin_drawing`.
//! Committed pixels stay untouched until `end_drawing`, which makes them the
//! baseline for the undo diff and keeps the eyedropper reading committed
//! state. Only the bounding box of touched cells is diffed.

use tracing::{debug, warn};

use super::display::DisplaySink;
use super::{grid_cell, Canvas, DrawSession};
use crate::math::Vec2;
use crate::raster::{
    clip_segment, expand_dirty, flood_fill, rasterize_thick_line, Color, GridPoint, PixelBuffer,
};
use crate::undo::{apply_deltas, diff_buffers, DeltaDirection, PixelDelta};

impl Canvas {
    /// Grid cell under a world position (may be off-canvas)
    pub fn world_to_grid(&self, position: Vec2) -> GridPoint {
        self.transform
            .world_to_grid(position, self.pixels.width(), self.pixels.height())
    }

    pub fn is_drawing(&self) -> bool {
        self.session.is_some()
    }

    /// Open a stroke. With `use_tiles`, writes are mirrored into the sub-tile
    /// overlay instead of requesting full-canvas uploads.
    pub fn begin_drawing(&mut self, use_tiles: bool) {
        if !self.initialized {
            return;
        }
        if self.session.is_some() {
            warn!("begin_drawing called with a stroke already open; keeping the open stroke");
            return;
        }
        if use_tiles {
            self.tiles.begin_transaction();
        }
        self.session = Some(DrawSession {
            working: self.pixels.clone(),
            tiled: use_tiles,
            touched: None,
        });
    }

    /// Draw one segment between two world positions
    pub fn draw_line(&mut self, from: Vec2, to: Vec2, color: Color, size: u32) {
        self.draw_lines(&[from, to], color, size);
    }

    /// Draw a polyline through world positions
    ///
    /// Each segment is clipped to the canvas, widened by the brush reach,
    /// before it is rasterized. Segments with a non-finite end are skipped.
    pub fn draw_lines(&mut self, points: &[Vec2], color: Color, size: u32) {
        if self.session.is_none() || points.len() < 2 {
            return;
        }
        let (width, height) = (self.pixels.width(), self.pixels.height());
        let grid: Vec<Vec2> = points
            .iter()
            .map(|&p| self.transform.world_to_grid_space(p, width, height))
            .collect();

        // Stamp offsets reach at most size/2 cells from the centre line
        let reach = (size / 2) as f32 + 1.0;
        let min = Vec2::new(-reach, -reach);
        let max = Vec2::new(width as f32 + reach, height as f32 + reach);

        let mut cells = Vec::new();
        for pair in grid.windows(2) {
            if let Some((a, b)) = clip_segment(pair[0], pair[1], min, max) {
                rasterize_thick_line(grid_cell(a), grid_cell(b), size, &mut cells);
            }
        }
        self.write_cells(&cells, color);
    }

    /// Flood fill the working copy from a world position. Returns the number
    /// of cells written.
    pub fn fill(&mut self, position: Vec2, color: Color) -> usize {
        let seed = self.world_to_grid(position);
        let Some(session) = &mut self.session else {
            return 0;
        };
        let written = flood_fill(&mut session.working, seed, color);
        if written.is_empty() {
            return 0;
        }
        for cell in &written {
            expand_dirty(&mut session.touched, cell.x as usize, cell.y as usize);
        }
        self.needs_upload = true;
        written.len()
    }

    /// Copy an image into the working copy with its row 0 on canvas row 0.
    /// Parts outside the canvas are cropped.
    pub fn blit(&mut self, image: &PixelBuffer) {
        let Some(session) = &mut self.session else {
            return;
        };
        let width = image.width().min(session.working.width());
        let height = image.height().min(session.working.height());
        for y in 0..height {
            for x in 0..width {
                let color = image.get(x as i32, y as i32);
                session.working.set(x as i32, y as i32, color);
                if session.tiled {
                    self.tiles.set_pixel(x, y, color);
                }
            }
        }
        if width > 0 && height > 0 {
            expand_dirty(&mut session.touched, 0, 0);
            expand_dirty(&mut session.touched, width - 1, height - 1);
            if !session.tiled {
                self.needs_upload = true;
            }
        }
    }

    /// Committed color under a world position, ignoring any open stroke
    pub fn get_color(&self, position: Vec2) -> Option<Color> {
        let cell = self.world_to_grid(position);
        self.pixels.try_get(cell.x, cell.y)
    }

    /// Close the stroke: flush the working copy into committed storage and
    /// return the per-cell deltas it introduced
    pub fn end_drawing(&mut self) -> Vec<PixelDelta> {
        let Some(session) = self.session.take() else {
            return Vec::new();
        };
        self.tiles.clear();

        // Nothing touched means nothing to diff
        let deltas = match session.touched {
            Some(region) => diff_buffers(&self.pixels, &session.working, Some(region)),
            None => Vec::new(),
        };
        debug!(changed = deltas.len(), tiled = session.tiled, "ending stroke");
        self.pixels = session.working;
        self.needs_upload = true;
        deltas
    }

    /// Close a tiled stroke by replacing its preview with a final polyline
    /// (the jitter-corrected brush path), drawn straight into the canvas
    pub fn end_drawing_with(&mut self, points: &[Vec2], color: Color, size: u32) -> Vec<PixelDelta> {
        let Some(session) = &mut self.session else {
            return Vec::new();
        };
        session.working.copy_from(&self.pixels);
        session.touched = None;
        session.tiled = false;
        self.tiles.clear();

        self.draw_lines(points, color, size);
        self.end_drawing()
    }

    /// Push pending pixels to the display: the whole canvas if requested,
    /// then any tiles written since their last upload
    pub fn present(&mut self, sink: &mut dyn DisplaySink) {
        if self.needs_upload {
            match &self.session {
                Some(session) => sink.upload_pixels(&session.working),
                None => sink.upload_pixels(&self.pixels),
            }
            self.needs_upload = false;
        }
        self.tiles.apply(sink);
    }

    /// Apply undo/redo deltas to committed pixels
    pub fn apply_deltas(&mut self, deltas: &[PixelDelta], direction: DeltaDirection) {
        apply_deltas(&mut self.pixels, deltas, direction);
        self.needs_upload = true;
    }

    /// Write rasterized cells into the working copy and dispatch them
    fn write_cells(&mut self, cells: &[GridPoint], color: Color) {
        let Some(session) = &mut self.session else {
            return;
        };
        let mut any = false;
        for cell in cells {
            if !session.working.set(cell.x, cell.y, color) {
                continue;
            }
            any = true;
            let (x, y) = (cell.x as usize, cell.y as usize);
            expand_dirty(&mut session.touched, x, y);
            if session.tiled {
                self.tiles.set_pixel(x, y, color);
            }
        }
        if any && !session.tiled {
            self.needs_upload = true;
        }
    }
}
