//! Display collaborator interface
//!
//! The canvas never renders. It hands finished pixels to a `DisplaySink`,
//! which the host backs with GPU textures.

use crate::raster::{Color, PixelBuffer};

/// Receives pixel uploads from a canvas
pub trait DisplaySink {
    /// Replace the whole canvas image
    fn upload_pixels(&mut self, buffer: &PixelBuffer);

    /// Replace one `TILE_SIZE` x `TILE_SIZE` overlay region.
    /// `pixels` is row-major, local row 0 first.
    fn upload_tile_region(&mut self, tile_x: usize, tile_y: usize, pixels: &[Color]);
}

/// Sink that records what it was sent (headless hosts and tests)
#[derive(Debug, Default, Clone)]
pub struct RecordingDisplay {
    /// Number of full-canvas uploads
    pub full_uploads: usize,
    /// Last full-canvas image received
    pub last_frame: Option<PixelBuffer>,
    /// Every tile upload, in order
    pub tile_uploads: Vec<(usize, usize)>,
}

impl RecordingDisplay {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

impl DisplaySink for RecordingDisplay {
    fn upload_pixels(&mut self, buffer: &PixelBuffer) {
        self.full_uploads += 1;
        self.last_frame = Some(buffer.clone());
    }

    fn upload_tile_region(&mut self, tile_x: usize, tile_y: usize, _pixels: &[Color]) {
        self.tile_uploads.push((tile_x, tile_y));
    }
}
