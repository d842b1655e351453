//! Saving and loading level art
//!
//! - `record` - one canvas as a binary record with a PNG payload
//! - `level_file` - the three layers of a level in one compressed file

mod level_file;
mod record;

use std::fs;
use std::path::Path;

pub use level_file::{
    level_art_from_bytes, level_art_to_bytes, level_art_to_compressed, load_level_art,
    save_level_art, LEVEL_ART_MAGIC, LEVEL_ART_VERSION,
};
pub use record::{decode_png, encode_png, read_canvas, write_canvas, ByteReader};

use crate::raster::PixelBuffer;

/// Error type for level-art persistence
#[derive(Debug, thiserror::Error)]
pub enum PersistError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("image error: {0}")]
    Image(#[from] image::ImageError),
    #[error("brotli error: {0}")]
    Compression(String),
    #[error("unexpected end of data at byte {offset} (needed {needed} more)")]
    Truncated { offset: usize, needed: usize },
    #[error("not a level art file")]
    BadMagic,
    #[error("unsupported level art version {0}")]
    UnsupportedVersion(u32),
    #[error("image is {found:?}, record says {expected:?}")]
    DimensionMismatch {
        expected: (usize, usize),
        found: (usize, usize),
    },
    #[error("invalid record: {0}")]
    Invalid(String),
}

/// Read a PNG file for pasting onto a canvas
pub fn import_png<P: AsRef<Path>>(path: P) -> Result<PixelBuffer, PersistError> {
    decode_png(&fs::read(path)?)
}
