//! Raster primitives for level art
//!
//! # Module Organization
//!
//! - `types` - Color, ColorDelta, GridPoint, DirtyRect
//! - `pixel_buffer` - Flat RGBA storage with permissive bounds handling
//! - `line` - Bresenham traversal, segment clipping, stamped thick lines
//! - `fill` - 4-connected flood fill

pub mod fill;
pub mod line;
pub mod pixel_buffer;
pub mod types;

pub use fill::flood_fill;
pub use line::{
    brush_offsets, clip_segment, rasterize_line, rasterize_thick_line, BresenhamLine,
};
pub use pixel_buffer::PixelBuffer;
pub use types::{expand_dirty, Color, ColorDelta, DirtyRect, GridPoint};
