//! Pixel-delta undo/redo
//!
//! Each finished stroke is diffed against the committed canvas, and the
//! per-cell color differences are stored as one `DeltaGroup`. Undo subtracts
//! the differences and redo adds them back, so the two are exact inverses and
//! only touched cells are ever stored.

mod delta;
mod history;

pub use delta::{apply_deltas, diff_buffers, DeltaDirection, DeltaGroup, PixelDelta};
pub use history::{DeltaTarget, UndoRedoEngine, DEFAULT_UNDO_CAPACITY};
