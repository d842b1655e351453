//! Level canvas: hand-painted level art for a 2D level editor
//!
//! Each level carries three raster canvases (background, shadow, foreground)
//! laid over the level's blocks at 16 pixels per block. Strokes are painted
//! into a working copy, previewed through 16x16 sub-tiles, diffed into
//! per-pixel deltas on release and kept in a bounded undo history.
//!
//! # Module Organization
//!
//! - `math` - 2D world-space vectors
//! - `raster` - pixel buffer, Bresenham lines, flood fill
//! - `canvas` - canvases, drawing transactions, sub-tiles, level layers
//! - `undo` - pixel deltas and the undo/redo stacks
//! - `stroke` - jitter correction and hand-drawn lines
//! - `editor` - pointer input to strokes, tools, colours
//! - `settings` - drawing settings stored as RON
//! - `persist` - canvas records and level-art files
//! - `logging` - tracing subscriber setup

/// Version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod canvas;
pub mod editor;
pub mod logging;
pub mod math;
pub mod persist;
pub mod raster;
pub mod settings;
pub mod stroke;
pub mod undo;

pub use canvas::{Canvas, CanvasLayer, DisplaySink, LevelCanvases};
pub use editor::{CanvasEditor, EditorEvent, InputEvent, PointerButton, Tool};
pub use math::Vec2;
pub use raster::{Color, PixelBuffer};
pub use settings::DrawSettings;
pub use undo::UndoRedoEngine;
