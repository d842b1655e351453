//! Level canvas editor
//!
//! Turns pointer input into canvas strokes. The host calls
//! `CanvasEditor::update` once per frame with that frame's pointer events and
//! gets back the colour changes and committed strokes as `EditorEvent`s.
//!
//! ## Stroke lifecycle
//!
//! ```text
//! PointerDown --> begin_drawing (tiled for the brush)
//!     |
//! PointerDrag --> brush segment / bucket fill / dropper pick / line preview
//!     |
//! PointerUp ----> brush: jitter-corrected redraw
//!                 line:  imperfect line
//!                 end_drawing, deltas committed to undo history
//! ```

mod canvas_editor;
mod input;

pub use canvas_editor::CanvasEditor;
pub use input::{EditorEvent, InputEvent, PointerButton, Stroke, Tool};
