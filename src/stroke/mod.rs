//! Stroke shaping
//!
//! - `jitter` - snaps hand tremor out of freehand brush paths
//! - `imperfect` - bends line-tool segments so they look hand drawn

pub mod imperfect;
pub mod jitter;

pub use imperfect::ImperfectLineGenerator;
pub use jitter::{CorrectedStroke, JitterCorrector};
