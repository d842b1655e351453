//! Pixel deltas: the unit of canvas undo

use crate::canvas::CanvasLayer;
use crate::raster::{ColorDelta, DirtyRect, PixelBuffer};

/// One changed cell: `new = old + delta`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelDelta {
    /// Cell index (x + y * width)
    pub index: usize,
    pub delta: ColorDelta,
}

/// Which way to apply a group of deltas
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeltaDirection {
    /// Subtract deltas (undo)
    Revert,
    /// Add deltas (redo)
    Reapply,
}

/// Every cell changed by one committed stroke
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeltaGroup {
    /// Canvas the stroke was painted on
    pub layer: CanvasLayer,
    pub deltas: Vec<PixelDelta>,
}

impl DeltaGroup {
    pub fn len(&self) -> usize {
        self.deltas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.deltas.is_empty()
    }
}

/// Deltas turning `before` into `after`
///
/// With `region`, only cells inside it are compared; the caller guarantees
/// nothing outside changed. Buffers of different sizes produce no deltas.
pub fn diff_buffers(before: &PixelBuffer, after: &PixelBuffer, region: Option<DirtyRect>) -> Vec<PixelDelta> {
    if before.width() != after.width() || before.height() != after.height() || before.is_empty() {
        return Vec::new();
    }

    let width = before.width();
    let region = region.unwrap_or(DirtyRect {
        min_x: 0,
        min_y: 0,
        max_x: width - 1,
        max_y: before.height() - 1,
    });
    let max_x = region.max_x.min(width - 1);
    let max_y = region.max_y.min(before.height() - 1);

    let old = before.pixels();
    let new = after.pixels();
    let mut deltas = Vec::new();
    for y in region.min_y..=max_y {
        for x in region.min_x..=max_x {
            let index = x + y * width;
            if old[index] != new[index] {
                deltas.push(PixelDelta {
                    index,
                    delta: ColorDelta::between(old[index], new[index]),
                });
            }
        }
    }
    deltas
}

/// Apply deltas to a buffer in place
pub fn apply_deltas(buffer: &mut PixelBuffer, deltas: &[PixelDelta], direction: DeltaDirection) {
    match direction {
        DeltaDirection::Revert => {
            for d in deltas.iter().rev() {
                if let Some(c) = buffer.pixel_at(d.index) {
                    buffer.set_at(d.index, c.sub_delta(d.delta));
                }
            }
        }
        DeltaDirection::Reapply => {
            for d in deltas {
                if let Some(c) = buffer.pixel_at(d.index) {
                    buffer.set_at(d.index, c.add_delta(d.delta));
                }
            }
        }
    }
}
