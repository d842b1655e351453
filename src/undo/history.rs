//! Bounded undo/redo stacks of delta groups

use std::collections::VecDeque;

use tracing::{debug, warn};

use super::delta::{DeltaDirection, DeltaGroup, PixelDelta};
use crate::canvas::{Canvas, CanvasLayer};

/// Default number of strokes kept for undo
pub const DEFAULT_UNDO_CAPACITY: usize = 10;

/// Resolves the canvas a delta group was recorded on
pub trait DeltaTarget {
    fn canvas_for(&mut self, layer: CanvasLayer) -> Option<&mut Canvas>;
}

/// A lone canvas answers for every layer
impl DeltaTarget for Canvas {
    fn canvas_for(&mut self, _layer: CanvasLayer) -> Option<&mut Canvas> {
        Some(self)
    }
}

/// Undo and redo stacks for canvas strokes
#[derive(Debug, Clone)]
pub struct UndoRedoEngine {
    /// Oldest at the front
    undo_stack: VecDeque<DeltaGroup>,
    redo_stack: Vec<DeltaGroup>,
    capacity: usize,
}

impl Default for UndoRedoEngine {
    fn default() -> Self {
        Self::new(DEFAULT_UNDO_CAPACITY)
    }
}

impl UndoRedoEngine {
    /// Capacity is clamped to at least one group
    pub fn new(capacity: usize) -> Self {
        Self {
            undo_stack: VecDeque::new(),
            redo_stack: Vec::new(),
            capacity: capacity.max(1),
        }
    }

    /// Record one stroke. Empty strokes are ignored. Returns whether a group
    /// was pushed.
    pub fn commit(&mut self, layer: CanvasLayer, deltas: Vec<PixelDelta>) -> bool {
        if deltas.is_empty() {
            return false;
        }

        // Clear redo stack on new edit
        self.redo_stack.clear();

        debug!(?layer, pixels = deltas.len(), "committing stroke");
        self.undo_stack.push_back(DeltaGroup { layer, deltas });

        while self.undo_stack.len() > self.capacity {
            self.undo_stack.pop_front();
        }
        true
    }

    /// Revert the most recent stroke. Returns the layer it touched.
    pub fn undo(&mut self, target: &mut dyn DeltaTarget) -> Option<CanvasLayer> {
        let layer = self.undo_stack.back()?.layer;
        let Some(canvas) = target.canvas_for(layer) else {
            warn!(?layer, "undo target canvas missing");
            return None;
        };
        let group = self.undo_stack.pop_back()?;
        canvas.apply_deltas(&group.deltas, DeltaDirection::Revert);
        self.redo_stack.push(group);
        Some(layer)
    }

    /// Re-apply the most recently undone stroke. Returns the layer it touched.
    pub fn redo(&mut self, target: &mut dyn DeltaTarget) -> Option<CanvasLayer> {
        let layer = self.redo_stack.last()?.layer;
        let Some(canvas) = target.canvas_for(layer) else {
            warn!(?layer, "redo target canvas missing");
            return None;
        };
        let group = self.redo_stack.pop()?;
        canvas.apply_deltas(&group.deltas, DeltaDirection::Reapply);
        self.undo_stack.push_back(group);
        Some(layer)
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn undo_len(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn redo_len(&self) -> usize {
        self.redo_stack.len()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Forget all history (new level loaded)
    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::Vec2;
    use crate::raster::Color;

    /// Paint one horizontal stroke and commit it
    fn stroke(canvas: &mut Canvas, history: &mut UndoRedoEngine, y: f32, color: Color) {
        canvas.begin_drawing(false);
        canvas.draw_line(Vec2::new(-0.9, y), Vec2::new(0.9, y), color, 1);
        let deltas = canvas.end_drawing();
        history.commit(CanvasLayer::Background, deltas);
    }

    #[test]
    fn test_undo_restores_and_redo_reapplies() {
        let mut canvas = Canvas::with_blocks(2, 2, Color::WHITE);
        let mut history = UndoRedoEngine::default();
        let before = canvas.pixels().clone();

        stroke(&mut canvas, &mut history, 0.1, Color::RED);
        let after = canvas.pixels().clone();
        assert_ne!(before, after);

        assert_eq!(history.undo(&mut canvas), Some(CanvasLayer::Background));
        assert_eq!(canvas.pixels(), &before);
        assert_eq!(history.redo(&mut canvas), Some(CanvasLayer::Background));
        assert_eq!(canvas.pixels(), &after);
    }

    #[test]
    fn test_empty_stacks_are_noops() {
        let mut canvas = Canvas::with_blocks(1, 1, Color::WHITE);
        let mut history = UndoRedoEngine::default();
        assert_eq!(history.undo(&mut canvas), None);
        assert_eq!(history.redo(&mut canvas), None);
        assert!(!history.commit(CanvasLayer::Background, Vec::new()));
        assert!(!history.can_undo());
    }

    #[test]
    fn test_commit_clears_redo() {
        let mut canvas = Canvas::with_blocks(2, 2, Color::WHITE);
        let mut history = UndoRedoEngine::default();
        stroke(&mut canvas, &mut history, 0.1, Color::RED);
        history.undo(&mut canvas);
        assert!(history.can_redo());
        stroke(&mut canvas, &mut history, -0.5, Color::BLUE);
        assert!(!history.can_redo());
    }

    #[test]
    fn test_capacity_evicts_oldest() {
        let mut canvas = Canvas::with_blocks(2, 2, Color::WHITE);
        let mut history = UndoRedoEngine::new(DEFAULT_UNDO_CAPACITY);
        let first_state = canvas.pixels().clone();

        // 11 strokes on distinct rows
        let mut states = vec![first_state];
        for i in 0..11 {
            let y = -0.95 + i as f32 * 0.17;
            stroke(&mut canvas, &mut history, y, Color::RED);
            states.push(canvas.pixels().clone());
        }
        assert_eq!(history.undo_len(), DEFAULT_UNDO_CAPACITY);

        // The ten most recent strokes undo in order
        for i in (1..=10).rev() {
            assert!(history.undo(&mut canvas).is_some());
            assert_eq!(canvas.pixels(), &states[i]);
        }
        // The first stroke was evicted
        assert!(!history.can_undo());
        assert_ne!(canvas.pixels(), &states[0]);
        assert_eq!(history.redo_len(), DEFAULT_UNDO_CAPACITY);
    }
}
