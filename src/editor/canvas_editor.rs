//! Per-frame canvas editing

use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, info, warn};

use super::input::{EditorEvent, InputEvent, PointerButton, Stroke, Tool};
use crate::canvas::{Canvas, CanvasLayer, LevelCanvases, PIXEL_STEP};
use crate::math::Vec2;
use crate::raster::{Color, PixelBuffer};
use crate::settings::{DrawSettings, MAX_BRUSH_SIZE};
use crate::stroke::CorrectedStroke;
use crate::undo::UndoRedoEngine;

/// Paints the level canvases from pointer input
pub struct CanvasEditor {
    canvases: LevelCanvases,
    layer: CanvasLayer,
    tool: Tool,
    settings: DrawSettings,
    history: UndoRedoEngine,
    stroke: Option<Stroke>,
    rng: StdRng,
    /// Every button paints the secondary colour
    delete_mode: bool,
    /// Reference line of the last brush stroke (debug overlay)
    jitter_overlay: Option<CorrectedStroke>,
}

impl CanvasEditor {
    pub fn new(canvases: LevelCanvases, settings: DrawSettings) -> Self {
        Self::with_rng(canvases, settings, StdRng::from_entropy())
    }

    /// Editor with a fixed random source for the line tool
    pub fn with_rng(canvases: LevelCanvases, settings: DrawSettings, rng: StdRng) -> Self {
        let history = UndoRedoEngine::new(settings.undo_capacity);
        Self {
            canvases,
            layer: CanvasLayer::default(),
            tool: Tool::default(),
            settings,
            history,
            stroke: None,
            rng,
            delete_mode: false,
            jitter_overlay: None,
        }
    }

    /// Feed one frame of pointer input
    pub fn update(&mut self, events: &[InputEvent]) -> Vec<EditorEvent> {
        let mut out = Vec::new();
        self.canvases.get_mut(self.layer).sync_tiles();

        for event in events {
            match *event {
                InputEvent::PointerDown { position, button } => {
                    self.pointer_down(position, button, &mut out)
                }
                InputEvent::PointerDrag { position } => self.pointer_drag(position, &mut out),
                InputEvent::PointerUp { position } => self.pointer_up(position, &mut out),
            }
        }
        out
    }

    fn pointer_down(&mut self, position: Vec2, button: PointerButton, out: &mut Vec<EditorEvent>) {
        if self.stroke.is_some() {
            warn!("pointer down with a stroke already open; ignored");
            return;
        }
        let canvas = self.canvases.get_mut(self.layer);
        if !canvas.is_initialized() || !canvas.is_visible() {
            return;
        }

        let button = if self.delete_mode { PointerButton::Secondary } else { button };
        let color = match button {
            PointerButton::Primary => self.settings.primary_color,
            PointerButton::Secondary => self.settings.secondary_color,
        };

        canvas.begin_drawing(self.tool.uses_tiles());
        debug!(tool = ?self.tool, layer = ?self.layer, "stroke started");
        self.jitter_overlay = None;
        self.stroke = Some(Stroke::new(self.tool, button, self.layer, color, position));
        self.apply_tool(position, None, out);
    }

    fn pointer_drag(&mut self, position: Vec2, out: &mut Vec<EditorEvent>) {
        let Some(stroke) = &mut self.stroke else {
            return;
        };
        let moved_from = stroke.advance(position);
        self.apply_tool(position, moved_from, out);
    }

    fn pointer_up(&mut self, position: Vec2, out: &mut Vec<EditorEvent>) {
        self.pointer_drag(position, out);
        let Some(stroke) = self.stroke.take() else {
            return;
        };

        let size = self.settings.brush_size;
        let canvas = self.canvases.get_mut(stroke.layer);
        let deltas = match stroke.tool {
            Tool::Brush => {
                let corrected = self.settings.jitter.correct(&stroke.raw);
                let deltas = canvas.end_drawing_with(&as_polyline(&corrected.points), stroke.color, size);
                if self.settings.show_jitter_lines {
                    self.jitter_overlay = Some(corrected);
                }
                deltas
            }
            Tool::Line => {
                let points = self
                    .settings
                    .line
                    .generate(stroke.start, stroke.last, PIXEL_STEP, &mut self.rng);
                canvas.draw_lines(&as_polyline(&points), stroke.color, size);
                canvas.end_drawing()
            }
            Tool::Bucket | Tool::Dropper => canvas.end_drawing(),
        };

        let pixels = deltas.len();
        if self.history.commit(stroke.layer, deltas) {
            out.push(EditorEvent::StrokeCommitted { layer: stroke.layer, pixels });
        }
    }

    /// Per-frame tool action at the pointer. `moved_from` is the previous
    /// pointer position when the pointer moved this frame.
    fn apply_tool(&mut self, position: Vec2, moved_from: Option<Vec2>, out: &mut Vec<EditorEvent>) {
        let Some(stroke) = &self.stroke else {
            return;
        };
        let (tool, button, color) = (stroke.tool, stroke.button, stroke.color);
        let canvas = self.canvases.get_mut(stroke.layer);

        match tool {
            Tool::Brush => {
                if let Some(from) = moved_from {
                    canvas.draw_line(from, position, color, self.settings.brush_size);
                }
            }
            Tool::Bucket => {
                canvas.fill(position, color);
            }
            Tool::Dropper => {
                let Some(picked) = canvas.get_color(position) else {
                    return;
                };
                let event = match button {
                    PointerButton::Primary => self.set_primary_color(picked),
                    PointerButton::Secondary => self.set_secondary_color(picked),
                };
                out.extend(event);
            }
            // Drawn on release
            Tool::Line => {}
        }
    }

    /// Revert the last stroke. Ignored while a stroke is open.
    pub fn undo(&mut self) -> Option<EditorEvent> {
        if self.stroke.is_some() {
            warn!("undo ignored while a stroke is open");
            return None;
        }
        self.history.undo(&mut self.canvases).map(EditorEvent::Undone)
    }

    /// Re-apply the last undone stroke. Ignored while a stroke is open.
    pub fn redo(&mut self) -> Option<EditorEvent> {
        if self.stroke.is_some() {
            warn!("redo ignored while a stroke is open");
            return None;
        }
        self.history.redo(&mut self.canvases).map(EditorEvent::Redone)
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// Paste an image onto the active layer as one undoable stroke
    pub fn import_image(&mut self, image: &PixelBuffer) -> Option<EditorEvent> {
        if self.stroke.is_some() {
            warn!("import ignored while a stroke is open");
            return None;
        }
        let canvas = self.canvases.get_mut(self.layer);
        if !canvas.is_initialized() {
            return None;
        }
        canvas.begin_drawing(false);
        canvas.blit(image);
        let deltas = canvas.end_drawing();
        let pixels = deltas.len();
        info!(layer = ?self.layer, pixels, "imported image");
        self.history
            .commit(self.layer, deltas)
            .then_some(EditorEvent::StrokeCommitted { layer: self.layer, pixels })
    }

    /// Replace the level art, dropping any history
    pub fn load_canvases(&mut self, canvases: LevelCanvases) {
        self.canvases = canvases;
        self.stroke = None;
        self.jitter_overlay = None;
        self.history.clear();
    }

    /// Start a blank level of `blocks_wide` x `blocks_high` blocks
    pub fn new_level(&mut self, blocks_wide: usize, blocks_high: usize, center: Vec2) {
        let mut canvases = LevelCanvases::new();
        canvases.initialize(blocks_wide, blocks_high, center);
        self.load_canvases(canvases);
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn canvases(&self) -> &LevelCanvases {
        &self.canvases
    }

    /// Mutable canvases for presentation; strokes must not be edited here
    pub fn canvases_mut(&mut self) -> &mut LevelCanvases {
        &mut self.canvases
    }

    pub fn current_canvas(&self) -> &Canvas {
        self.canvases.get(self.layer)
    }

    pub fn layer(&self) -> CanvasLayer {
        self.layer
    }

    /// Switch the target layer. Refused while a stroke is open.
    pub fn set_layer(&mut self, layer: CanvasLayer) -> bool {
        if self.stroke.is_some() {
            return false;
        }
        self.layer = layer;
        true
    }

    pub fn tool(&self) -> Tool {
        self.tool
    }

    /// Switch tools. Refused while a stroke is open.
    pub fn set_tool(&mut self, tool: Tool) -> bool {
        if self.stroke.is_some() {
            return false;
        }
        self.tool = tool;
        true
    }

    pub fn settings(&self) -> &DrawSettings {
        &self.settings
    }

    /// Swap in new settings. A changed undo capacity starts a fresh history.
    pub fn set_settings(&mut self, settings: DrawSettings) {
        if settings.undo_capacity != self.history.capacity() {
            self.history = UndoRedoEngine::new(settings.undo_capacity);
        }
        self.settings = settings;
    }

    /// Returns the change event, or `None` if the colour was already set
    pub fn set_primary_color(&mut self, color: Color) -> Option<EditorEvent> {
        if self.settings.primary_color == color {
            return None;
        }
        self.settings.primary_color = color;
        Some(EditorEvent::PrimaryColorChanged(color))
    }

    pub fn set_secondary_color(&mut self, color: Color) -> Option<EditorEvent> {
        if self.settings.secondary_color == color {
            return None;
        }
        self.settings.secondary_color = color;
        Some(EditorEvent::SecondaryColorChanged(color))
    }

    /// Clamped to 1..=MAX_BRUSH_SIZE
    pub fn set_brush_size(&mut self, size: u32) {
        self.settings.brush_size = size.clamp(1, MAX_BRUSH_SIZE);
    }

    pub fn delete_mode(&self) -> bool {
        self.delete_mode
    }

    pub fn set_delete_mode(&mut self, delete_mode: bool) {
        self.delete_mode = delete_mode;
    }

    pub fn stroke(&self) -> Option<&Stroke> {
        self.stroke.as_ref()
    }

    /// Start, end and colour of the line being dragged out
    pub fn line_preview(&self) -> Option<(Vec2, Vec2, Color)> {
        self.stroke
            .as_ref()
            .filter(|s| s.tool == Tool::Line)
            .map(|s| (s.start, s.last, s.color))
    }

    pub fn jitter_overlay(&self) -> Option<&CorrectedStroke> {
        self.jitter_overlay.as_ref()
    }
}

/// A lone point becomes a zero-length segment so a click leaves a dot
fn as_polyline(points: &[Vec2]) -> Vec<Vec2> {
    match points {
        [single] => vec![*single, *single],
        _ => points.to_vec(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::PIXELS_PER_UNIT;

    const BLOCKS: usize = 4;
    const SIZE: i32 = (BLOCKS * PIXELS_PER_UNIT) as i32;

    fn editor() -> CanvasEditor {
        let mut canvases = LevelCanvases::new();
        canvases.initialize(BLOCKS, BLOCKS, Vec2::ZERO);
        CanvasEditor::with_rng(canvases, DrawSettings::default(), StdRng::seed_from_u64(42))
    }

    /// World position of a cell centre
    fn at(x: i32, y: i32) -> Vec2 {
        let px = 1.0 / PIXELS_PER_UNIT as f32;
        let half = BLOCKS as f32 / 2.0;
        Vec2::new(-half + (x as f32 + 0.5) * px, -half + (y as f32 + 0.5) * px)
    }

    fn down(position: Vec2) -> InputEvent {
        InputEvent::PointerDown { position, button: PointerButton::Primary }
    }

    fn drag(position: Vec2) -> InputEvent {
        InputEvent::PointerDrag { position }
    }

    fn up(position: Vec2) -> InputEvent {
        InputEvent::PointerUp { position }
    }

    fn committed(events: &[EditorEvent]) -> Option<(CanvasLayer, usize)> {
        events.iter().find_map(|e| match *e {
            EditorEvent::StrokeCommitted { layer, pixels } => Some((layer, pixels)),
            _ => None,
        })
    }

    #[test]
    fn test_brush_stroke_commits_one_group() {
        let mut ed = editor();
        let mut events = ed.update(&[down(at(2, 2)), drag(at(10, 2))]);
        events.extend(ed.update(&[drag(at(20, 2)), up(at(20, 2))]));

        let (layer, pixels) = committed(&events).unwrap();
        assert_eq!(layer, CanvasLayer::Background);
        assert!(pixels > 0);
        assert_eq!(ed.history.undo_len(), 1);

        let bg = ed.canvases().get(CanvasLayer::Background).pixels();
        assert_eq!(bg.get(10, 2), Color::BLACK);
        assert_eq!(bg.get(10, 20), Color::WHITE);
        assert!(ed.current_canvas().tiles().dirty_tiles().is_empty());
    }

    #[test]
    fn test_brush_preview_stays_in_tiles() {
        let mut ed = editor();
        ed.update(&[down(at(2, 2)), drag(at(12, 2))]);
        let canvas = ed.current_canvas();
        assert_eq!(canvas.pixels().get(8, 2), Color::WHITE);
        assert!(!canvas.tiles().dirty_tiles().is_empty());
        ed.update(&[up(at(12, 2))]);
        assert_eq!(ed.current_canvas().pixels().get(8, 2), Color::BLACK);
    }

    #[test]
    fn test_click_leaves_a_dot() {
        let mut ed = editor();
        let events = ed.update(&[down(at(5, 5)), up(at(5, 5))]);
        assert!(committed(&events).is_some());
        assert_eq!(ed.current_canvas().pixels().get(5, 5), Color::BLACK);
    }

    #[test]
    fn test_secondary_and_delete_mode_use_secondary_color() {
        let mut ed = editor();
        ed.set_secondary_color(Color::RED);
        ed.update(&[
            InputEvent::PointerDown { position: at(3, 8), button: PointerButton::Secondary },
            up(at(9, 8)),
        ]);
        assert_eq!(ed.current_canvas().pixels().get(6, 8), Color::RED);

        ed.set_delete_mode(true);
        ed.update(&[down(at(3, 30)), up(at(9, 30))]);
        assert_eq!(ed.current_canvas().pixels().get(6, 30), Color::RED);
    }

    #[test]
    fn test_dropper_changes_color() {
        let mut ed = editor();
        ed.set_tool(Tool::Dropper);
        let events = ed.update(&[down(at(3, 3)), up(at(3, 3))]);
        assert_eq!(events, vec![EditorEvent::PrimaryColorChanged(Color::WHITE)]);
        assert_eq!(ed.settings().primary_color, Color::WHITE);
        assert!(!ed.can_undo());

        let events = ed.update(&[
            InputEvent::PointerDown { position: at(3, 3), button: PointerButton::Secondary },
            up(at(3, 3)),
        ]);
        assert_eq!(events, vec![EditorEvent::SecondaryColorChanged(Color::WHITE)]);
    }

    #[test]
    fn test_dropper_off_canvas_is_ignored() {
        let mut ed = editor();
        ed.set_tool(Tool::Dropper);
        let events = ed.update(&[down(Vec2::new(50.0, 50.0)), up(Vec2::new(50.0, 50.0))]);
        assert!(events.is_empty());
        assert_eq!(ed.settings().primary_color, Color::BLACK);
    }

    #[test]
    fn test_bucket_fills_layer() {
        let mut ed = editor();
        ed.set_tool(Tool::Bucket);
        ed.set_layer(CanvasLayer::Shadow);
        let events = ed.update(&[down(at(0, 0)), up(at(0, 0))]);
        assert_eq!(committed(&events), Some((CanvasLayer::Shadow, (SIZE * SIZE) as usize)));
        let shadow = ed.canvases().get(CanvasLayer::Shadow).pixels();
        assert!(shadow.pixels().iter().all(|&p| p == Color::BLACK));
    }

    #[test]
    fn test_line_tool_previews_then_draws() {
        let mut ed = editor();
        ed.set_tool(Tool::Line);
        ed.update(&[down(at(2, 30)), drag(at(40, 30))]);
        assert_eq!(ed.line_preview(), Some((at(2, 30), at(40, 30), Color::BLACK)));
        // Nothing is painted until release
        assert_eq!(ed.current_canvas().pixels().get(20, 30), Color::WHITE);

        let events = ed.update(&[up(at(60, 30))]);
        assert!(ed.line_preview().is_none());
        let (_, pixels) = committed(&events).unwrap();
        assert!(pixels >= 58);
        assert_eq!(ed.current_canvas().pixels().get(2, 30), Color::BLACK);
    }

    #[test]
    fn test_undo_redo_through_editor() {
        let mut ed = editor();
        let before = ed.current_canvas().pixels().clone();
        ed.update(&[down(at(2, 2)), drag(at(30, 30)), up(at(30, 30))]);
        let after = ed.current_canvas().pixels().clone();

        assert_eq!(ed.undo(), Some(EditorEvent::Undone(CanvasLayer::Background)));
        assert_eq!(ed.current_canvas().pixels(), &before);
        assert_eq!(ed.undo(), None);
        assert_eq!(ed.redo(), Some(EditorEvent::Redone(CanvasLayer::Background)));
        assert_eq!(ed.current_canvas().pixels(), &after);
    }

    #[test]
    fn test_undo_follows_stroke_layer() {
        let mut ed = editor();
        ed.set_layer(CanvasLayer::Foreground);
        ed.update(&[down(at(2, 2)), up(at(9, 2))]);
        ed.set_layer(CanvasLayer::Background);
        assert_eq!(ed.undo(), Some(EditorEvent::Undone(CanvasLayer::Foreground)));
        let fg = ed.canvases().get(CanvasLayer::Foreground).pixels();
        assert!(fg.pixels().iter().all(|&p| p == Color::TRANSPARENT));
    }

    #[test]
    fn test_open_stroke_blocks_other_actions() {
        let mut ed = editor();
        ed.update(&[down(at(2, 2)), up(at(9, 2))]);
        ed.update(&[down(at(2, 9)), drag(at(9, 9))]);

        assert_eq!(ed.undo(), None);
        assert!(!ed.set_tool(Tool::Bucket));
        assert!(!ed.set_layer(CanvasLayer::Shadow));
        // A second press does not restart the stroke
        ed.update(&[down(at(40, 40))]);
        assert_eq!(ed.stroke().map(|s| s.start), Some(at(2, 9)));

        ed.update(&[up(at(9, 9))]);
        assert_eq!(ed.history.undo_len(), 2);
    }

    #[test]
    fn test_hidden_or_uninitialized_canvas_ignores_input() {
        let mut ed = editor();
        ed.canvases_mut().background.set_visible(false);
        assert!(ed.update(&[down(at(2, 2)), up(at(9, 2))]).is_empty());
        assert!(ed.stroke().is_none());

        let mut blank = CanvasEditor::new(LevelCanvases::new(), DrawSettings::default());
        assert!(blank.update(&[down(at(2, 2)), up(at(9, 2))]).is_empty());
    }

    #[test]
    fn test_jitter_overlay_when_enabled() {
        let mut ed = editor();
        ed.update(&[down(at(2, 2)), up(at(30, 2))]);
        assert!(ed.jitter_overlay().is_none());

        let settings = DrawSettings { show_jitter_lines: true, ..ed.settings().clone() };
        ed.set_settings(settings);
        ed.update(&[down(at(2, 2)), up(at(30, 2))]);
        assert!(ed.jitter_overlay().unwrap().reference.len() >= 2);
    }

    #[test]
    fn test_import_image_is_undoable() {
        let mut ed = editor();
        let image = PixelBuffer::filled(8, 8, Color::BLUE);
        let event = ed.import_image(&image);
        assert_eq!(
            event,
            Some(EditorEvent::StrokeCommitted { layer: CanvasLayer::Background, pixels: 64 })
        );
        assert_eq!(ed.current_canvas().pixels().get(7, 7), Color::BLUE);
        ed.undo();
        assert_eq!(ed.current_canvas().pixels().get(7, 7), Color::WHITE);
    }

    #[test]
    fn test_new_level_resets_history() {
        let mut ed = editor();
        ed.update(&[down(at(2, 2)), up(at(9, 2))]);
        ed.new_level(2, 3, Vec2::ZERO);
        assert!(!ed.can_undo());
        assert_eq!(ed.current_canvas().pixel_height(), 3 * PIXELS_PER_UNIT);
    }

    #[test]
    fn test_brush_size_is_clamped() {
        let mut ed = editor();
        ed.set_brush_size(0);
        assert_eq!(ed.settings().brush_size, 1);
        ed.set_brush_size(1000);
        assert_eq!(ed.settings().brush_size, MAX_BRUSH_SIZE);
    }
}
