//! Level canvas host: paints a level's art layers in a macroquad window
//!
//! Usage: `level-canvas [level-art-file]` (defaults to `level.art`)
//!
//! Keys:
//! - B / F / I / L: brush, bucket, dropper, line
//! - 1 / 2 / 3: background, shadow, foreground layer
//! - [ / ]: brush size
//! - E: toggle delete mode, J: toggle jitter lines
//! - Ctrl+Z / Ctrl+Y: undo / redo
//! - Ctrl+S: save art and settings, Ctrl+O: reload art
//! - Ctrl+I: paste `import.png` onto the current layer
//! - Middle drag: pan, wheel: zoom

use std::path::{Path, PathBuf};

use macroquad::prelude::*;
use tracing::{error, info, warn};

use level_canvas::canvas::{CanvasLayer, DisplaySink, TILE_SIZE};
use level_canvas::editor::{CanvasEditor, EditorEvent, InputEvent, PointerButton, Tool};
use level_canvas::math::Vec2 as WorldVec;
use level_canvas::persist;
use level_canvas::raster::{Color as PixelColor, PixelBuffer};
use level_canvas::settings::DrawSettings;
use level_canvas::{logging, Canvas, LevelCanvases, VERSION};

const DEFAULT_LEVEL_PATH: &str = "level.art";
const IMPORT_PATH: &str = "import.png";
const NEW_LEVEL_BLOCKS: (usize, usize) = (24, 14);
const BACKDROP: Color = Color::new(0.11, 0.11, 0.13, 1.0);

fn window_conf() -> Conf {
    Conf {
        window_title: format!("Level Canvas v{}", VERSION),
        window_width: 1600,
        window_height: 900,
        window_resizable: true,
        high_dpi: true,
        ..Default::default()
    }
}

/// GPU side of one canvas: committed image plus the sub-tile overlay
#[derive(Default)]
struct CanvasTextures {
    canvas: Option<Texture2D>,
    overlay: Option<Texture2D>,
    size: (usize, usize),
}

impl DisplaySink for CanvasTextures {
    fn upload_pixels(&mut self, buffer: &PixelBuffer) {
        let (w, h) = (buffer.width(), buffer.height());
        let bytes = buffer.to_rgba_bytes();

        match &self.canvas {
            Some(texture) if self.size == (w, h) => {
                texture.update(&Image { bytes, width: w as u16, height: h as u16 });
            }
            _ => {
                let canvas = Texture2D::from_rgba8(w as u16, h as u16, &bytes);
                canvas.set_filter(FilterMode::Nearest);
                let overlay = Texture2D::from_rgba8(w as u16, h as u16, &vec![0; w * h * 4]);
                overlay.set_filter(FilterMode::Nearest);
                self.canvas = Some(canvas);
                self.overlay = Some(overlay);
                self.size = (w, h);
            }
        }
    }

    fn upload_tile_region(&mut self, tile_x: usize, tile_y: usize, pixels: &[PixelColor]) {
        let Some(overlay) = &self.overlay else {
            return;
        };
        let bytes: Vec<u8> = pixels.iter().flat_map(|c| c.to_bytes()).collect();
        let image = Image { bytes, width: TILE_SIZE as u16, height: TILE_SIZE as u16 };
        overlay.update_part(
            &image,
            (tile_x * TILE_SIZE) as i32,
            (tile_y * TILE_SIZE) as i32,
            TILE_SIZE as i32,
            TILE_SIZE as i32,
        );
    }
}

/// World-to-screen mapping (y up in the world, down on screen)
struct View {
    center: WorldVec,
    /// Screen pixels per world unit
    zoom: f32,
}

impl View {
    fn fit(canvas: &Canvas) -> Self {
        let size = canvas.scale();
        let zoom = (screen_width() / (size.x * 1.1)).min(screen_height() / (size.y * 1.1));
        Self {
            center: canvas.transform().position,
            zoom: zoom.max(1.0),
        }
    }

    fn to_screen(&self, world: WorldVec) -> (f32, f32) {
        (
            screen_width() / 2.0 + (world.x - self.center.x) * self.zoom,
            screen_height() / 2.0 - (world.y - self.center.y) * self.zoom,
        )
    }

    fn to_world(&self, (x, y): (f32, f32)) -> WorldVec {
        WorldVec::new(
            self.center.x + (x - screen_width() / 2.0) / self.zoom,
            self.center.y - (y - screen_height() / 2.0) / self.zoom,
        )
    }
}

fn to_screen_color(c: PixelColor) -> Color {
    Color::from_rgba(c.r, c.g, c.b, c.a)
}

/// Pointer events for this frame
fn collect_input(view: &View, mouse_captured: &mut bool) -> Vec<InputEvent> {
    let position = view.to_world(mouse_position());
    let mut events = Vec::new();

    let pressed = if is_mouse_button_pressed(MouseButton::Left) {
        Some(PointerButton::Primary)
    } else if is_mouse_button_pressed(MouseButton::Right) {
        Some(PointerButton::Secondary)
    } else {
        None
    };

    if let Some(button) = pressed {
        if !*mouse_captured {
            *mouse_captured = true;
            events.push(InputEvent::PointerDown { position, button });
        }
    } else if *mouse_captured {
        let held = is_mouse_button_down(MouseButton::Left) || is_mouse_button_down(MouseButton::Right);
        if held {
            events.push(InputEvent::PointerDrag { position });
        } else {
            *mouse_captured = false;
            events.push(InputEvent::PointerUp { position });
        }
    }
    events
}

fn load_level(path: &Path, editor: &mut CanvasEditor) {
    match persist::load_level_art(path) {
        Ok(canvases) => editor.load_canvases(canvases),
        Err(e) => error!(path = %path.display(), "failed to load level art: {}", e),
    }
}

/// Keyboard shortcuts. Returns true when the view should refit the level.
fn handle_keys(editor: &mut CanvasEditor, level_path: &Path, settings_path: Option<&Path>) -> bool {
    let ctrl = is_key_down(KeyCode::LeftControl) || is_key_down(KeyCode::RightControl);
    let shift = is_key_down(KeyCode::LeftShift) || is_key_down(KeyCode::RightShift);

    if ctrl {
        if is_key_pressed(KeyCode::Z) {
            if shift { editor.redo(); } else { editor.undo(); }
        }
        if is_key_pressed(KeyCode::Y) {
            editor.redo();
        }
        if is_key_pressed(KeyCode::S) {
            if let Err(e) = persist::save_level_art(level_path, editor.canvases()) {
                error!("failed to save level art: {}", e);
            }
            if let Some(path) = settings_path {
                if let Err(e) = editor.settings().save(path) {
                    warn!("failed to save settings: {}", e);
                }
            }
        }
        if is_key_pressed(KeyCode::O) {
            load_level(level_path, editor);
            return true;
        }
        if is_key_pressed(KeyCode::I) {
            match persist::import_png(IMPORT_PATH) {
                Ok(image) => {
                    editor.import_image(&image);
                }
                Err(e) => warn!("failed to import {}: {}", IMPORT_PATH, e),
            }
        }
        return false;
    }

    let tools = [
        (KeyCode::B, Tool::Brush),
        (KeyCode::F, Tool::Bucket),
        (KeyCode::I, Tool::Dropper),
        (KeyCode::L, Tool::Line),
    ];
    for (key, tool) in tools {
        if is_key_pressed(key) {
            editor.set_tool(tool);
        }
    }

    let layers = [
        (KeyCode::Key1, CanvasLayer::Background),
        (KeyCode::Key2, CanvasLayer::Shadow),
        (KeyCode::Key3, CanvasLayer::Foreground),
    ];
    for (key, layer) in layers {
        if is_key_pressed(key) {
            editor.set_layer(layer);
        }
    }

    let size = editor.settings().brush_size;
    if is_key_pressed(KeyCode::LeftBracket) {
        editor.set_brush_size(size.saturating_sub(1));
    }
    if is_key_pressed(KeyCode::RightBracket) {
        editor.set_brush_size(size + 1);
    }

    if is_key_pressed(KeyCode::E) {
        editor.set_delete_mode(!editor.delete_mode());
    }
    if is_key_pressed(KeyCode::J) {
        let mut settings = editor.settings().clone();
        settings.show_jitter_lines = !settings.show_jitter_lines;
        editor.set_settings(settings);
    }
    false
}

fn draw_canvas(view: &View, canvas: &Canvas, textures: &CanvasTextures) {
    let transform = canvas.transform();
    let top_left = WorldVec::new(
        transform.position.x + transform.bottom_left().x,
        transform.position.y + transform.top_right().y,
    );
    let (x, y) = view.to_screen(top_left);
    let params = DrawTextureParams {
        dest_size: Some(vec2(transform.size.x * view.zoom, transform.size.y * view.zoom)),
        // Row 0 is the bottom of the art
        flip_y: true,
        ..Default::default()
    };
    for texture in [&textures.canvas, &textures.overlay].into_iter().flatten() {
        draw_texture_ex(texture, x, y, WHITE, params.clone());
    }
}

fn draw_polyline(view: &View, points: &[WorldVec], color: Color) {
    for pair in points.windows(2) {
        let (x0, y0) = view.to_screen(pair[0]);
        let (x1, y1) = view.to_screen(pair[1]);
        draw_line(x0, y0, x1, y1, 1.0, color);
    }
}

fn draw_hud(editor: &CanvasEditor) {
    let settings = editor.settings();
    let tool = editor.tool();
    let size = if tool.uses_brush_size() {
        format!("  |  size {}", settings.brush_size)
    } else {
        String::new()
    };
    let lines = [
        format!(
            "{}  |  {}{}{}",
            tool.label(),
            editor.layer().label(),
            size,
            if editor.delete_mode() { "  |  DELETE" } else { "" },
        ),
        format!(
            "undo {}  redo {}",
            if editor.can_undo() { "yes" } else { "no" },
            if editor.can_redo() { "yes" } else { "no" },
        ),
    ];
    for (i, line) in lines.iter().enumerate() {
        draw_text(line, 12.0, 24.0 + i as f32 * 20.0, 20.0, WHITE);
    }

    let swatches = [settings.primary_color, settings.secondary_color];
    for (i, swatch) in swatches.iter().enumerate() {
        let x = 12.0 + i as f32 * 28.0;
        draw_rectangle(x, 56.0, 24.0, 24.0, to_screen_color(*swatch));
        draw_rectangle_lines(x, 56.0, 24.0, 24.0, 1.0, GRAY);
    }
}

#[macroquad::main(window_conf)]
async fn main() {
    #[cfg(not(target_arch = "wasm32"))]
    crashlog::setup!(crashlog::cargo_metadata!().capitalized(), false);

    logging::init(cfg!(debug_assertions));

    let level_path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_LEVEL_PATH));

    let settings_path = DrawSettings::default_path();
    let settings = match &settings_path {
        Some(path) => DrawSettings::load_or_default(path).unwrap_or_else(|e| {
            warn!("ignoring settings at {}: {}", path.display(), e);
            DrawSettings::default()
        }),
        None => DrawSettings::default(),
    };

    let mut editor = CanvasEditor::new(LevelCanvases::new(), settings);
    if level_path.exists() {
        load_level(&level_path, &mut editor);
    }
    if !editor.canvases().is_initialized() {
        let (w, h) = NEW_LEVEL_BLOCKS;
        editor.new_level(w, h, WorldVec::new(w as f32 / 2.0, h as f32 / 2.0));
    }
    info!(path = %level_path.display(), "editing level art");

    let mut textures: [CanvasTextures; 3] = Default::default();
    let mut view = View::fit(editor.current_canvas());
    let mut mouse_captured = false;
    let mut last_mouse = mouse_position();

    loop {
        // Pan and zoom
        let mouse = mouse_position();
        if is_mouse_button_down(MouseButton::Middle) {
            view.center.x -= (mouse.0 - last_mouse.0) / view.zoom;
            view.center.y += (mouse.1 - last_mouse.1) / view.zoom;
        }
        last_mouse = mouse;
        let (_, wheel) = mouse_wheel();
        if wheel != 0.0 {
            view.zoom = (view.zoom * if wheel > 0.0 { 1.1 } else { 1.0 / 1.1 }).clamp(1.0, 400.0);
        }

        if !mouse_captured && handle_keys(&mut editor, &level_path, settings_path.as_deref()) {
            textures = Default::default();
            view = View::fit(editor.current_canvas());
        }

        let input = collect_input(&view, &mut mouse_captured);
        for event in editor.update(&input) {
            if let EditorEvent::StrokeCommitted { layer, pixels } = event {
                tracing::debug!(?layer, pixels, "stroke committed");
            }
        }

        clear_background(BACKDROP);

        for (i, layer) in CanvasLayer::ALL.into_iter().enumerate() {
            let canvas = editor.canvases_mut().get_mut(layer);
            canvas.present(&mut textures[i]);
            if canvas.is_initialized() && canvas.is_visible() {
                draw_canvas(&view, canvas, &textures[i]);
            }
        }

        if let Some((start, end, color)) = editor.line_preview() {
            draw_polyline(&view, &[start, end], to_screen_color(PixelColor { a: 255, ..color }));
        }
        if editor.settings().show_jitter_lines {
            if let Some(stroke) = editor.stroke().filter(|s| s.tool == Tool::Brush) {
                draw_polyline(&view, &stroke.raw, RED);
            }
            if let Some(overlay) = editor.jitter_overlay() {
                draw_polyline(&view, &overlay.reference, GREEN);
            }
        }

        draw_hud(&editor);

        next_frame().await;
    }
}
