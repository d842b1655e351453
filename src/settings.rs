//! Drawing settings
//!
//! Brush, colour and stroke-shaping parameters, stored as pretty RON under
//! the user config directory.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Serialize, Deserialize};
use tracing::info;

use crate::raster::Color;
use crate::stroke::{ImperfectLineGenerator, JitterCorrector};
use crate::undo::DEFAULT_UNDO_CAPACITY;

/// Largest brush the editor accepts
pub const MAX_BRUSH_SIZE: u32 = 64;

/// Settings file name inside the config directory
const SETTINGS_FILE: &str = "settings.ron";

/// Error type for settings load/save
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Parse error: {0}")]
    Parse(#[from] ron::error::SpannedError),
    #[error("Serialize error: {0}")]
    Serialize(#[from] ron::Error),
    #[error("Validation error: {0}")]
    Validation(String),
}

/// Everything the canvas editor needs to know about how to draw
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DrawSettings {
    /// Brush diameter in pixels (1 = single-pixel line)
    pub brush_size: u32,
    /// Colour painted with the primary pointer button
    pub primary_color: Color,
    /// Colour painted with the secondary pointer button (erase by default)
    pub secondary_color: Color,
    pub jitter: JitterCorrector,
    pub line: ImperfectLineGenerator,
    /// Strokes kept for undo
    pub undo_capacity: usize,
    /// Draw the jitter reference polyline over the canvas
    pub show_jitter_lines: bool,
}

impl Default for DrawSettings {
    fn default() -> Self {
        Self {
            brush_size: 2,
            primary_color: Color::BLACK,
            secondary_color: Color::TRANSPARENT,
            jitter: JitterCorrector::default(),
            line: ImperfectLineGenerator::default(),
            undo_capacity: DEFAULT_UNDO_CAPACITY,
            show_jitter_lines: false,
        }
    }
}

impl DrawSettings {
    /// `<config dir>/level-canvas/settings.ron`, if the platform has one
    #[cfg(not(target_arch = "wasm32"))]
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("level-canvas").join(SETTINGS_FILE))
    }

    #[cfg(target_arch = "wasm32")]
    pub fn default_path() -> Option<PathBuf> {
        None
    }

    /// Load and validate settings from a RON file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)?;
        let settings = Self::from_ron_str(&contents)?;
        info!(path = %path.display(), "loaded draw settings");
        Ok(settings)
    }

    /// Load from `path`, falling back to defaults when the file is missing
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self, SettingsError> {
        match Self::load(path) {
            Err(SettingsError::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => {
                Ok(Self::default())
            }
            other => other,
        }
    }

    /// Validate and write settings as pretty RON, creating parent directories
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), SettingsError> {
        let path = path.as_ref();
        let ron_string = self.to_ron_string()?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, ron_string)?;
        info!(path = %path.display(), "saved draw settings");
        Ok(())
    }

    pub fn from_ron_str(s: &str) -> Result<Self, SettingsError> {
        let settings: DrawSettings = ron::from_str(s)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn to_ron_string(&self) -> Result<String, SettingsError> {
        self.validate()?;
        let config = ron::ser::PrettyConfig::new()
            .depth_limit(4)
            .indentor("  ".to_string());
        Ok(ron::ser::to_string_pretty(self, config)?)
    }

    /// Reject values the editor cannot draw with
    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.brush_size == 0 || self.brush_size > MAX_BRUSH_SIZE {
            return Err(SettingsError::Validation(format!(
                "brush size {} outside 1..={}",
                self.brush_size, MAX_BRUSH_SIZE
            )));
        }
        if self.undo_capacity == 0 {
            return Err(SettingsError::Validation(
                "undo capacity must be at least 1".to_string(),
            ));
        }

        let jitter = &self.jitter;
        if !(jitter.sample_distance > 0.0 && jitter.sample_distance.is_finite()) {
            return Err(SettingsError::Validation(format!(
                "jitter sample distance {} must be positive",
                jitter.sample_distance
            )));
        }
        if !(jitter.max_spread >= 0.0 && jitter.max_spread.is_finite()) {
            return Err(SettingsError::Validation(format!(
                "jitter spread {} must be non-negative",
                jitter.max_spread
            )));
        }

        let line = &self.line;
        if !(line.min_force_length > 0.0 && line.min_force_length <= line.max_force_length) {
            return Err(SettingsError::Validation(format!(
                "line force length range {}..{} is invalid",
                line.min_force_length, line.max_force_length
            )));
        }
        if !(line.force_size >= 0.0 && line.force_size.is_finite()) {
            return Err(SettingsError::Validation(format!(
                "line force size {} must be non-negative",
                line.force_size
            )));
        }
        if !(line.max_size > 0.0) {
            return Err(SettingsError::Validation(format!(
                "line max size {} must be positive",
                line.max_size
            )));
        }
        Ok(())
    }
}
