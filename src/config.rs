//! Configuration management for the application.
//!
//! This module handles loading, validating, and saving application configuration
//! in TOML format with platform-specific directory resolution. The geometry
//! functions never read configuration themselves; callers pass the relevant
//! section in explicitly.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Layout pixels per millimeter.
pub const DEFAULT_PIXELS_PER_MM: f64 = 0.4;
/// Captured-image pixels per layout pixel.
pub const DEFAULT_PIXEL_RATIO: f64 = 3.0;
/// Width of the cooler frame drawn around each door.
pub const DEFAULT_FRAME_BORDER: f64 = 16.0;
/// Height of the branded header above the top shelf.
pub const DEFAULT_HEADER_HEIGHT: f64 = 100.0;
/// Height of the ventilation grille below the bottom shelf.
pub const DEFAULT_GRILLE_HEIGHT: f64 = 90.0;
/// Horizontal gap between adjacent doors.
pub const DEFAULT_DOOR_GAP: f64 = 0.0;
/// Empirical Y correction for the shelf lip, which row geometry does not model.
pub const DEFAULT_SHELF_THICKNESS_CORRECTION: f64 = 10.0;

/// Rendering constants shared by the editor and the bounding-box exporter.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RenderConfig {
    /// Layout pixels per millimeter
    #[serde(default = "default_pixels_per_mm")]
    pub pixels_per_mm: f64,
    /// Frame border width in layout pixels
    #[serde(default = "default_frame_border")]
    pub frame_border: f64,
    /// Header height in layout pixels
    #[serde(default = "default_header_height")]
    pub header_height: f64,
    /// Grille height in layout pixels
    #[serde(default = "default_grille_height")]
    pub grille_height: f64,
    /// Gap between doors in layout pixels
    #[serde(default = "default_door_gap")]
    pub door_gap: f64,
    /// Shelf-lip Y correction in layout pixels
    #[serde(default = "default_shelf_thickness_correction")]
    pub shelf_thickness_correction: f64,
}

fn default_pixels_per_mm() -> f64 {
    DEFAULT_PIXELS_PER_MM
}

fn default_frame_border() -> f64 {
    DEFAULT_FRAME_BORDER
}

fn default_header_height() -> f64 {
    DEFAULT_HEADER_HEIGHT
}

fn default_grille_height() -> f64 {
    DEFAULT_GRILLE_HEIGHT
}

fn default_door_gap() -> f64 {
    DEFAULT_DOOR_GAP
}

fn default_shelf_thickness_correction() -> f64 {
    DEFAULT_SHELF_THICKNESS_CORRECTION
}

fn default_pixel_ratio() -> f64 {
    DEFAULT_PIXEL_RATIO
}

fn default_rules_enabled() -> bool {
    true
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            pixels_per_mm: DEFAULT_PIXELS_PER_MM,
            frame_border: DEFAULT_FRAME_BORDER,
            header_height: DEFAULT_HEADER_HEIGHT,
            grille_height: DEFAULT_GRILLE_HEIGHT,
            door_gap: DEFAULT_DOOR_GAP,
            shelf_thickness_correction: DEFAULT_SHELF_THICKNESS_CORRECTION,
        }
    }
}

impl RenderConfig {
    /// Converts millimeters to layout pixels.
    pub fn mm_to_px(&self, mm: f64) -> f64 {
        mm * self.pixels_per_mm
    }

    /// Converts layout pixels to millimeters.
    pub fn px_to_mm(&self, px: f64) -> f64 {
        px / self.pixels_per_mm
    }

    /// Y offset from row coordinates to absolute cooler coordinates.
    pub fn y_offset(&self) -> f64 {
        self.frame_border + self.header_height + self.shelf_thickness_correction
    }
}

/// Export settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ExportConfig {
    /// Pixel ratio between captured images and the on-screen layout
    #[serde(default = "default_pixel_ratio")]
    pub pixel_ratio: f64,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            pixel_ratio: DEFAULT_PIXEL_RATIO,
        }
    }
}

/// Editor behaviour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditorConfig {
    /// Enforce capacity, height and product-type rules when placing items
    #[serde(default = "default_rules_enabled")]
    pub rules_enabled: bool,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            rules_enabled: default_rules_enabled(),
        }
    }
}

/// Application configuration.
///
/// # File Location
///
/// - Linux: `~/.config/Planogram/config.toml`
/// - macOS: `~/Library/Application Support/Planogram/config.toml`
/// - Windows: `%APPDATA%\Planogram\config.toml`
///
/// # Validation
///
/// - `pixels_per_mm` and `pixel_ratio` must be strictly positive
/// - frame, header, grille, door gap and shelf correction must not be negative
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Config {
    /// Rendering constants
    #[serde(default)]
    pub render: RenderConfig,
    /// Export settings
    #[serde(default)]
    pub export: ExportConfig,
    /// Editor behaviour
    #[serde(default)]
    pub editor: EditorConfig,
}

impl Config {
    /// Creates a new Config with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Checks if the config file exists on disk.
    #[must_use]
    pub fn exists() -> bool {
        Self::config_file_path()
            .map(|path| path.exists())
            .unwrap_or(false)
    }

    /// Gets the platform-specific config directory path.
    pub fn config_dir() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Failed to determine config directory")?
            .join("Planogram");

        Ok(config_dir)
    }

    /// Gets the full path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Loads configuration from the platform config file.
    ///
    /// If the file doesn't exist, returns default configuration.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_file_path()?)
    }

    /// Loads configuration from an explicit path, falling back to defaults if absent.
    pub fn load_from(config_path: &Path) -> Result<Self> {
        if !config_path.exists() {
            return Ok(Self::new());
        }

        let content = fs::read_to_string(config_path).context(format!(
            "Failed to read config file: {}",
            config_path.display()
        ))?;

        let config: Self = toml::from_str(&content).context(format!(
            "Failed to parse config file: {}",
            config_path.display()
        ))?;

        config.validate()?;
        Ok(config)
    }

    /// Saves configuration to the platform config file.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_file_path()?)
    }

    /// Saves configuration to an explicit path using atomic write.
    ///
    /// Uses temp file + rename pattern for atomic writes.
    pub fn save_to(&self, config_path: &Path) -> Result<()> {
        self.validate()?;

        if let Some(config_dir) = config_path.parent() {
            fs::create_dir_all(config_dir).context(format!(
                "Failed to create config directory: {}",
                config_dir.display()
            ))?;
        }

        let content = toml::to_string_pretty(self).context("Failed to serialize configuration")?;
        let temp_path = config_path.with_extension("toml.tmp");

        fs::write(&temp_path, content).context(format!(
            "Failed to write temp config file: {}",
            temp_path.display()
        ))?;

        fs::rename(&temp_path, config_path).context(format!(
            "Failed to rename temp config file to: {}",
            config_path.display()
        ))?;

        Ok(())
    }

    /// Validates configuration values.
    pub fn validate(&self) -> Result<()> {
        if self.render.pixels_per_mm <= 0.0 {
            anyhow::bail!(
                "pixels_per_mm must be positive (got {})",
                self.render.pixels_per_mm
            );
        }

        if self.export.pixel_ratio <= 0.0 {
            anyhow::bail!(
                "pixel_ratio must be positive (got {})",
                self.export.pixel_ratio
            );
        }

        let lengths = [
            ("frame_border", self.render.frame_border),
            ("header_height", self.render.header_height),
            ("grille_height", self.render.grille_height),
            ("door_gap", self.render.door_gap),
            (
                "shelf_thickness_correction",
                self.render.shelf_thickness_correction,
            ),
        ];
        for (name, value) in lengths {
            if value < 0.0 {
                anyhow::bail!("{name} cannot be negative (got {value})");
            }
        }

        Ok(())
    }
}
