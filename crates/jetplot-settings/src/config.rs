//! Configuration for JetPlot
//!
//! Provides configuration file handling and validation. Supports JSON and
//! TOML file formats, chosen by file extension.
//!
//! Configuration is organized into logical sections:
//! - Canvas size in drawing units
//! - Curve flattening resolution
//! - Dot-fill sampling
//! - Default layer colors
//! - Command playback pacing
//! - Logging

use crate::error::{ConfigError, SettingsError, SettingsResult};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// File name used inside the platform config directory.
pub const CONFIG_FILE_NAME: &str = "config.toml";

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Drawing area in drawing units; also the normalization extent for commands.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CanvasSettings {
    pub width: u32,
    pub height: u32,
}

impl Default for CanvasSettings {
    fn default() -> Self {
        Self {
            width: 640,
            height: 480,
        }
    }
}

/// Segment counts used when flattening arcs and curves
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeometrySettings {
    pub arc_segments: usize,
    pub curve_segments: usize,
}

impl Default for GeometrySettings {
    fn default() -> Self {
        Self {
            arc_segments: 50,
            curve_segments: 50,
        }
    }
}

/// Dot-fill sampling settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FillSettings {
    /// Density used by `fill` when none is given
    pub density: u32,
    /// Device pixels per drawing unit
    pub device_scale: f64,
    /// Device pixels between sampled grid cells
    pub sample_stride: u32,
}

impl Default for FillSettings {
    fn default() -> Self {
        Self {
            density: 4,
            device_scale: 2.0,
            sample_stride: 2,
        }
    }
}

/// Colors for shapes that never had one set
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColorSettings {
    pub stroke: String,
    pub fill: String,
}

impl Default for ColorSettings {
    fn default() -> Self {
        Self {
            stroke: "red".to_string(),
            fill: "black".to_string(),
        }
    }
}

/// Command playback settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunnerSettings {
    pub step_interval_ms: u64,
}

impl RunnerSettings {
    pub fn step_interval(&self) -> Duration {
        Duration::from_millis(self.step_interval_ms)
    }
}

impl Default for RunnerSettings {
    fn default() -> Self {
        Self {
            step_interval_ms: 150,
        }
    }
}

/// Logging settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// Default level filter; `RUST_LOG` takes precedence when set
    pub level: String,
    /// Emit JSON lines instead of human-readable output
    pub json: bool,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

/// Complete application configuration
///
/// Aggregates all settings sections and provides file I/O operations.
/// Missing sections and keys fall back to their defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub canvas: CanvasSettings,
    pub geometry: GeometrySettings,
    pub fill: FillSettings,
    pub colors: ColorSettings,
    pub runner: RunnerSettings,
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Format {
    Json,
    Toml,
}

impl Format {
    fn of(path: &Path) -> SettingsResult<Self> {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Ok(Self::Json),
            Some("toml") => Ok(Self::Toml),
            other => Err(ConfigError::UnsupportedFormat(other.unwrap_or("").to_string()).into()),
        }
    }
}

impl Config {
    /// Create new config with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Load config from file (JSON or TOML)
    pub fn load_from_file(path: &Path) -> SettingsResult<Self> {
        let format = Format::of(path)?;
        let content = std::fs::read_to_string(path).map_err(|e| {
            SettingsError::LoadError(format!("{}: {}", path.display(), e))
        })?;

        let config: Self = match format {
            Format::Json => serde_json::from_str(&content)?,
            Format::Toml => toml::from_str(&content)?,
        };

        config.validate()?;
        tracing::debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Load config from file, or use defaults when the file does not exist
    pub fn load_or_default(path: &Path) -> SettingsResult<Self> {
        if path.exists() {
            Self::load_from_file(path)
        } else {
            tracing::info!("No configuration at {}, using defaults", path.display());
            Ok(Self::default())
        }
    }

    /// Save config to file (JSON or TOML)
    pub fn save_to_file(&self, path: &Path) -> SettingsResult<()> {
        self.validate()?;

        let content = match Format::of(path)? {
            Format::Json => serde_json::to_string_pretty(self)?,
            Format::Toml => toml::to_string_pretty(self)?,
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, content).map_err(|e| {
            SettingsError::SaveError(format!("{}: {}", path.display(), e))
        })?;

        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> SettingsResult<()> {
        if self.canvas.width == 0 {
            return Err(out_of_range("canvas.width", self.canvas.width));
        }
        if self.canvas.height == 0 {
            return Err(out_of_range("canvas.height", self.canvas.height));
        }

        if self.geometry.arc_segments == 0 {
            return Err(SettingsError::invalid("geometry.arc_segments", "must be > 0"));
        }
        if self.geometry.curve_segments == 0 {
            return Err(SettingsError::invalid("geometry.curve_segments", "must be > 0"));
        }

        if self.fill.density == 0 {
            return Err(SettingsError::invalid("fill.density", "must be at least 1"));
        }
        if !self.fill.device_scale.is_finite() || self.fill.device_scale <= 0.0 {
            return Err(out_of_range("fill.device_scale", self.fill.device_scale));
        }
        if self.fill.sample_stride == 0 {
            return Err(SettingsError::invalid("fill.sample_stride", "must be > 0"));
        }

        if self.colors.stroke.trim().is_empty() {
            return Err(SettingsError::invalid("colors.stroke", "must not be empty"));
        }
        if self.colors.fill.trim().is_empty() {
            return Err(SettingsError::invalid("colors.fill", "must not be empty"));
        }

        if self.runner.step_interval_ms == 0 {
            return Err(SettingsError::invalid("runner.step_interval_ms", "must be > 0"));
        }

        let level = self.logging.level.to_ascii_lowercase();
        if !LOG_LEVELS.contains(&level.as_str()) {
            return Err(SettingsError::invalid(
                "logging.level",
                format!("expected one of {}", LOG_LEVELS.join(", ")),
            ));
        }

        Ok(())
    }
}

fn out_of_range(key: &str, value: impl ToString) -> SettingsError {
    ConfigError::ValueOutOfRange {
        key: key.to_string(),
        value: value.to_string(),
    }
    .into()
}

/// Platform config directory for JetPlot (e.g. `~/.config/jetplot` on Linux)
pub fn config_dir() -> SettingsResult<PathBuf> {
    dirs::config_dir()
        .map(|dir| dir.join("jetplot"))
        .ok_or_else(|| ConfigError::UnsupportedPlatform(std::env::consts::OS.to_string()).into())
}

/// Default location of the configuration file
pub fn default_config_path() -> SettingsResult<PathBuf> {
    Ok(config_dir()?.join(CONFIG_FILE_NAME))
}
