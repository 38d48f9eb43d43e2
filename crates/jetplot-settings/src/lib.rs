//! JetPlot Settings Crate
//!
//! Handles application configuration and its persistence.

pub mod config;
pub mod error;

pub use config::{
    config_dir, default_config_path, CanvasSettings, ColorSettings, Config, FillSettings,
    GeometrySettings, LoggingSettings, RunnerSettings, CONFIG_FILE_NAME,
};
pub use error::{ConfigError, SettingsError, SettingsResult};
