//! # JetPlot
//!
//! A pen-plotter shape builder with support for:
//! - Arcs, circles, rectangles, and cubic/quadratic Bézier paths
//! - SVG path data loaded asynchronously from external sources
//! - Shape snapshots that can be replayed under new transforms
//! - Outline strokes and dot-stipple fills
//! - A normalized `MOVE_TO` / `PEN_DOWN` / `PEN_UP` command stream
//!
//! ## Architecture
//!
//! JetPlot is organized as a workspace with multiple crates:
//!
//! 1. **jetplot-core** - Points, errors, and the collaborator traits
//! 2. **jetplot-designer** - Geometry, path parsing, shapes, fills, commands
//! 3. **jetplot-settings** - Configuration files and validation
//! 4. **jetplot** - Main binary that ties configuration, logging, and a demo scene together

use std::sync::Arc;

pub use jetplot_core::{
    BoundingBox, Error, FileSource, LoadCause, MemorySource, PathError, PathSource, Point, RenderSurface,
    Result, ShapeError, SourceError,
};
pub use jetplot_designer as designer;
pub use jetplot_designer::{
    CommandRunner, CommandStream, DotFill, LoggingListener, Palette, PixmapSurface, Plotter,
    PlotterOptions, ShapeSnapshot, Step, StylePatch,
};
pub use jetplot_settings::{Config, LoggingSettings, SettingsError};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Build date (set at compile time)
pub const BUILD_DATE: &str = env!("BUILD_DATE");

/// Reference of the path served to the demo scene.
pub const DEMO_BADGE: &str = "badge";

const DEMO_BADGE_DATA: &str = "M0 -30 L9 -9 L30 -9 L13 4 L19 26 L0 12 L-19 26 L-13 4 L-30 -9 L-9 -9 Z";

/// Initialize logging
///
/// Sets up structured logging with:
/// - Console output, pretty or JSON per `settings.json`
/// - RUST_LOG environment variable support, falling back to `settings.level`
pub fn init_logging(settings: &LoggingSettings) -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(settings.level.to_ascii_lowercase()))?;

    let registry = tracing_subscriber::registry().with(env_filter);
    let result = if settings.json {
        registry
            .with(
                fmt::layer()
                    .with_writer(std::io::stdout)
                    .with_target(true)
                    .json(),
            )
            .try_init()
    } else {
        registry
            .with(
                fmt::layer()
                    .with_writer(std::io::stdout)
                    .with_target(true)
                    .with_level(true)
                    .with_thread_names(true)
                    .with_line_number(true)
                    .pretty(),
            )
            .try_init()
    };

    result.map_err(|e| anyhow::anyhow!("failed to install tracing subscriber: {}", e))
}

/// Maps a loaded configuration onto session options.
pub fn options_from_config(config: &Config) -> PlotterOptions {
    PlotterOptions {
        canvas_width: f64::from(config.canvas.width),
        canvas_height: f64::from(config.canvas.height),
        arc_segments: config.geometry.arc_segments,
        curve_segments: config.geometry.curve_segments,
        default_density: config.fill.density,
        dot_fill: DotFill::new(config.fill.device_scale, config.fill.sample_stride),
        palette: Palette::new(config.colors.stroke.as_str(), config.colors.fill.as_str()),
    }
}

/// Surface sized to the configured canvas at the configured device scale.
pub fn surface_from_config(config: &Config) -> Result<PixmapSurface> {
    PixmapSurface::new(
        config.canvas.width,
        config.canvas.height,
        config.fill.device_scale as f32,
    )
}

/// Path source holding the demo scene's external shapes.
pub fn demo_source() -> Arc<MemorySource> {
    Arc::new(MemorySource::new().with(DEMO_BADGE, DEMO_BADGE_DATA))
}

/// Draws the demo scene: a stroked circle, a filled square, a Bézier
/// path, a square reused twice from one snapshot, and a loaded badge.
pub async fn draw_demo_scene<S: RenderSurface>(
    plotter: &mut Plotter<S>,
) -> std::result::Result<(), ShapeError> {
    plotter.circle(320.0, 240.0, 50.0).stroke().await?;
    plotter.rect(350.0, 150.0, 25.0, 25.0).fill(10).await?;

    plotter
        .move_to(100.0, 100.0)
        .cubic_bezier_to(250.0, 100.0, 150.0, 250.0, 350.0, 350.0)?
        .stroke()
        .await?;

    let square = plotter.rect(170.0, 90.0, 150.0, 150.0).save().await?;
    plotter.stroke().await?;
    plotter
        .use_snapshot(&square)
        .translate(150.0, 150.0)?
        .color("cyan")?
        .stroke()
        .await?;
    plotter
        .use_snapshot(&square)
        .scale(0.5, 0.5)?
        .color("magenta")?
        .fill_default()
        .await?;

    let load = plotter.load_path(DEMO_BADGE);
    plotter.translate(540.0, 80.0)?.color("blue")?;
    load.await?;
    plotter.fill(3).await?;

    Ok(())
}
