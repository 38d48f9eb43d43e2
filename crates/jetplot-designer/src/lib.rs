//! # JetPlot Designer
//!
//! This crate turns drawing calls into plottable geometry. It covers shape
//! construction, SVG path import, stipple fills, and the normalized command
//! stream a pen plotter consumes.
//!
//! ## Core Components
//!
//! ### Geometry
//! - **Generators**: Arcs, circles, rectangles, cubic and quadratic Béziers
//! - **Path Parser**: SVG path data (`M L H V C S Q T Z`, absolute and relative)
//! - **Path Loader**: Cached retrieval of external path descriptions
//!
//! ### Shapes
//! - **Operation Log**: Every mutation is recorded and replayable
//! - **Snapshots**: Serializable shape records for reuse under new transforms
//! - **Task Queue**: One tokio task per shape applies work in send order
//!
//! ### Output
//! - **Dot Fill**: Grid sampling of closed paths for stipple fills
//! - **Commands**: `MOVE_TO` / `PEN_DOWN` / `PEN_UP` in unit canvas space
//! - **Runner**: Step-wise playback with pen tracking
//! - **Rendering**: `tiny-skia` raster surface with PNG export
//!
//! ## Architecture
//!
//! ```text
//! Plotter (Drawing session)
//!   ├── ShapeHandle (Per-shape task queue)
//!   │     ├── Shape (Points + operation log)
//!   │     └── PathLoader (Parsed path cache)
//!   └── RenderSurface (Hit testing, strokes, dots)
//!
//! FinalizedShape
//!   ├── DotFill (Stipple samples)
//!   ├── CommandCompiler → CommandStream → CommandRunner
//!   └── draw_shape (Raster preview)
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use jetplot_designer::{Plotter, PlotterOptions, PixmapSurface};
//!
//! let mut plotter = Plotter::new(surface, source, PlotterOptions::default());
//! let square = plotter.rect(170.0, 90.0, 150.0, 150.0).save().await?;
//!
//! plotter.use_snapshot(&square).color("cyan")?.stroke().await?;
//! plotter.use_snapshot(&square).translate(150.0, 150.0)?.color("magenta")?.fill(4).await?;
//!
//! let commands = plotter.commands();
//! ```

pub mod commands;
pub mod dot_fill;
pub mod geometry;
pub mod loader;
pub mod plotter;
pub mod queue;
pub mod render;
pub mod runner;
pub mod shape;
pub mod surface;
pub mod svg_path;

pub use commands::{
    Command, CommandCompiler, CommandKind, CommandStream, Layer, DEFAULT_FILL, DEFAULT_STROKE,
};
pub use dot_fill::DotFill;
pub use geometry::DEFAULT_SEGMENTS;
pub use loader::PathLoader;
pub use plotter::{Plotter, PlotterOptions};
pub use queue::{Pending, PendingLoad, ShapeHandle, ShapeId};
pub use render::{draw_shape, Palette};
pub use runner::{
    CommandRunner, LoggingListener, PenState, RunnerListener, RunnerState, Step, StepEvent,
    SurfaceTracer,
};
pub use shape::{
    FinalizedShape, Operation, Shape, ShapeKind, ShapeSnapshot, Style, StylePatch,
};
pub use surface::{parse_color, PixmapSurface};
pub use svg_path::{parse_path, ParsedPath, PathParser, PathSegment};
