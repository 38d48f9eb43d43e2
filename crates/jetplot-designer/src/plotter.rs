//! Drawing session.
//!
//! [`Plotter`] is the front door: it keeps at most one active shape, turns
//! primitives into shape operations, and collects finalized shapes for
//! rendering or command export.
//!
//! ```no_run
//! # use jetplot_designer::{Plotter, PlotterOptions, PixmapSurface};
//! # use jetplot_core::MemorySource;
//! # use std::sync::Arc;
//! # async fn demo() -> Result<(), Box<dyn std::error::Error>> {
//! let surface = PixmapSurface::new(640, 480, 2.0)?;
//! let mut plotter = Plotter::new(surface, Arc::new(MemorySource::new()), PlotterOptions::default());
//!
//! plotter.circle(320.0, 240.0, 50.0).stroke().await?;
//! plotter.rect(350.0, 150.0, 25.0, 25.0).fill(10).await?;
//!
//! let stream = plotter.commands();
//! println!("{}", stream.to_json()?);
//! # Ok(())
//! # }
//! ```

use crate::commands::{CommandCompiler, CommandStream};
use crate::dot_fill::DotFill;
use crate::geometry;
use crate::loader::PathLoader;
use crate::queue::{PendingLoad, ShapeHandle};
use crate::render::{draw_shape, Palette};
use crate::shape::{FinalizedShape, ShapeSnapshot, StylePatch};
use crate::svg_path::PathParser;
use jetplot_core::{PathSource, Point, RenderSurface, ShapeError};
use std::f64::consts::TAU;
use std::sync::Arc;

/// Session-wide drawing parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct PlotterOptions {
    pub canvas_width: f64,
    pub canvas_height: f64,
    pub arc_segments: usize,
    pub curve_segments: usize,
    pub default_density: u32,
    pub dot_fill: DotFill,
    pub palette: Palette,
}

impl Default for PlotterOptions {
    fn default() -> Self {
        Self {
            canvas_width: 640.0,
            canvas_height: 480.0,
            arc_segments: geometry::DEFAULT_SEGMENTS,
            curve_segments: geometry::DEFAULT_SEGMENTS,
            default_density: 4,
            dot_fill: DotFill::default(),
            palette: Palette::default(),
        }
    }
}

/// A drawing session over one rendering surface.
pub struct Plotter<S: RenderSurface> {
    options: PlotterOptions,
    surface: S,
    loader: Arc<PathLoader>,
    active: Option<ShapeHandle>,
    /// Last point placed by a primitive, when it is known without asking
    /// the shape task.
    cursor: Option<Point>,
    finalized: Vec<FinalizedShape>,
    /// First primitive that could not reach the active shape's task.
    send_error: Option<ShapeError>,
}

impl<S: RenderSurface> Plotter<S> {
    pub fn new(surface: S, source: Arc<dyn PathSource>, options: PlotterOptions) -> Self {
        let loader = Arc::new(PathLoader::new(
            source,
            PathParser::new(options.curve_segments),
        ));
        Self::with_loader(surface, loader, options)
    }

    /// Shares an existing loader (and its cache) with this session.
    pub fn with_loader(surface: S, loader: Arc<PathLoader>, options: PlotterOptions) -> Self {
        Self {
            options,
            surface,
            loader,
            active: None,
            cursor: None,
            finalized: Vec::new(),
            send_error: None,
        }
    }

    pub fn options(&self) -> &PlotterOptions {
        &self.options
    }

    pub fn loader(&self) -> &Arc<PathLoader> {
        &self.loader
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn into_surface(self) -> S {
        self.surface
    }

    pub fn has_active_shape(&self) -> bool {
        self.active.is_some()
    }

    pub fn finalized_shapes(&self) -> &[FinalizedShape] {
        &self.finalized
    }

    /// Current cursor, if known.
    pub fn cursor(&self) -> Option<Point> {
        self.cursor
    }

    fn shape(&mut self) -> &ShapeHandle {
        let loader = &self.loader;
        self.active.get_or_insert_with(|| {
            let handle = ShapeHandle::spawn(Arc::clone(loader));
            tracing::debug!("Started shape {}", handle.id());
            handle
        })
    }

    fn active(&self) -> Result<&ShapeHandle, ShapeError> {
        self.active.as_ref().ok_or(ShapeError::NoActiveShape)
    }

    fn current_point(&self) -> Result<Point, ShapeError> {
        self.active()?;
        self.cursor.ok_or(ShapeError::NoCurrentPoint)
    }

    /// Adds `points` to the active shape (starting one if needed) as a new
    /// subpath.
    fn push_subpath(&mut self, points: &[Point]) -> &mut Self {
        let handle = self.shape();
        let sent = handle
            .begin_subpath()
            .and_then(|_| handle.add_points(points));
        if let Err(err) = sent {
            tracing::warn!("Dropped primitive: {}", err);
            self.send_error.get_or_insert(err);
        }
        if let Some(last) = points.last() {
            self.cursor = Some(*last);
        }
        self
    }

    fn extend_subpath(&mut self, points: &[Point]) -> Result<&mut Self, ShapeError> {
        self.active()?.add_points(points)?;
        if let Some(last) = points.last() {
            self.cursor = Some(*last);
        }
        Ok(self)
    }

    /// Arc around `(cx, cy)`. `total_angle` is in radians, `start_angle`
    /// in degrees.
    pub fn arc(&mut self, cx: f64, cy: f64, radius: f64, total_angle: f64, start_angle: f64) -> &mut Self {
        let points = geometry::arc(
            Point::new(cx, cy),
            radius,
            total_angle,
            self.options.arc_segments,
            start_angle,
        );
        self.push_subpath(&points)
    }

    pub fn circle(&mut self, cx: f64, cy: f64, radius: f64) -> &mut Self {
        self.arc(cx, cy, radius, TAU, 0.0)
    }

    pub fn rect(&mut self, x: f64, y: f64, width: f64, height: f64) -> &mut Self {
        let points = geometry::rectangle(Point::new(x, y), width, height);
        self.push_subpath(&points)
    }

    pub fn move_to(&mut self, x: f64, y: f64) -> &mut Self {
        self.push_subpath(&[Point::new(x, y)])
    }

    pub fn line_to(&mut self, x: f64, y: f64) -> Result<&mut Self, ShapeError> {
        self.current_point()?;
        self.extend_subpath(&[Point::new(x, y)])
    }

    pub fn cubic_bezier_to(
        &mut self,
        c1x: f64,
        c1y: f64,
        c2x: f64,
        c2y: f64,
        x: f64,
        y: f64,
    ) -> Result<&mut Self, ShapeError> {
        let from = self.current_point()?;
        let points = geometry::cubic_bezier(
            from,
            Point::new(c1x, c1y),
            Point::new(c2x, c2y),
            Point::new(x, y),
            self.options.curve_segments,
        );
        self.extend_subpath(&points)
    }

    pub fn quadratic_bezier_to(&mut self, cx: f64, cy: f64, x: f64, y: f64) -> Result<&mut Self, ShapeError> {
        let from = self.current_point()?;
        let points = geometry::quadratic_bezier(
            from,
            Point::new(cx, cy),
            Point::new(x, y),
            self.options.curve_segments,
        );
        self.extend_subpath(&points)
    }

    /// Appends an external path to the active shape, starting one if
    /// needed. Later operations wait for the load.
    pub fn load_path(&mut self, reference: &str) -> PendingLoad {
        self.cursor = None;
        self.shape().load_external_path(reference)
    }

    pub fn translate(&mut self, dx: f64, dy: f64) -> Result<&mut Self, ShapeError> {
        self.active()?.translate(dx, dy)?;
        self.cursor = self.cursor.map(|p| Point::new(p.x + dx, p.y + dy));
        Ok(self)
    }

    pub fn scale(&mut self, sx: f64, sy: f64) -> Result<&mut Self, ShapeError> {
        self.active()?.scale(sx, sy)?;
        self.cursor = None;
        Ok(self)
    }

    pub fn color(&mut self, color: &str) -> Result<&mut Self, ShapeError> {
        self.active()?.set_color(color)?;
        Ok(self)
    }

    pub fn style(&mut self, patch: StylePatch) -> Result<&mut Self, ShapeError> {
        self.active()?.set_style(patch)?;
        Ok(self)
    }

    /// Snapshot of the active shape once all queued work has run. The
    /// shape stays active.
    pub async fn save(&self) -> Result<ShapeSnapshot, ShapeError> {
        let handle = self.active()?;
        if let Some(err) = &self.send_error {
            return Err(err.clone());
        }
        handle.save().await
    }

    /// Starts a new shape rebuilt from `snapshot`, abandoning any active
    /// one. Restore failures surface when the shape is finalized.
    pub fn use_snapshot(&mut self, snapshot: &ShapeSnapshot) -> &mut Self {
        self.send_error = None;
        if self.active.take().is_some() {
            tracing::debug!("Abandoning unfinalized shape");
        }
        self.cursor = None;
        let _ = self.shape().restore_from(snapshot.clone());
        self
    }

    /// Finalizes the active shape as an outline.
    pub async fn stroke(&mut self) -> Result<&mut Self, ShapeError> {
        let handle = self.active.take().ok_or(ShapeError::NoActiveShape)?;
        if let Some(err) = self.send_error.take() {
            self.cursor = None;
            return Err(err);
        }
        self.cursor = None;
        let shape = handle.finalize_as_outline().await?;
        tracing::debug!(
            "Stroked shape {} ({} subpath(s))",
            handle.id(),
            shape.subpaths.len()
        );
        self.finalized.push(shape);
        Ok(self)
    }

    /// Finalizes the active shape as a stipple fill with `density`.
    pub async fn fill(&mut self, density: u32) -> Result<&mut Self, ShapeError> {
        let handle = self.active.take().ok_or(ShapeError::NoActiveShape)?;
        if let Some(err) = self.send_error.take() {
            self.cursor = None;
            return Err(err);
        }
        self.cursor = None;
        let mut shape = handle.finalize_as_stipple(density).await?;
        self.options.dot_fill.fill_shape(&mut shape, &self.surface);
        tracing::debug!(
            "Filled shape {} with {} dot(s)",
            handle.id(),
            shape.dots.len()
        );
        self.finalized.push(shape);
        Ok(self)
    }

    /// [`Plotter::fill`] with the session's default density.
    pub async fn fill_default(&mut self) -> Result<&mut Self, ShapeError> {
        let density = self.options.default_density;
        self.fill(density).await
    }

    /// Compiles every finalized shape into plot commands.
    pub fn commands(&self) -> CommandStream {
        CommandCompiler::new(self.options.canvas_width, self.options.canvas_height)
            .with_colors(
                self.options.palette.stroke.as_str(),
                self.options.palette.fill.as_str(),
            )
            .compile_all(&self.finalized)
    }

    /// Renders every finalized shape onto the surface.
    pub fn draw(&mut self) {
        for shape in &self.finalized {
            draw_shape(shape, &mut self.surface, &self.options.palette);
        }
        tracing::info!("Drew {} shape(s)", self.finalized.len());
    }

    /// Drops finalized shapes and any active shape.
    pub fn clear(&mut self) {
        self.finalized.clear();
        self.active = None;
        self.cursor = None;
        self.send_error = None;
    }
}

impl<S: RenderSurface> std::fmt::Debug for Plotter<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Plotter")
            .field("options", &self.options)
            .field("active", &self.active)
            .field("finalized", &self.finalized.len())
            .finish()
    }
}
