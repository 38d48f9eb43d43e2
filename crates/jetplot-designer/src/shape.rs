//! Shapes and their operation log.
//!
//! A [`Shape`] records every mutation as an [`Operation`] before applying
//! it. Replaying the log onto an empty shape reproduces the points, the
//! subpath boundaries and the style exactly, which is what makes
//! [`ShapeSnapshot`]s reusable under new transforms.

use crate::svg_path::ParsedPath;
use jetplot_core::{BoundingBox, Point, ShapeError};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// How a finalized shape is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ShapeKind {
    /// Connected polyline through the points.
    #[default]
    Outline,
    /// Dots sampled inside the closed path.
    Stipple,
}

impl ShapeKind {
    pub fn name(&self) -> &'static str {
        match self {
            ShapeKind::Outline => "outline",
            ShapeKind::Stipple => "stipple",
        }
    }
}

/// Drawing attributes of a shape.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Style {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    /// Grid spacing for stipple fills, in sample steps.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fill_density: Option<u32>,
}

impl Style {
    pub fn merge(&mut self, patch: &StylePatch) {
        if let Some(color) = &patch.color {
            self.color = Some(color.clone());
        }
        if let Some(density) = patch.fill_density {
            self.fill_density = Some(density);
        }
    }
}

/// Partial style update. Unset fields leave the style untouched.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct StylePatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fill_density: Option<u32>,
}

impl StylePatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    pub fn fill_density(mut self, density: u32) -> Self {
        self.fill_density = Some(density);
        self
    }
}

/// One logged shape mutation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Operation {
    AddPoint { x: f64, y: f64 },
    BeginSubpath,
    Translate { dx: f64, dy: f64 },
    Scale { sx: f64, sy: f64 },
    SetColor { color: String },
    SetStyle { patch: StylePatch },
    LoadExternalPath { reference: String },
}

impl Operation {
    /// Short name for log output.
    pub fn name(&self) -> &'static str {
        match self {
            Operation::AddPoint { .. } => "add_point",
            Operation::BeginSubpath => "begin_subpath",
            Operation::Translate { .. } => "translate",
            Operation::Scale { .. } => "scale",
            Operation::SetColor { .. } => "set_color",
            Operation::SetStyle { .. } => "set_style",
            Operation::LoadExternalPath { .. } => "load_external_path",
        }
    }

    fn validate(&self) -> Result<(), String> {
        let finite = |values: &[f64]| values.iter().all(|v| v.is_finite());
        match self {
            Operation::AddPoint { x, y } if !finite(&[*x, *y]) => {
                Err(format!("non-finite point ({}, {})", x, y))
            }
            Operation::Translate { dx, dy } if !finite(&[*dx, *dy]) => {
                Err(format!("non-finite translation ({}, {})", dx, dy))
            }
            Operation::Scale { sx, sy } if !finite(&[*sx, *sy]) => {
                Err(format!("non-finite scale ({}, {})", sx, sy))
            }
            Operation::SetStyle { patch } if patch.fill_density == Some(0) => {
                Err("fill density must be at least 1".to_string())
            }
            Operation::LoadExternalPath { reference } if reference.trim().is_empty() => {
                Err("empty path reference".to_string())
            }
            _ => Ok(()),
        }
    }
}

/// Detached, immutable record of a shape, sufficient to rebuild it.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ShapeSnapshot {
    pub kind: ShapeKind,
    pub operation_log: Vec<Operation>,
    #[serde(default)]
    pub style: Style,
}

impl ShapeSnapshot {
    /// Parses and validates a JSON snapshot.
    pub fn from_json(json: &str) -> Result<Self, ShapeError> {
        let snapshot: ShapeSnapshot =
            serde_json::from_str(json).map_err(|e| ShapeError::InvalidSnapshot {
                reason: e.to_string(),
            })?;
        snapshot.validate()?;
        Ok(snapshot)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Checks that the snapshot can be replayed.
    pub fn validate(&self) -> Result<(), ShapeError> {
        let invalid = |reason: String| ShapeError::InvalidSnapshot { reason };

        if self.style.fill_density == Some(0) {
            return Err(invalid("fill density must be at least 1".to_string()));
        }
        if self.kind == ShapeKind::Stipple && self.style.fill_density.is_none() {
            return Err(invalid("stipple snapshot without fill density".to_string()));
        }
        for (index, op) in self.operation_log.iter().enumerate() {
            op.validate()
                .map_err(|reason| invalid(format!("operation {}: {}", index, reason)))?;
        }
        Ok(())
    }

    /// External path references in log order.
    pub fn references(&self) -> impl Iterator<Item = &str> {
        self.operation_log.iter().filter_map(|op| match op {
            Operation::LoadExternalPath { reference } => Some(reference.as_str()),
            _ => None,
        })
    }
}

/// Immutable result of finalizing a shape.
///
/// `subpaths` is always the boundary geometry; `dots` holds the stipple
/// samples once a dot fill has run and is empty for outlines.
#[derive(Debug, Clone, PartialEq)]
pub struct FinalizedShape {
    pub kind: ShapeKind,
    pub style: Style,
    pub subpaths: Vec<Vec<Point>>,
    pub dots: Vec<Point>,
}

impl FinalizedShape {
    pub fn is_outline(&self) -> bool {
        self.kind == ShapeKind::Outline
    }

    /// Stipple density, at least 1.
    pub fn density(&self) -> u32 {
        self.style.fill_density.unwrap_or(1).max(1)
    }

    pub fn bounding_box(&self) -> Option<BoundingBox> {
        BoundingBox::from_points(self.subpaths.iter().flatten())
    }
}

/// Drawable geometry with its operation log.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Shape {
    kind: ShapeKind,
    points: Vec<Point>,
    /// Indices where a subpath other than the first begins.
    subpath_starts: Vec<usize>,
    style: Style,
    operation_log: Vec<Operation>,
    subpath_pending: bool,
}

impl Shape {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn kind(&self) -> ShapeKind {
        self.kind
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn style(&self) -> &Style {
        &self.style
    }

    pub fn operation_log(&self) -> &[Operation] {
        &self.operation_log
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn subpaths(&self) -> Vec<&[Point]> {
        let mut result = Vec::with_capacity(self.subpath_starts.len() + 1);
        let mut start = 0;
        for &end in &self.subpath_starts {
            result.push(&self.points[start..end]);
            start = end;
        }
        if start < self.points.len() {
            result.push(&self.points[start..]);
        }
        result
    }

    pub fn bounding_box(&self) -> Option<BoundingBox> {
        BoundingBox::from_points(&self.points)
    }

    fn record(&mut self, op: Operation) {
        tracing::trace!("shape op: {:?}", op);
        self.operation_log.push(op);
    }

    fn push_point(&mut self, p: Point) {
        if self.subpath_pending && !self.points.is_empty() {
            self.subpath_starts.push(self.points.len());
        }
        self.subpath_pending = false;
        self.points.push(p);
    }

    fn mark_subpath(&mut self) {
        self.subpath_pending = true;
    }

    pub fn add_point(&mut self, x: f64, y: f64) {
        self.record(Operation::AddPoint { x, y });
        self.push_point(Point::new(x, y));
    }

    /// The next point starts a new disjoint subpath.
    pub fn begin_subpath(&mut self) {
        self.record(Operation::BeginSubpath);
        self.mark_subpath();
    }

    /// Shifts the points present now. Later points are unaffected.
    pub fn translate(&mut self, dx: f64, dy: f64) {
        self.record(Operation::Translate { dx, dy });
        for p in &mut self.points {
            p.x += dx;
            p.y += dy;
        }
    }

    /// Scales about the center of the current bounding box.
    pub fn scale(&mut self, sx: f64, sy: f64) {
        self.record(Operation::Scale { sx, sy });
        let Some(bounds) = self.bounding_box() else {
            return;
        };

        let tl = bounds.top_left;
        let grow_x = bounds.width * sx - bounds.width;
        let grow_y = bounds.height * sy - bounds.height;

        for p in &mut self.points {
            p.x = (p.x - tl.x) * sx + tl.x - grow_x / 2.0;
            p.y = (p.y - tl.y) * sy + tl.y - grow_y / 2.0;
        }
    }

    pub fn set_color(&mut self, color: impl Into<String>) {
        let color = color.into();
        self.record(Operation::SetColor {
            color: color.clone(),
        });
        self.style.color = Some(color);
    }

    pub fn set_style(&mut self, patch: StylePatch) {
        self.style.merge(&patch);
        self.record(Operation::SetStyle { patch });
    }

    /// Applies a logged operation that needs no external data.
    ///
    /// `LoadExternalPath` carries only a reference; it is ignored here and
    /// must go through [`Shape::append_loaded_path`].
    pub fn apply(&mut self, op: &Operation) {
        match op {
            Operation::AddPoint { x, y } => self.add_point(*x, *y),
            Operation::BeginSubpath => self.begin_subpath(),
            Operation::Translate { dx, dy } => self.translate(*dx, *dy),
            Operation::Scale { sx, sy } => self.scale(*sx, *sy),
            Operation::SetColor { color } => self.set_color(color.clone()),
            Operation::SetStyle { patch } => self.set_style(patch.clone()),
            Operation::LoadExternalPath { reference } => {
                tracing::warn!("Ignoring unresolved path load '{}'", reference);
            }
        }
    }

    /// Appends a parsed external path, one subpath per parsed subpath.
    pub fn append_loaded_path(&mut self, reference: &str, parsed: &ParsedPath) {
        self.record(Operation::LoadExternalPath {
            reference: reference.to_string(),
        });
        for subpath in parsed.subpaths() {
            self.mark_subpath();
            for p in subpath {
                self.push_point(*p);
            }
        }
    }

    pub fn save(&self) -> ShapeSnapshot {
        ShapeSnapshot {
            kind: self.kind,
            operation_log: self.operation_log.clone(),
            style: self.style.clone(),
        }
    }

    /// Rebuilds this shape from `snapshot`.
    ///
    /// `resolve` supplies the parsed path for every external reference in
    /// the log. On error the shape is left unchanged.
    pub fn restore_from<F>(&mut self, snapshot: &ShapeSnapshot, mut resolve: F) -> Result<(), ShapeError>
    where
        F: FnMut(&str) -> Result<Arc<ParsedPath>, ShapeError>,
    {
        snapshot.validate()?;

        let mut rebuilt = Shape {
            kind: snapshot.kind,
            style: snapshot.style.clone(),
            ..Shape::default()
        };

        for op in &snapshot.operation_log {
            match op {
                Operation::LoadExternalPath { reference } => {
                    let parsed = resolve(reference)?;
                    rebuilt.append_loaded_path(reference, &parsed);
                }
                other => rebuilt.apply(other),
            }
        }

        tracing::debug!(
            "Restored {} shape from {} operation(s)",
            rebuilt.kind.name(),
            rebuilt.operation_log.len()
        );
        *self = rebuilt;
        Ok(())
    }

    fn finalize(&self) -> FinalizedShape {
        FinalizedShape {
            kind: self.kind,
            style: self.style.clone(),
            subpaths: self.subpaths().into_iter().map(<[Point]>::to_vec).collect(),
            dots: Vec::new(),
        }
    }

    pub fn finalize_as_outline(&mut self) -> FinalizedShape {
        self.kind = ShapeKind::Outline;
        self.finalize()
    }

    /// Fixes the shape as a stipple. Dots are sampled separately by a
    /// [`crate::DotFill`] since that needs a rendering surface.
    pub fn finalize_as_stipple(&mut self, density: u32) -> FinalizedShape {
        self.kind = ShapeKind::Stipple;
        self.style.fill_density = Some(density.max(1));
        self.finalize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::svg_path::parse_path;

    fn no_paths(reference: &str) -> Result<Arc<ParsedPath>, ShapeError> {
        Err(ShapeError::load_failed(reference, "not available"))
    }

    fn square() -> Shape {
        let mut shape = Shape::new();
        shape.add_point(0.0, 0.0);
        shape.add_point(10.0, 0.0);
        shape.add_point(10.0, 10.0);
        shape.add_point(0.0, 10.0);
        shape.add_point(0.0, 0.0);
        shape
    }

    #[test]
    fn test_translate_only_moves_existing_points() {
        let mut shape = Shape::new();
        shape.add_point(1.0, 1.0);
        shape.translate(5.0, -1.0);
        shape.add_point(2.0, 2.0);
        assert_eq!(shape.points(), &[Point::new(6.0, 0.0), Point::new(2.0, 2.0)]);
    }

    #[test]
    fn test_scale_keeps_center() {
        let mut shape = square();
        shape.scale(2.0, 3.0);
        let bounds = shape.bounding_box().unwrap();
        assert_eq!(bounds.center, Point::new(5.0, 5.0));
        assert_eq!(bounds.width, 20.0);
        assert_eq!(bounds.height, 30.0);
        assert_eq!(shape.points()[0], Point::new(-5.0, -10.0));
    }

    #[test]
    fn test_scale_on_empty_shape_is_logged() {
        let mut shape = Shape::new();
        shape.scale(2.0, 2.0);
        assert!(shape.is_empty());
        assert_eq!(shape.operation_log(), &[Operation::Scale { sx: 2.0, sy: 2.0 }]);
    }

    #[test]
    fn test_subpaths() {
        let mut shape = Shape::new();
        shape.begin_subpath();
        shape.add_point(0.0, 0.0);
        shape.add_point(1.0, 0.0);
        shape.begin_subpath();
        shape.add_point(5.0, 5.0);
        shape.add_point(6.0, 5.0);

        let subpaths = shape.subpaths();
        assert_eq!(subpaths.len(), 2);
        assert_eq!(subpaths[1], &[Point::new(5.0, 5.0), Point::new(6.0, 5.0)]);
    }

    #[test]
    fn test_loaded_path_subpaths_are_disjoint() {
        let parsed = parse_path("M0 0 L1 1 M5 5 L6 6").unwrap();
        let mut shape = Shape::new();
        shape.add_point(-1.0, -1.0);
        shape.append_loaded_path("two", &parsed);
        assert_eq!(shape.subpaths().len(), 3);
        assert_eq!(shape.points().len(), 5);
    }

    #[test]
    fn test_replay_reproduces_shape() {
        let mut shape = square();
        shape.translate(3.0, 4.0);
        shape.set_color("cyan");
        shape.begin_subpath();
        shape.add_point(20.0, 20.0);
        shape.scale(0.5, 2.0);
        shape.set_style(StylePatch::new().fill_density(3));

        let snapshot = shape.save();
        let mut restored = Shape::new();
        restored.restore_from(&snapshot, no_paths).unwrap();

        assert_eq!(restored.points(), shape.points());
        assert_eq!(restored.subpaths(), shape.subpaths());
        assert_eq!(restored.style(), shape.style());
        assert_eq!(restored.operation_log(), shape.operation_log());
    }

    #[test]
    fn test_replay_resolves_external_paths() {
        let parsed = Arc::new(parse_path("M0 0 H4 V4 Z").unwrap());
        let mut shape = Shape::new();
        shape.append_loaded_path("box", &parsed);
        shape.translate(1.0, 1.0);

        let snapshot = shape.save();
        let mut restored = Shape::new();
        restored
            .restore_from(&snapshot, |reference| {
                assert_eq!(reference, "box");
                Ok(Arc::clone(&parsed))
            })
            .unwrap();
        assert_eq!(restored.points(), shape.points());
    }

    #[test]
    fn test_failed_restore_leaves_shape_unchanged() {
        let mut source = Shape::new();
        source.append_loaded_path("gone", &parse_path("M0 0 L1 1").unwrap());
        let snapshot = source.save();

        let mut target = square();
        let err = target.restore_from(&snapshot, no_paths).unwrap_err();
        assert!(matches!(err, ShapeError::LoadFailed { .. }));
        assert_eq!(target, square());
    }

    #[test]
    fn test_finalize_stipple_sets_density() {
        let mut shape = square();
        let finalized = shape.finalize_as_stipple(0);
        assert_eq!(finalized.kind, ShapeKind::Stipple);
        assert_eq!(finalized.density(), 1);
        assert_eq!(shape.kind(), ShapeKind::Stipple);

        let outline = shape.finalize_as_outline();
        assert!(outline.is_outline());
        assert_eq!(outline.subpaths.len(), 1);
    }

    #[test]
    fn test_snapshot_json_round_trip() {
        let mut shape = square();
        shape.set_color("magenta");
        let snapshot = shape.save();
        let json = snapshot.to_json().unwrap();
        assert!(json.contains("\"op\": \"add_point\""));
        assert_eq!(ShapeSnapshot::from_json(&json).unwrap(), snapshot);
    }

    #[test]
    fn test_invalid_snapshots_are_rejected() {
        let cases = [
            r#"{"kind":"OUTLINE"}"#,
            r#"{"kind":"OUTLINE","operation_log":[{"op":"add_point","x":null,"y":1}]}"#,
            r#"{"kind":"STIPPLE","operation_log":[]}"#,
            r#"{"kind":"STIPPLE","operation_log":[],"style":{"fill_density":0}}"#,
            r#"{"kind":"OUTLINE","operation_log":[{"op":"load_external_path","reference":" "}]}"#,
            r#"{"kind":"OUTLINE","operation_log":[{"op":"spin"}]}"#,
        ];
        for json in cases {
            let err = ShapeSnapshot::from_json(json).unwrap_err();
            assert!(
                matches!(err, ShapeError::InvalidSnapshot { .. }),
                "{} gave {:?}",
                json,
                err
            );
        }
    }

    #[test]
    fn test_non_finite_values_fail_validation() {
        let snapshot = ShapeSnapshot {
            kind: ShapeKind::Outline,
            operation_log: vec![Operation::Translate {
                dx: f64::NAN,
                dy: 0.0,
            }],
            style: Style::default(),
        };
        assert!(snapshot.validate().is_err());
    }
}
