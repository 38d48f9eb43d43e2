//! Plot command generation.
//!
//! Compiles finalized shapes into a device-agnostic instruction stream of
//! pen moves in normalized canvas coordinates (`0.0..=1.0` on both axes).
//! A plotter driver scales them to its own bed size.

use crate::shape::{FinalizedShape, ShapeKind};
use jetplot_core::Point;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Stroke color used when an outline has none.
pub const DEFAULT_STROKE: &str = "red";
/// Dot color used when a stipple has none.
pub const DEFAULT_FILL: &str = "black";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CommandKind {
    MoveTo,
    PenDown,
    PenUp,
}

/// One plotter instruction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Command {
    pub command: CommandKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y: Option<f64>,
    pub color: String,
}

impl Command {
    pub fn move_to(x: f64, y: f64, color: impl Into<String>) -> Self {
        Self {
            command: CommandKind::MoveTo,
            x: Some(x),
            y: Some(y),
            color: color.into(),
        }
    }

    pub fn pen_down(color: impl Into<String>) -> Self {
        Self {
            command: CommandKind::PenDown,
            x: None,
            y: None,
            color: color.into(),
        }
    }

    pub fn pen_up(color: impl Into<String>) -> Self {
        Self {
            command: CommandKind::PenUp,
            x: None,
            y: None,
            color: color.into(),
        }
    }

    /// Target position, when both coordinates are present.
    pub fn position(&self) -> Option<Point> {
        match (self.x, self.y) {
            (Some(x), Some(y)) => Some(Point::new(x, y)),
            _ => None,
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.command {
            CommandKind::MoveTo => write!(
                f,
                "Moved to ({:.4}, {:.4})",
                self.x.unwrap_or_default(),
                self.y.unwrap_or_default()
            ),
            CommandKind::PenDown => write!(f, "Pen down"),
            CommandKind::PenUp => write!(f, "Pen up"),
        }
    }
}

/// Commands sharing one color, in stream order.
#[derive(Debug, Clone, PartialEq)]
pub struct Layer {
    pub color: String,
    pub commands: Vec<Command>,
}

/// Ordered plotter instructions.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CommandStream {
    commands: Vec<Command>,
}

impl CommandStream {
    pub fn new(commands: Vec<Command>) -> Self {
        Self { commands }
    }

    pub fn commands(&self) -> &[Command] {
        &self.commands
    }

    pub fn into_commands(self) -> Vec<Command> {
        self.commands
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn extend(&mut self, commands: impl IntoIterator<Item = Command>) {
        self.commands.extend(commands);
    }

    /// Splits the stream by color, one layer per color in order of first
    /// appearance. Each layer keeps the relative order of its commands.
    pub fn layers(&self) -> Vec<Layer> {
        let mut layers: Vec<Layer> = Vec::new();
        for command in &self.commands {
            match layers.iter_mut().find(|l| l.color == command.color) {
                Some(layer) => layer.commands.push(command.clone()),
                None => layers.push(Layer {
                    color: command.color.clone(),
                    commands: vec![command.clone()],
                }),
            }
        }
        layers
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

/// Turns finalized shapes into normalized commands for one canvas size.
#[derive(Debug, Clone, PartialEq)]
pub struct CommandCompiler {
    pub canvas_width: f64,
    pub canvas_height: f64,
    pub default_stroke: String,
    pub default_fill: String,
}

impl CommandCompiler {
    pub fn new(canvas_width: f64, canvas_height: f64) -> Self {
        Self {
            canvas_width,
            canvas_height,
            default_stroke: DEFAULT_STROKE.to_string(),
            default_fill: DEFAULT_FILL.to_string(),
        }
    }

    pub fn with_colors(mut self, stroke: impl Into<String>, fill: impl Into<String>) -> Self {
        self.default_stroke = stroke.into();
        self.default_fill = fill.into();
        self
    }

    pub fn color_for(&self, shape: &FinalizedShape) -> String {
        match (&shape.style.color, shape.kind) {
            (Some(color), _) => color.clone(),
            (None, ShapeKind::Outline) => self.default_stroke.clone(),
            (None, ShapeKind::Stipple) => self.default_fill.clone(),
        }
    }

    /// Maps a shape-space point onto the unit square. Returns the point and
    /// whether it had to be clamped.
    fn normalize(&self, p: &Point) -> (f64, f64, bool) {
        let x = p.x / self.canvas_width;
        let y = p.y / self.canvas_height;
        let cx = x.clamp(0.0, 1.0);
        let cy = y.clamp(0.0, 1.0);
        (cx, cy, cx != x || cy != y)
    }

    pub fn compile(&self, shape: &FinalizedShape) -> Vec<Command> {
        let color = self.color_for(shape);
        let mut commands = Vec::new();
        let mut clamped = 0usize;

        let mut move_to = |p: &Point, commands: &mut Vec<Command>| {
            let (x, y, was_clamped) = self.normalize(p);
            if was_clamped {
                clamped += 1;
            }
            commands.push(Command::move_to(x, y, color.as_str()));
        };

        match shape.kind {
            ShapeKind::Outline => {
                for subpath in shape.subpaths.iter().filter(|s| !s.is_empty()) {
                    move_to(&subpath[0], &mut commands);
                    commands.push(Command::pen_down(color.as_str()));
                    for p in &subpath[1..] {
                        move_to(p, &mut commands);
                    }
                    commands.push(Command::pen_up(color.as_str()));
                }
            }
            ShapeKind::Stipple => {
                for dot in &shape.dots {
                    move_to(dot, &mut commands);
                    commands.push(Command::pen_down(color.as_str()));
                    commands.push(Command::pen_up(color.as_str()));
                }
            }
        }

        if clamped > 0 {
            tracing::warn!(
                "Clamped {} coordinate(s) outside the {}x{} canvas",
                clamped,
                self.canvas_width,
                self.canvas_height
            );
        }
        commands
    }

    pub fn compile_all(&self, shapes: &[FinalizedShape]) -> CommandStream {
        let mut stream = CommandStream::default();
        for shape in shapes {
            stream.extend(self.compile(shape));
        }
        tracing::debug!(
            "Compiled {} shape(s) into {} command(s)",
            shapes.len(),
            stream.len()
        );
        stream
    }
}
