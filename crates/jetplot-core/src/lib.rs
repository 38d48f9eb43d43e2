//! # JetPlot Core
//!
//! Core types, collaborator traits, and errors for JetPlot.
//! Provides the geometric value types shared by every crate, the error
//! taxonomy, and the two narrow interfaces the plotting core consumes:
//! a rendering surface and an external path data source.

pub mod error;
pub mod source;
pub mod surface;
pub mod types;

pub use error::{Error, LoadCause, PathError, Result, ShapeError, SourceError};
pub use source::{extract_svg_path_data, FileSource, MemorySource, PathSource};
pub use surface::{ray_cast_contains, RenderSurface};
pub use types::{BoundingBox, Point};
