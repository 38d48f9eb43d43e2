//! Geometric value types shared by every crate.
//!
//! ## Modules
//!
//! - [`point`]: `Point` and the derived `BoundingBox`.

pub mod point;

pub use point::{BoundingBox, Point};
