//! Error handling for JetPlot
//!
//! Provides error types for every layer of the plotting core:
//! - Shape errors (session sequencing and snapshot validation)
//! - Path errors (path grammar violations)
//! - Source errors (external path data retrieval)
//!
//! All error types use `thiserror` for ergonomic error handling.

use thiserror::Error;

/// Shape error type
///
/// Represents sequencing mistakes made by the caller of a drawing session
/// and malformed snapshot input.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ShapeError {
    /// An operation that needs an in-progress shape was called with none active
    #[error("No active shape")]
    NoActiveShape,

    /// A relative drawing call was made before any point was placed
    #[error("No current point to continue the path from")]
    NoCurrentPoint,

    /// Snapshot could not be restored
    #[error("Invalid snapshot: {reason}")]
    InvalidSnapshot {
        /// Why the snapshot was rejected.
        reason: String,
    },

    /// An earlier external path load on the same shape failed
    #[error("Loading path '{reference}' failed: {cause}")]
    LoadFailed {
        /// The reference that failed to load.
        reference: String,
        /// The underlying failure.
        #[source]
        cause: LoadCause,
    },

    /// The task owning the shape has stopped
    #[error("Shape task is no longer running")]
    Detached,
}

impl ShapeError {
    /// Shorthand for a [`ShapeError::LoadFailed`].
    pub fn load_failed(reference: impl Into<String>, cause: impl Into<LoadCause>) -> Self {
        ShapeError::LoadFailed {
            reference: reference.into(),
            cause: cause.into(),
        }
    }

    /// The grammar violation behind a failed load, if that is what failed.
    pub fn path_error(&self) -> Option<&PathError> {
        match self {
            ShapeError::LoadFailed {
                cause: LoadCause::Path(err),
                ..
            } => Some(err),
            _ => None,
        }
    }
}

/// Why an external path could not be loaded
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LoadCause {
    /// The path data did not parse
    #[error(transparent)]
    Path(#[from] PathError),

    /// The path data could not be retrieved
    #[error(transparent)]
    Source(#[from] SourceError),

    /// Any other failure
    #[error("{0}")]
    Other(String),
}

impl From<Error> for LoadCause {
    fn from(err: Error) -> Self {
        match err {
            Error::Path(err) => LoadCause::Path(err),
            Error::Source(err) => LoadCause::Source(err),
            other => LoadCause::Other(other.to_string()),
        }
    }
}

impl From<&str> for LoadCause {
    fn from(reason: &str) -> Self {
        LoadCause::Other(reason.to_string())
    }
}

/// Path grammar error type
///
/// Represents errors raised while tokenizing or interpreting a path
/// description.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PathError {
    /// Grammar violation
    #[error("Malformed path at offset {offset} ('{character}'): {reason}")]
    MalformedPath {
        /// The offending character.
        character: char,
        /// Byte offset of the offending character.
        offset: usize,
        /// What was wrong.
        reason: String,
    },

    /// A recognized command letter with no implementation
    #[error("Unsupported path command '{command}' at offset {offset}")]
    UnsupportedCommand {
        /// The command letter.
        command: char,
        /// Byte offset of the command letter.
        offset: usize,
    },
}

impl PathError {
    /// Shorthand for a [`PathError::MalformedPath`].
    pub fn malformed(character: char, offset: usize, reason: impl Into<String>) -> Self {
        PathError::MalformedPath {
            character,
            offset,
            reason: reason.into(),
        }
    }
}

/// Path source error type
///
/// Represents failures of the collaborator that retrieves raw path data.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SourceError {
    /// Nothing is stored under the reference
    #[error("Path data not found: {reference}")]
    NotFound {
        /// The missing reference.
        reference: String,
    },

    /// The data exists but could not be read
    #[error("Failed to read path data '{reference}': {reason}")]
    Read {
        /// The reference being read.
        reference: String,
        /// The reason the read failed.
        reason: String,
    },
}

/// Main error type for JetPlot
///
/// A unified error type that can represent any error from all layers.
/// This is the primary error type used in public APIs.
#[derive(Error, Debug)]
pub enum Error {
    /// Shape error
    #[error(transparent)]
    Shape(#[from] ShapeError),

    /// Path grammar error
    #[error(transparent)]
    Path(#[from] PathError),

    /// Path source error
    #[error(transparent)]
    Source(#[from] SourceError),

    /// Standard I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create an error from a string message
    pub fn other(msg: impl Into<String>) -> Self {
        Error::Other(msg.into())
    }

    /// Check if this is a shape sequencing or snapshot error
    pub fn is_shape_error(&self) -> bool {
        matches!(self, Error::Shape(_))
    }

    /// Check if this is a path grammar error
    pub fn is_path_error(&self) -> bool {
        matches!(self, Error::Path(_))
    }

    /// Check if this is a path source error
    pub fn is_source_error(&self) -> bool {
        matches!(self, Error::Source(_))
    }

    /// Check if this error means no shape was active
    pub fn is_no_active_shape(&self) -> bool {
        matches!(self, Error::Shape(ShapeError::NoActiveShape))
    }
}

/// Result type using Error
pub type Result<T> = std::result::Result<T, Error>;
