//! Error type for grid construction, projection and iteration.

use geogrid_types::GeoError;
use thiserror::Error;

/// Errors reported by the grid engine.
#[derive(Debug, Error)]
pub enum GridError {
    /// A grid type or name is not registered.
    #[error("unknown grid: {0}")]
    UnknownGrid(String),

    /// A projection cannot be built or applied.
    #[error("projection: {0}")]
    Projection(String),

    /// A parametrisation is missing a key or holds the wrong type.
    #[error("spec: {0}")]
    Spec(String),

    /// A coordinate range is empty or inverted.
    #[error("range: {0}")]
    Range(String),

    /// A spatial search structure cannot be built.
    #[error("search: {0}")]
    Search(String),

    /// A grid record on disk is malformed or contradicts its metadata.
    #[error("record: {0}")]
    Record(String),

    /// Geometry primitive error.
    #[error(transparent)]
    Geometry(#[from] GeoError),

    /// Underlying I/O error.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, GridError>;
