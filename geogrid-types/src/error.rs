//! Error type used by the crate.

use thiserror::Error;

/// Error enum for geometry construction and predicates.
#[derive(Debug, Error)]
pub enum GeoError {
    /// Invalid reference figure parameters (radius or semi-axes).
    #[error("invalid figure: {0}")]
    Figure(String),
    /// Invalid area or bounding box definition.
    #[error("invalid area: {0}")]
    Area(String),
    /// Invalid coordinate or coordinate range.
    #[error("invalid range: {0}")]
    Range(String),
}
