//! Geospatial grid engine.
//!
//! Grids are ordered, finite sets of points on the sphere. This crate builds
//! them from parametrisations ([`GridSpec`]) or shorthand names, iterates
//! their points in scan order, and answers spatial questions about their
//! extent: bounding boxes, pole inclusion, west-east periodicity.
//!
//! Supported grid families are regular latitude-longitude, regular and
//! reduced Gaussian, HEALPix (ring and nested), ORCA tripolar layouts read
//! from coordinate records, and fully unstructured point lists. Grids can
//! carry a projection, applied as points are yielded.
//!
//! ```
//! use geogrid::GridFactory;
//!
//! let factory = GridFactory::with_defaults();
//! let grid = factory.build_by_name("O320")?;
//! assert_eq!(grid.size(), 421_120);
//! # Ok::<(), geogrid::GridError>(())
//! ```
//!
//! Geometry primitives (points, bounding boxes, polygons, spherical
//! calculations) live in the companion crate, re-exported as [`types`].

pub mod cache;
pub mod convex_hull;
mod error;
mod gaussian;
pub mod grid;
pub mod iterator;
pub mod projection;
pub mod range;
pub mod spec;

pub use error::{GridError, Result};
pub use grid::{Grid, GridFactory};
pub use iterator::GridIterator;
pub use projection::Projection;
pub use spec::GridSpec;

pub use geogrid_types as types;
