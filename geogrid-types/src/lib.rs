//! Geographic and cartesian geometry primitives for gridded geospatial data.
//!
//! This crate provides the value types shared by the `geogrid` engine:
//! longitude/latitude and cartesian points, reference figures
//! (sphere/ellipsoid), spherical geometry functions, bounding boxes and
//! polygons with the spatial predicates needed for regridding.

pub mod bounding_box;
pub mod cartesian;
pub mod error;
pub mod figure;
pub mod lonlat;
pub mod lonlat_polygon;
pub mod point;
pub mod polygon;
pub mod sphere;

pub use bounding_box::BoundingBox;
pub use cartesian::{PointXY, PointXYZ};
pub use error::GeoError;
pub use figure::Figure;
pub use lonlat::PointLonLat;
pub use lonlat_polygon::LonLatPolygon;
pub use point::{points_equal, Point};
pub use polygon::Polygon;
