//! Tagged union over the supported point representations.

use serde::{Deserialize, Serialize};

use crate::cartesian::{PointXY, PointXYZ};
use crate::lonlat::PointLonLat;

/// A point in one of the supported coordinate representations.
///
/// Grids and projections exchange points through this sum type so that
/// representation mismatches are handled exhaustively rather than through
/// runtime downcasts.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub enum Point {
    /// Geographic coordinates (degrees).
    LonLat(PointLonLat),
    /// Projected plane coordinates.
    XY(PointXY),
    /// Earth-centred cartesian coordinates.
    XYZ(PointXYZ),
}

impl Point {
    /// Creates a geographic point.
    pub const fn lonlat(lon: f64, lat: f64) -> Self {
        Self::LonLat(PointLonLat::new(lon, lat))
    }

    /// Creates a plane point.
    pub const fn xy(x: f64, y: f64) -> Self {
        Self::XY(PointXY::new(x, y))
    }

    /// The geographic coordinates, if this is a [`Point::LonLat`].
    pub fn as_lonlat(&self) -> Option<&PointLonLat> {
        match self {
            Self::LonLat(p) => Some(p),
            _ => None,
        }
    }

    /// The plane coordinates, if this is a [`Point::XY`].
    pub fn as_xy(&self) -> Option<&PointXY> {
        match self {
            Self::XY(p) => Some(p),
            _ => None,
        }
    }

    /// The cartesian coordinates, if this is a [`Point::XYZ`].
    pub fn as_xyz(&self) -> Option<&PointXYZ> {
        match self {
            Self::XYZ(p) => Some(p),
            _ => None,
        }
    }
}

impl From<PointLonLat> for Point {
    fn from(p: PointLonLat) -> Self {
        Self::LonLat(p)
    }
}

impl From<PointXY> for Point {
    fn from(p: PointXY) -> Self {
        Self::XY(p)
    }
}

impl From<PointXYZ> for Point {
    fn from(p: PointXYZ) -> Self {
        Self::XYZ(p)
    }
}

/// Compares two points within `eps`, requiring matching representations.
pub fn points_equal(a: &Point, b: &Point, eps: f64) -> bool {
    match (a, b) {
        (Point::LonLat(a), Point::LonLat(b)) => a.is_approximately_equal(b, eps),
        (Point::XY(a), Point::XY(b)) => a.is_approximately_equal(b, eps),
        (Point::XYZ(a), Point::XYZ(b)) => a.is_approximately_equal(b, eps),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn representation_mismatch_is_never_equal() {
        let a = Point::lonlat(0., 0.);
        let b = Point::xy(0., 0.);
        assert!(!points_equal(&a, &b, 1.));
    }

    #[test]
    fn lonlat_comparison_is_pole_aware() {
        let a = Point::lonlat(10., 90.);
        let b = Point::lonlat(250., 90.);
        assert!(points_equal(&a, &b, 1e-9));
    }
}
