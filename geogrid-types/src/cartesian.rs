//! Planar and three-dimensional cartesian points.

use serde::{Deserialize, Serialize};

/// Point in a plane (projected coordinates).
#[derive(Debug, Clone, Copy, Default, PartialEq, PartialOrd, Deserialize, Serialize)]
pub struct PointXY {
    /// X coordinate.
    pub x: f64,
    /// Y coordinate.
    pub y: f64,
}

impl PointXY {
    /// Creates a new point.
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// X coordinate.
    pub fn x(&self) -> f64 {
        self.x
    }

    /// Y coordinate.
    pub fn y(&self) -> f64 {
        self.y
    }

    /// Squared euclidean distance to `other`.
    pub fn distance2(&self, other: &Self) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        dx * dx + dy * dy
    }

    /// Euclidean distance to `other`.
    pub fn distance(&self, other: &Self) -> f64 {
        self.distance2(other).sqrt()
    }

    /// Component-wise comparison within `eps`.
    pub fn is_approximately_equal(&self, other: &Self, eps: f64) -> bool {
        (self.x - other.x).abs() <= eps && (self.y - other.y).abs() <= eps
    }
}

impl From<(f64, f64)> for PointXY {
    fn from((x, y): (f64, f64)) -> Self {
        Self { x, y }
    }
}

/// Point in three-dimensional (earth-centred) cartesian coordinates.
#[derive(Debug, Clone, Copy, Default, PartialEq, PartialOrd, Deserialize, Serialize)]
pub struct PointXYZ {
    /// X coordinate.
    pub x: f64,
    /// Y coordinate.
    pub y: f64,
    /// Z coordinate.
    pub z: f64,
}

impl PointXYZ {
    /// Creates a new point.
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Squared euclidean distance to `other`.
    pub fn distance2(&self, other: &Self) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        let dz = self.z - other.z;
        dx * dx + dy * dy + dz * dz
    }

    /// Euclidean distance to `other`.
    pub fn distance(&self, other: &Self) -> f64 {
        self.distance2(other).sqrt()
    }

    /// Component-wise comparison within `eps`.
    pub fn is_approximately_equal(&self, other: &Self, eps: f64) -> bool {
        (self.x - other.x).abs() <= eps
            && (self.y - other.y).abs() <= eps
            && (self.z - other.z).abs() <= eps
    }
}

impl From<(f64, f64, f64)> for PointXYZ {
    fn from((x, y, z): (f64, f64, f64)) -> Self {
        Self { x, y, z }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn distances() {
        let a = PointXY::new(0., 0.);
        let b = PointXY::new(3., 4.);
        assert_eq!(a.distance2(&b), 25.);
        assert_eq!(a.distance(&b), 5.);

        let p = PointXYZ::new(1., 2., 2.);
        let q = PointXYZ::new(0., 0., 0.);
        assert_eq!(p.distance(&q), 3.);
    }
}
