//! Geographic bounding box with west-east periodicity support.

use serde::{Deserialize, Serialize};

use crate::error::GeoError;
use crate::lonlat::PointLonLat;
use crate::sphere;

/// Latitude/longitude aligned bounding box, in degrees.
///
/// `east` is normalised into `[west, west + 360]` at construction; a span of
/// exactly 360 expresses periodic west-east wrap.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub struct BoundingBox {
    north: f64,
    west: f64,
    south: f64,
    east: f64,
}

impl BoundingBox {
    /// Creates a bounding box from explicit bounds, in degrees.
    ///
    /// Fails if `south > north` or either latitude is out of `[-90, 90]`.
    pub fn new(north: f64, west: f64, south: f64, east: f64) -> Result<Self, GeoError> {
        if south > north {
            return Err(GeoError::Area(format!("south {south} > north {north}")));
        }
        if !(-90. ..=90.).contains(&south) || !(-90. ..=90.).contains(&north) {
            return Err(GeoError::Area(format!(
                "invalid latitude bounds [{south}, {north}]"
            )));
        }

        let a = PointLonLat::normalise_angle_to_minimum(east, west);
        let east_norm = if (a - west).abs() <= PointLonLat::EPS && (east - west).abs() > PointLonLat::EPS
        {
            west + 360.
        } else {
            a
        };

        Ok(Self {
            north,
            west,
            south,
            east: east_norm,
        })
    }

    /// The whole globe: `[(-90, 0), (90, 360)]`.
    pub fn global() -> Self {
        Self {
            north: 90.,
            west: 0.,
            south: -90.,
            east: 360.,
        }
    }

    /// Northern bound.
    pub fn north(&self) -> f64 {
        self.north
    }

    /// Western bound.
    pub fn west(&self) -> f64 {
        self.west
    }

    /// Southern bound.
    pub fn south(&self) -> f64 {
        self.south
    }

    /// Eastern bound, in `[west, west + 360]`.
    pub fn east(&self) -> f64 {
        self.east
    }

    /// Whether the box has zero area.
    pub fn empty(&self) -> bool {
        (self.north - self.south).abs() <= PointLonLat::EPS
            || (self.east - self.west).abs() <= PointLonLat::EPS
    }

    /// Whether the west-east span covers a full turn.
    pub fn is_periodic_west_east(&self) -> bool {
        (self.east - self.west - 360.).abs() <= PointLonLat::EPS
    }

    /// Whether the northern bound reaches the north pole.
    pub fn contains_north_pole(&self) -> bool {
        (self.north - 90.).abs() <= PointLonLat::EPS
    }

    /// Whether the southern bound reaches the south pole.
    pub fn contains_south_pole(&self) -> bool {
        (self.south + 90.).abs() <= PointLonLat::EPS
    }

    /// Whether the box contains the given coordinates, wrapping the
    /// longitude into the box's frame.
    pub fn contains(&self, lat: f64, lon: f64) -> bool {
        if lat < self.south - PointLonLat::EPS || lat > self.north + PointLonLat::EPS {
            return false;
        }

        // longitude is degenerate at the contained poles
        if (self.contains_north_pole() && (lat - 90.).abs() <= PointLonLat::EPS)
            || (self.contains_south_pole() && (lat + 90.).abs() <= PointLonLat::EPS)
        {
            return true;
        }

        let lon = PointLonLat::normalise_angle_to_minimum(lon, self.west);
        lon <= self.east + PointLonLat::EPS
    }

    /// Whether the box fully contains `other`.
    pub fn contains_box(&self, other: &Self) -> bool {
        self.contains(other.north, other.west)
            && self.contains(other.north, other.east)
            && self.contains(other.south, other.west)
            && self.contains(other.south, other.east)
    }

    /// Intersects with `other`, narrowing `other` in place to the overlap.
    ///
    /// Returns whether the overlap is non-empty; degenerate (zero-area)
    /// overlaps count as non-intersecting.
    pub fn intersects(&self, other: &mut Self) -> bool {
        let n = self.north.min(other.north);
        let s = self.south.max(other.south);

        let intersects_sn = s < n - PointLonLat::EPS;
        let n = if intersects_sn { n } else { s };

        if self.is_periodic_west_east() && other.is_periodic_west_east() {
            *other = Self {
                north: n,
                west: other.west,
                south: s,
                east: other.east,
            };
            return intersects_sn;
        }

        fn overlap(a: &BoundingBox, b: &BoundingBox, w: &mut f64, e: &mut f64) -> bool {
            if a.is_periodic_west_east() || b.is_periodic_west_east() {
                let p = a.is_periodic_west_east();
                *w = if p { b.west } else { a.west };
                *e = if p { b.east } else { a.east };
                return true;
            }

            let reference = PointLonLat::normalise_angle_to_minimum(b.west, a.west);
            let w_ = a.west.max(reference);
            let e_ = a
                .east
                .min(PointLonLat::normalise_angle_to_minimum(b.east, reference));

            if w_ < e_ - PointLonLat::EPS {
                *w = w_;
                *e = e_;
                return true;
            }
            false
        }

        let mut w = self.west.min(other.west);
        let mut e = w;

        let intersects_we = if self.west <= other.west {
            overlap(self, other, &mut w, &mut e) || overlap(other, self, &mut w, &mut e)
        } else {
            overlap(other, self, &mut w, &mut e) || overlap(self, other, &mut w, &mut e)
        };

        debug_assert!(w <= e);
        *other = Self {
            north: n,
            west: w,
            south: s,
            east: e,
        };

        intersects_sn && intersects_we
    }

    /// Spherical area of the box for the given radius.
    pub fn area(&self, radius: f64) -> Result<f64, GeoError> {
        sphere::area_between(
            radius,
            &PointLonLat::new(self.west, self.north),
            &PointLonLat::new(self.east, self.south),
        )
    }
}

impl Default for BoundingBox {
    fn default() -> Self {
        Self::global()
    }
}
