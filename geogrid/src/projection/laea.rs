//! Lambert azimuthal equal-area projection, spherical form.

use geogrid_types::sphere::{DEGREE_TO_RADIAN, RADIAN_TO_DEGREE};
use geogrid_types::{Figure, Point};

use crate::error::GridError;
use crate::projection::{expect_lonlat, expect_xy, Projection};
use crate::spec::GridSpec;

const EPSILON: f64 = 1e-10;

/// Lambert azimuthal equal-area on the sphere, centred on
/// (`central_longitude`, `standard_parallel`).
///
/// The sines and cosines of the projection centre are fixed at construction;
/// the per-point transform is purely algebraic.
#[derive(Debug, Clone)]
pub struct LambertAzimuthalEqualArea {
    radius: f64,
    central_longitude: f64,
    standard_parallel: f64,
    lambda0: f64,
    sin_phi1: f64,
    cos_phi1: f64,
}

impl LambertAzimuthalEqualArea {
    /// Creates the projection over the given figure's mean radius.
    pub fn new(
        figure: &Figure,
        central_longitude: f64,
        standard_parallel: f64,
    ) -> Result<Self, GridError> {
        if !(-90. ..=90.).contains(&standard_parallel) {
            return Err(GridError::Projection(format!(
                "invalid standard parallel {standard_parallel}"
            )));
        }

        let phi1 = standard_parallel * DEGREE_TO_RADIAN;
        let (sin_phi1, cos_phi1) = phi1.sin_cos();

        Ok(Self {
            radius: figure.radius(),
            central_longitude,
            standard_parallel,
            lambda0: central_longitude * DEGREE_TO_RADIAN,
            sin_phi1,
            cos_phi1,
        })
    }

    /// Reads `lon_0`, `lat_0` and an optional `radius` (default: Earth).
    pub fn from_spec(spec: &GridSpec) -> Result<Self, GridError> {
        let figure = match spec.get_f64("radius") {
            Some(r) => Figure::sphere(r).map_err(|e| GridError::Projection(e.to_string()))?,
            None => Figure::EARTH,
        };
        Self::new(
            &figure,
            spec.get_f64("lon_0").unwrap_or(0.),
            spec.get_f64("lat_0").unwrap_or(0.),
        )
    }
}

impl Projection for LambertAzimuthalEqualArea {
    fn fwd(&self, p: Point) -> Result<Point, GridError> {
        let q = expect_lonlat(&p)?;

        let phi = q.lat * DEGREE_TO_RADIAN;
        let (sin_phi, cos_phi) = phi.sin_cos();
        let dlambda = q.lon * DEGREE_TO_RADIAN - self.lambda0;
        let (sin_dlambda, cos_dlambda) = dlambda.sin_cos();

        let denominator = 1. + self.sin_phi1 * sin_phi + self.cos_phi1 * cos_phi * cos_dlambda;
        if denominator.abs() < EPSILON {
            return Err(GridError::Projection(format!(
                "antipodal point ({}, {}) cannot be projected",
                q.lon, q.lat
            )));
        }

        let kp = self.radius * (2. / denominator).sqrt();
        Ok(Point::xy(
            kp * cos_phi * sin_dlambda,
            kp * (self.cos_phi1 * sin_phi - self.sin_phi1 * cos_phi * cos_dlambda),
        ))
    }

    fn inv(&self, p: Point) -> Result<Point, GridError> {
        let q = expect_xy(&p)?;

        let rho = q.x.hypot(q.y);
        if rho <= EPSILON {
            return Ok(Point::lonlat(self.central_longitude, self.standard_parallel));
        }

        let c = 2. * (rho / (2. * self.radius)).clamp(-1., 1.).asin();
        let (sin_c, cos_c) = c.sin_cos();

        let lat = (cos_c * self.sin_phi1 + q.y * sin_c * self.cos_phi1 / rho)
            .clamp(-1., 1.)
            .asin();
        let lon = self.lambda0
            + f64::atan2(
                q.x * sin_c,
                rho * self.cos_phi1 * cos_c - q.y * self.sin_phi1 * sin_c,
            );

        Ok(Point::lonlat(lon * RADIAN_TO_DEGREE, lat * RADIAN_TO_DEGREE))
    }
}

#[cfg(test)]
mod tests {
    use geogrid_types::points_equal;

    use super::*;

    fn projection() -> LambertAzimuthalEqualArea {
        LambertAzimuthalEqualArea::new(&Figure::EARTH, 10., 52.).expect("valid parallel")
    }

    #[test]
    fn centre_maps_to_the_origin() {
        let p = projection().fwd(Point::lonlat(10., 52.)).expect("projectable");
        let p = p.as_xy().expect("plane output");
        assert!(p.x.abs() < 1e-9 && p.y.abs() < 1e-9);

        let back = projection().inv(Point::xy(0., 0.)).expect("plane input");
        assert!(points_equal(&back, &Point::lonlat(10., 52.), 1e-9));
    }

    #[test]
    fn round_trip_away_from_the_singularity() {
        let proj = projection();
        for (lon, lat) in [(10., 52.), (0., 0.), (30., 70.), (-20., 35.), (100., -10.)] {
            let p = Point::lonlat(lon, lat);
            let q = proj.fwd(p).expect("projectable");
            let back = proj.inv(q).expect("plane input");
            assert!(points_equal(&p, &back, 1e-9), "({lon}, {lat}) -> {q:?} -> {back:?}");
        }
    }

    #[test]
    fn antipode_is_rejected() {
        assert!(projection().fwd(Point::lonlat(-170., -52.)).is_err());
    }

    #[test]
    fn invalid_parallel_is_rejected() {
        assert!(LambertAzimuthalEqualArea::new(&Figure::EARTH, 0., 91.).is_err());
    }
}
