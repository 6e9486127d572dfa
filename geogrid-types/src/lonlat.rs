//! 2d point on the surface of a celestial body, in degrees.

use serde::{Deserialize, Serialize};

use crate::error::GeoError;

/// Point in geographic coordinates: longitude and latitude, in degrees.
///
/// The latitude of a well-formed point lies in `[-90, 90]`; the longitude is
/// not invariantly normalised, but [`PointLonLat::make`] returns a canonical
/// representative with the longitude in `[minimum, minimum + 360)`.
#[derive(Debug, Clone, Copy, Default, PartialEq, PartialOrd, Deserialize, Serialize)]
pub struct PointLonLat {
    /// Longitude in degrees.
    pub lon: f64,
    /// Latitude in degrees.
    pub lat: f64,
}

impl PointLonLat {
    /// Default tolerance for coordinate comparisons, in degrees.
    pub const EPS: f64 = 1e-9;

    /// Half turn, in degrees.
    pub const FLAT_ANGLE: f64 = 180.;

    /// Full turn, in degrees.
    pub const FULL_ANGLE: f64 = 360.;

    /// Creates a new point without any normalisation.
    pub const fn new(lon: f64, lat: f64) -> Self {
        Self { lon, lat }
    }

    /// Creates a new point, checking the latitude range.
    pub fn try_new(lon: f64, lat: f64) -> Result<Self, GeoError> {
        if (-90. ..=90.).contains(&lat) {
            Ok(Self { lon, lat })
        } else {
            Err(GeoError::Range(format!("invalid latitude {lat}")))
        }
    }

    /// Longitude in degrees.
    pub fn lon(&self) -> f64 {
        self.lon
    }

    /// Latitude in degrees.
    pub fn lat(&self) -> f64 {
        self.lat
    }

    /// Normalises an angle to the range `[minimum, minimum + 360)`.
    pub fn normalise_angle_to_minimum(angle: f64, minimum: f64) -> f64 {
        let diff = angle - minimum;
        if (0. ..Self::FULL_ANGLE).contains(&diff) {
            angle
        } else {
            modulo_360(diff) + minimum
        }
    }

    /// Normalises an angle to the range `(maximum - 360, maximum]`.
    pub fn normalise_angle_to_maximum(angle: f64, maximum: f64) -> f64 {
        let diff = maximum - angle;
        if (0. ..Self::FULL_ANGLE).contains(&diff) {
            angle
        } else {
            maximum - modulo_360(diff)
        }
    }

    /// Canonical representative of a point: the latitude is folded into
    /// `[-90, 90]` (flipping the longitude by half a turn when crossing a
    /// pole), and the longitude normalised to `[lon_minimum, lon_minimum +
    /// 360)`. At the poles the longitude collapses to `0`.
    pub fn make(lon: f64, lat: f64, lon_minimum: f64) -> Self {
        let mut lat = Self::normalise_angle_to_maximum(lat, 90.);
        let mut lon = lon;

        if lat < -90. {
            lat = -Self::FLAT_ANGLE - lat;
            lon += Self::FLAT_ANGLE;
        }

        let lon = if lat == -90. || lat == 90. {
            0.
        } else {
            Self::normalise_angle_to_minimum(lon, lon_minimum)
        };

        Self { lon, lat }
    }

    /// Canonical representative with longitude in `[0, 360)`.
    pub fn normal(&self) -> Self {
        Self::make(self.lon, self.lat, 0.)
    }

    /// The point diametrically opposite on the sphere.
    pub fn antipode(&self) -> Self {
        Self::make(self.lon + Self::FLAT_ANGLE, -self.lat, 0.)
    }

    /// Compares two points within `eps` degrees, treating longitude as
    /// irrelevant at the poles and wrapping the longitude difference across
    /// the date line.
    pub fn is_approximately_equal(&self, other: &Self, eps: f64) -> bool {
        let a = self.normal();
        let b = other.normal();

        if (a.lat - b.lat).abs() > eps {
            return false;
        }

        // longitude is degenerate at the poles
        if (a.lat.abs() - 90.).abs() <= eps {
            return true;
        }

        let dlon = modulo_360(a.lon - b.lon);
        dlon <= eps || Self::FULL_ANGLE - dlon <= eps
    }
}

impl From<(f64, f64)> for PointLonLat {
    fn from((lon, lat): (f64, f64)) -> Self {
        Self { lon, lat }
    }
}

fn modulo_360(a: f64) -> f64 {
    a - 360. * (a / 360.).floor()
}
