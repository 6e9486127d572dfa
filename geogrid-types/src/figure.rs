//! Reference figures of the Earth (sphere or oblate spheroid).

use serde::{Deserialize, Serialize};

use crate::error::GeoError;

/// Reference figure: a sphere of a given radius, or an oblate spheroid
/// with semi-major/semi-minor axes `a >= b`.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub enum Figure {
    /// Perfect sphere.
    Sphere {
        /// Radius in metres.
        radius: f64,
    },
    /// Oblate spheroid.
    OblateSpheroid {
        /// Semi-major axis in metres.
        a: f64,
        /// Semi-minor axis in metres.
        b: f64,
    },
}

impl Figure {
    /// Spherical Earth used by the IFS (radius 6371229 m).
    pub const EARTH: Figure = Figure::Sphere { radius: 6_371_229. };

    /// Unit sphere.
    pub const UNIT_SPHERE: Figure = Figure::Sphere { radius: 1. };

    /// GRS80 spheroid.
    pub const GRS80: Figure = Figure::OblateSpheroid {
        a: 6_378_137.,
        b: 6_356_752.314_140,
    };

    /// WGS84 spheroid.
    pub const WGS84: Figure = Figure::OblateSpheroid {
        a: 6_378_137.,
        b: 6_356_752.314_245,
    };

    /// Creates a sphere, checking `radius > 0`.
    pub fn sphere(radius: f64) -> Result<Self, GeoError> {
        if radius > 0. {
            Ok(Self::Sphere { radius })
        } else {
            Err(GeoError::Figure(format!("invalid radius {radius}")))
        }
    }

    /// Creates an oblate spheroid, checking `0 < b <= a`.
    pub fn oblate_spheroid(a: f64, b: f64) -> Result<Self, GeoError> {
        if 0. < b && b <= a {
            Ok(Self::OblateSpheroid { a, b })
        } else {
            Err(GeoError::Figure(format!("invalid semi-axes a={a}, b={b}")))
        }
    }

    /// Semi-major axis.
    pub fn a(&self) -> f64 {
        match *self {
            Self::Sphere { radius } => radius,
            Self::OblateSpheroid { a, .. } => a,
        }
    }

    /// Semi-minor axis.
    pub fn b(&self) -> f64 {
        match *self {
            Self::Sphere { radius } => radius,
            Self::OblateSpheroid { b, .. } => b,
        }
    }

    /// Mean radius: the radius for a sphere, `(2a + b) / 3` for a spheroid.
    pub fn radius(&self) -> f64 {
        match *self {
            Self::Sphere { radius } => radius,
            Self::OblateSpheroid { a, b } => (2. * a + b) / 3.,
        }
    }

    /// Flattening `(a - b) / a`.
    pub fn flattening(&self) -> f64 {
        (self.a() - self.b()) / self.a()
    }

    /// First eccentricity.
    pub fn eccentricity(&self) -> f64 {
        let a = self.a();
        let b = self.b();
        (1. - (b * b) / (a * a)).sqrt()
    }

    /// Whether this figure is a perfect sphere.
    pub fn is_sphere(&self) -> bool {
        matches!(self, Self::Sphere { .. })
    }
}

impl Default for Figure {
    fn default() -> Self {
        Self::EARTH
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_figures_are_rejected() {
        assert!(Figure::sphere(0.).is_err());
        assert!(Figure::sphere(-1.).is_err());
        assert!(Figure::oblate_spheroid(1., 2.).is_err());
        assert!(Figure::oblate_spheroid(1., 0.).is_err());
        assert!(Figure::oblate_spheroid(2., 1.).is_ok());
    }

    #[test]
    fn sphere_has_no_eccentricity() {
        assert_eq!(Figure::EARTH.flattening(), 0.);
        assert_eq!(Figure::EARTH.eccentricity(), 0.);
        assert!(Figure::WGS84.eccentricity() > 0.08);
        assert!(Figure::WGS84.eccentricity() < 0.082);
    }
}
