//! Rotated pole transform.

use geogrid_types::sphere::{self, DEGREE_TO_RADIAN};
use geogrid_types::{Point, PointLonLat, PointXYZ};
use nalgebra::{Matrix3, Vector3};

use crate::error::GridError;
use crate::projection::{expect_lonlat, Projection};
use crate::spec::GridSpec;

const SOUTH_POLE: PointLonLat = PointLonLat::new(0., -90.);

/// Rotation of the south pole to `(south_pole_lon, south_pole_lat)` followed
/// by an `angle` rotation about the new polar axis.
///
/// When the pole stays put the transform degenerates to a longitude shift
/// (or the identity), decided once at construction so the common unrotated
/// case costs nothing per point.
#[derive(Debug)]
pub struct Rotation {
    south_pole: PointLonLat,
    angle: f64,
    kind: Kind,
}

#[derive(Debug)]
enum Kind {
    None,
    Angle(f64),
    Matrix { fwd: Matrix3<f64>, inv: Matrix3<f64> },
}

impl Rotation {
    /// Creates the rotation for a given rotated south pole and angle, in
    /// degrees.
    pub fn new(south_pole: PointLonLat, angle: f64) -> Self {
        let alpha = angle * DEGREE_TO_RADIAN;
        let theta = -(south_pole.lat + 90.) * DEGREE_TO_RADIAN;
        let phi = -south_pole.lon * DEGREE_TO_RADIAN;

        let (sa, ca) = alpha.sin_cos();
        let (st, ct) = theta.sin_cos();
        let (sp, cp) = phi.sin_cos();

        if (ct - 1.).abs() <= PointLonLat::EPS * DEGREE_TO_RADIAN {
            // pole unchanged: the whole transform degenerates to a shift by
            // the raw angle, with rotated() decided from the residual
            let residual =
                PointLonLat::normalise_angle_to_minimum(angle - south_pole.lon, -PointLonLat::FLAT_ANGLE);
            let kind = if residual.abs() <= PointLonLat::EPS {
                Kind::None
            } else {
                Kind::Angle(angle)
            };
            return Self {
                south_pole,
                angle: residual,
                kind,
            };
        }

        // rotate by α, then ϑ (y-axis, along the rotated Greenwich meridian),
        // then φ (z-axis): q = Rz Ry Ra p
        let fwd = Matrix3::new(
            ca * cp * ct - sa * sp,
            sa * cp * ct + ca * sp,
            cp * st,
            -sa * cp - ca * ct * sp,
            ca * cp - sa * ct * sp,
            -sp * st,
            -ca * st,
            -sa * st,
            ct,
        );

        // un-rotate (by -φ, -ϑ, -α): p = Ra Ry Rz q
        let inv = Matrix3::new(
            ca * cp * ct - sa * sp,
            -sa * cp - ca * ct * sp,
            -ca * st,
            sa * cp * ct + ca * sp,
            ca * cp - sa * ct * sp,
            -sa * st,
            cp * st,
            -sp * st,
            ct,
        );

        Self {
            south_pole,
            angle: PointLonLat::normalise_angle_to_minimum(angle, -PointLonLat::FLAT_ANGLE),
            kind: Kind::Matrix { fwd, inv },
        }
    }

    /// Reads `south_pole_lon`/`south_pole_lat` (default: the unrotated pole)
    /// and `rotation_angle` (default 0).
    pub fn from_spec(spec: &GridSpec) -> Result<Self, GridError> {
        let south_pole = if let Some(r) = spec.get_f64s("rotation") {
            if r.len() != 2 {
                return Err(GridError::Projection(
                    "expected 'rotation' as a list of size 2".to_string(),
                ));
            }
            PointLonLat::new(r[0], r[1])
        } else {
            PointLonLat::new(
                spec.get_f64("south_pole_lon").unwrap_or(SOUTH_POLE.lon),
                spec.get_f64("south_pole_lat").unwrap_or(SOUTH_POLE.lat),
            )
        };

        Ok(Self::new(south_pole, spec.get_f64("rotation_angle").unwrap_or(0.)))
    }

    /// Whether the transform moves any point at all.
    pub fn rotated(&self) -> bool {
        !matches!(self.kind, Kind::None)
    }

    /// The residual rotation angle, normalised to `(-180, 180]`.
    pub fn angle(&self) -> f64 {
        self.angle
    }

    /// The rotated south pole.
    pub fn south_pole(&self) -> PointLonLat {
        self.south_pole
    }

    fn apply(m: &Matrix3<f64>, p: &PointLonLat) -> Result<PointLonLat, GridError> {
        let c = sphere::xyz(1., p, 0.)?;
        let v = m * Vector3::new(c.x, c.y, c.z);
        Ok(sphere::lonlat(1., &PointXYZ::new(v.x, v.y, v.z))?)
    }
}

impl Projection for Rotation {
    fn fwd(&self, p: Point) -> Result<Point, GridError> {
        let q = expect_lonlat(&p)?;
        Ok(match &self.kind {
            Kind::None => p,
            Kind::Angle(a) => Point::lonlat(q.lon - a, q.lat),
            Kind::Matrix { fwd, .. } => Point::LonLat(Self::apply(fwd, &q)?),
        })
    }

    fn inv(&self, p: Point) -> Result<Point, GridError> {
        let q = expect_lonlat(&p)?;
        Ok(match &self.kind {
            Kind::None => p,
            Kind::Angle(a) => Point::lonlat(q.lon + a, q.lat),
            Kind::Matrix { inv, .. } => Point::LonLat(Self::apply(inv, &q)?),
        })
    }
}
